//! Media gallery modal: which preview is enlarged, cyclic navigation and the
//! swipe gesture detector. The DOM side feeds slot contents in through
//! [`Gallery::rebuild_index`] and applies the [`ModalView`]s handed back.

/// Minimum horizontal travel (CSS px) before a touch counts as a swipe.
pub const SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `image/*` MIME types are images; everything else is played as video.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub src: String,
}

impl MediaItem {
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            src: src.into(),
        }
    }

    pub fn video(src: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            src: src.into(),
        }
    }
}

/// The one modal surface that should be visible. The other is hidden, and the
/// modal video is always paused before a new surface is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Surface {
    Image(String),
    Video(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalView {
    pub index: usize,
    /// `None` when the slot has no preview yet; only the pause applies.
    pub surface: Option<Surface>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryState {
    Closed,
    Open(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GalleryAction {
    Prev,
    Next,
    Close,
}

impl GalleryAction {
    /// Keyboard mapping used while the modal is open.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(GalleryAction::Prev),
            "ArrowRight" => Some(GalleryAction::Next),
            "Escape" => Some(GalleryAction::Close),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Gallery {
    slots: Vec<Option<MediaItem>>,
    current: Option<usize>,
    open: bool,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot list (document order). Index identity does not survive
    /// a rebuild; the current position is kept only while it is still in range.
    pub fn rebuild_index(&mut self, slots: Vec<Option<MediaItem>>) {
        self.slots = slots;
        self.current = match self.current {
            _ if self.slots.is_empty() => None,
            Some(i) if i < self.slots.len() => Some(i),
            _ => Some(0),
        };
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> GalleryState {
        match (self.open, self.current) {
            (true, Some(i)) => GalleryState::Open(i),
            _ => GalleryState::Closed,
        }
    }

    pub fn slot(&self, index: usize) -> Option<&MediaItem> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Select `index` with wraparound. No-op on an empty list.
    pub fn show(&mut self, index: isize) -> Option<ModalView> {
        let len = self.slots.len();
        if len == 0 {
            return None;
        }
        let index = if index < 0 {
            len - 1
        } else if index as usize >= len {
            0
        } else {
            index as usize
        };
        self.current = Some(index);
        let surface = self.slots[index].as_ref().map(|item| match item.kind {
            MediaKind::Image => Surface::Image(item.src.clone()),
            MediaKind::Video => Surface::Video(item.src.clone()),
        });
        Some(ModalView { index, surface })
    }

    pub fn next(&mut self) -> Option<ModalView> {
        let cur = self.current? as isize;
        self.show(cur + 1)
    }

    pub fn prev(&mut self) -> Option<ModalView> {
        let cur = self.current? as isize;
        self.show(cur - 1)
    }

    /// Thumbnail click: open the modal on `index`.
    pub fn open_at(&mut self, index: usize) -> Option<ModalView> {
        if self.slots.is_empty() {
            return None;
        }
        self.open = true;
        self.show(index as isize)
    }

    /// Every close input ends up here. Returns whether the modal was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

/// Tracks one touch from start to end and turns it into a navigation step.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start_x: Option<f64>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start_x: None,
        }
    }

    pub fn begin(&mut self, x: f64) {
        self.start_x = Some(x);
    }

    /// Finger moved left past the threshold → next; right → previous.
    pub fn finish(&mut self, x: f64) -> Option<GalleryAction> {
        let start = self.start_x.take()?;
        if x < start - self.threshold {
            Some(GalleryAction::Next)
        } else if x > start + self.threshold {
            Some(GalleryAction::Prev)
        } else {
            None
        }
    }
}
