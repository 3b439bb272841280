//! Page controller: owns the puzzle and gallery state and routes every input
//! kind to one state-machine operation. Handlers get back a list of
//! [`Effect`]s describing what the renderer has to change.

use crate::config::PageConfig;
use crate::gallery::{Gallery, GalleryAction, MediaItem, ModalView, SwipeTracker};
use crate::puzzle::{MoveOutcome, Puzzle, SimpleRng, TileView};

#[derive(Clone, Debug, PartialEq)]
pub enum PageInput {
    TileClicked(usize),
    GiveUp,
    ThumbnailClicked(usize),
    PrevClicked,
    NextClicked,
    /// `KeyboardEvent.key` of a document keydown.
    Key(String),
    TouchStart(f64),
    TouchEnd(f64),
    CloseClicked,
    /// Click anywhere on the modal; only the backdrop itself closes it.
    ModalClicked { on_backdrop: bool },
    /// Slot contents changed; carries the freshly scanned list.
    MediaChanged(Vec<Option<MediaItem>>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    RenderPuzzle(Vec<TileView>),
    /// Deliver the owed win notification after `delay_ms`.
    ScheduleWin { delay_ms: u32 },
    OpenModal,
    /// Pause the modal video, then apply the view.
    ShowMedia(ModalView),
    /// Hide the modal and pause its video.
    CloseModal,
}

pub struct Controller {
    puzzle: Puzzle,
    gallery: Gallery,
    swipe: SwipeTracker,
    unlock_delay_ms: u32,
}

impl Controller {
    pub fn new(cfg: &PageConfig, rng: SimpleRng) -> Self {
        Self {
            puzzle: Puzzle::new(cfg.grid_size, rng).with_shuffle_moves(cfg.shuffle_moves),
            gallery: Gallery::new(),
            swipe: SwipeTracker::new(cfg.swipe_threshold),
            unlock_delay_ms: cfg.unlock_delay_ms,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn puzzle_mut(&mut self) -> &mut Puzzle {
        &mut self.puzzle
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Shuffle and draw the initial board.
    pub fn start(&mut self) -> Vec<Effect> {
        self.puzzle.shuffle();
        vec![Effect::RenderPuzzle(self.puzzle.view())]
    }

    /// Deliver a win owed by [`PageInput::GiveUp`]. False if already delivered.
    pub fn fire_pending_win(&mut self) -> bool {
        self.puzzle.fire_win()
    }

    pub fn dispatch(&mut self, input: PageInput) -> Vec<Effect> {
        match input {
            PageInput::TileClicked(slot) => self.move_tile(slot),
            PageInput::GiveUp => {
                let owed = self.puzzle.give_up();
                let mut fx = vec![Effect::RenderPuzzle(self.puzzle.view())];
                if owed {
                    fx.push(Effect::ScheduleWin {
                        delay_ms: self.unlock_delay_ms,
                    });
                }
                fx
            }
            PageInput::ThumbnailClicked(idx) => match self.gallery.open_at(idx) {
                Some(view) => vec![Effect::OpenModal, Effect::ShowMedia(view)],
                None => Vec::new(),
            },
            PageInput::PrevClicked => self.navigate(GalleryAction::Prev),
            PageInput::NextClicked => self.navigate(GalleryAction::Next),
            PageInput::Key(key) => {
                if !self.gallery.is_open() {
                    return Vec::new();
                }
                match GalleryAction::from_key(&key) {
                    Some(action) => self.navigate(action),
                    None => Vec::new(),
                }
            }
            PageInput::TouchStart(x) => {
                self.swipe.begin(x);
                Vec::new()
            }
            PageInput::TouchEnd(x) => match self.swipe.finish(x) {
                Some(action) if self.gallery.is_open() => self.navigate(action),
                _ => Vec::new(),
            },
            PageInput::CloseClicked => self.navigate(GalleryAction::Close),
            PageInput::ModalClicked { on_backdrop } => {
                if on_backdrop {
                    self.navigate(GalleryAction::Close)
                } else {
                    Vec::new()
                }
            }
            PageInput::MediaChanged(slots) => {
                self.gallery.rebuild_index(slots);
                Vec::new()
            }
        }
    }

    fn move_tile(&mut self, slot: usize) -> Vec<Effect> {
        if slot >= self.puzzle.grid().len() {
            return Vec::new();
        }
        match self.puzzle.move_tile(slot) {
            MoveOutcome::Ignored => Vec::new(),
            MoveOutcome::Moved | MoveOutcome::Solved => {
                vec![Effect::RenderPuzzle(self.puzzle.view())]
            }
        }
    }

    fn navigate(&mut self, action: GalleryAction) -> Vec<Effect> {
        let view = match action {
            GalleryAction::Prev => self.gallery.prev(),
            GalleryAction::Next => self.gallery.next(),
            GalleryAction::Close => {
                self.gallery.close();
                return vec![Effect::CloseModal];
            }
        };
        view.map(Effect::ShowMedia).into_iter().collect()
    }
}
