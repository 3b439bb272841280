//! The yes/no question: the No button that dodges the pointer, and the small
//! send-status indicator shown next to the buttons.

use crate::puzzle::SimpleRng;

pub const YES_MESSAGE: &str = "I KNEW IT! I LOVE YOU! ❤️";
pub const HUG_LABEL: &str = "Send Virtual Hug 🤗";
pub const HUG_SENDING_LABEL: &str = "Sending...";
pub const HUG_SENT_LABEL: &str = "Sent! 🤗";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ButtonPlacement {
    /// Laid out in normal flow next to the Yes button.
    Static,
    /// Absolutely positioned inside the container, in px.
    Absolute { left: f64, top: f64 },
}

/// Container and button sizes, in CSS px.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub container_w: f64,
    pub container_h: f64,
    pub button_w: f64,
    pub button_h: f64,
}

impl Bounds {
    fn max_left(&self) -> f64 {
        (self.container_w - self.button_w).max(0.0)
    }

    fn max_top(&self) -> f64 {
        (self.container_h - self.button_h).max(0.0)
    }
}

#[derive(Debug)]
pub struct EvasiveButton {
    min_width: f64,
    rng: SimpleRng,
}

impl EvasiveButton {
    pub fn new(min_width: f64, rng: SimpleRng) -> Self {
        Self { min_width, rng }
    }

    /// Touch devices and narrow viewports keep the button still.
    pub fn is_evasive(&self, touch: bool, viewport_width: f64) -> bool {
        !touch && viewport_width >= self.min_width
    }

    /// Resting spot: 60% across the free width, top edge.
    pub fn initial(&self, touch: bool, viewport_width: f64, bounds: Bounds) -> ButtonPlacement {
        if !self.is_evasive(touch, viewport_width) {
            return ButtonPlacement::Static;
        }
        let max_left = bounds.max_left();
        ButtonPlacement::Absolute {
            left: (max_left * 0.6).clamp(0.0, max_left),
            top: 0.0,
        }
    }

    /// Jump somewhere random while staying inside the container. A button
    /// that went static (touch, or the viewport shrank) stays static.
    pub fn dodge(&mut self, touch: bool, viewport_width: f64, bounds: Bounds) -> ButtonPlacement {
        if !self.is_evasive(touch, viewport_width) {
            return ButtonPlacement::Static;
        }
        ButtonPlacement::Absolute {
            left: self.rng.next_unit() * bounds.max_left(),
            top: self.rng.next_unit() * bounds.max_top(),
        }
    }
}

/// Status line under a button that sends a notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendStatus {
    Sending,
    Sent { at: String },
    Failed { message: String },
}

impl SendStatus {
    pub fn class_name(&self) -> &'static str {
        match self {
            SendStatus::Sending => "send-status sending",
            SendStatus::Sent { .. } => "send-status success",
            SendStatus::Failed { .. } => "send-status error",
        }
    }

    pub fn text(&self) -> String {
        match self {
            SendStatus::Sending => "Sending…".to_string(),
            SendStatus::Sent { at } => format!("Sent at {at}"),
            SendStatus::Failed { message } => format!("Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: Bounds = Bounds {
        container_w: 300.0,
        container_h: 120.0,
        button_w: 100.0,
        button_h: 40.0,
    };

    #[test]
    fn touch_or_narrow_is_static() {
        let b = EvasiveButton::new(600.0, SimpleRng::new(1));
        assert_eq!(b.initial(true, 1024.0, B), ButtonPlacement::Static);
        assert_eq!(b.initial(false, 599.0, B), ButtonPlacement::Static);
        assert!(b.is_evasive(false, 600.0));
    }

    #[test]
    fn initial_is_sixty_percent_across() {
        let b = EvasiveButton::new(600.0, SimpleRng::new(1));
        assert_eq!(
            b.initial(false, 1024.0, B),
            ButtonPlacement::Absolute { left: 120.0, top: 0.0 }
        );
        let cramped = Bounds {
            container_w: 50.0,
            ..B
        };
        assert_eq!(
            b.initial(false, 1024.0, cramped),
            ButtonPlacement::Absolute { left: 0.0, top: 0.0 }
        );
    }

    #[test]
    fn dodge_stays_inside_container() {
        let mut b = EvasiveButton::new(600.0, SimpleRng::new(77));
        for _ in 0..500 {
            match b.dodge(false, 1024.0, B) {
                ButtonPlacement::Absolute { left, top } => {
                    assert!((0.0..200.0).contains(&left));
                    assert!((0.0..80.0).contains(&top));
                }
                ButtonPlacement::Static => panic!("dodge must position absolutely"),
            }
        }
    }

    #[test]
    fn shrunk_viewport_stops_dodging() {
        let mut b = EvasiveButton::new(600.0, SimpleRng::new(3));
        assert_eq!(b.initial(false, 500.0, B), ButtonPlacement::Static);
        // mouseover after the resize must not pull it back out of flow
        assert_eq!(b.dodge(false, 500.0, B), ButtonPlacement::Static);
        assert_eq!(b.dodge(true, 1024.0, B), ButtonPlacement::Static);
        assert!(matches!(
            b.dodge(false, 800.0, B),
            ButtonPlacement::Absolute { .. }
        ));
    }

    #[test]
    fn status_rendering() {
        assert_eq!(SendStatus::Sending.class_name(), "send-status sending");
        assert_eq!(SendStatus::Sending.text(), "Sending…");
        let sent = SendStatus::Sent { at: "10:15:00".into() };
        assert_eq!(sent.class_name(), "send-status success");
        assert_eq!(sent.text(), "Sent at 10:15:00");
        let failed = SendStatus::Failed { message: "offline".into() };
        assert_eq!(failed.text(), "Error: offline");
    }
}
