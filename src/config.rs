//! Page tunables. Defaults match the shipped page; a JSON block with
//! `id="page-config"` may override any subset of them.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("grid_size must be at least 2 (got {0})")]
    GridTooSmall(usize),
    #[error("swipe_threshold must be positive (got {0})")]
    SwipeThreshold(f64),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub grid_size: usize,
    pub shuffle_moves: usize,
    /// Source image cropped into puzzle tiles.
    pub image_url: String,
    pub give_up_delay_ms: u32,
    /// Viewports at most this wide get the give-up button right away.
    pub give_up_immediate_max_width: f64,
    pub unlock_delay_ms: u32,
    pub swipe_threshold: f64,
    /// Below this width the No button stops running away.
    pub evasive_min_width: f64,
    pub notify_endpoint: Option<String>,
    pub notify_icon: String,
    pub status_reset_ms: u32,
    pub service_worker_url: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            grid_size: crate::puzzle::SIZE,
            shuffle_moves: crate::puzzle::SHUFFLE_MOVES,
            image_url: "us.png".to_string(),
            give_up_delay_ms: 6000,
            give_up_immediate_max_width: 520.0,
            unlock_delay_ms: 500,
            swipe_threshold: crate::gallery::SWIPE_THRESHOLD,
            evasive_min_width: 600.0,
            notify_endpoint: None,
            notify_icon: "/favicon.png".to_string(),
            status_reset_ms: 1500,
            service_worker_url: "/sw.js".to_string(),
        }
    }
}

impl PageConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let cfg: PageConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }
        if self.swipe_threshold.is_nan() || self.swipe_threshold <= 0.0 {
            return Err(ConfigError::SwipeThreshold(self.swipe_threshold));
        }
        Ok(())
    }

    /// Whether the give-up button should appear without waiting.
    pub fn give_up_immediately(&self, viewport_width: f64) -> bool {
        viewport_width <= self.give_up_immediate_max_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = PageConfig::from_json("{}").unwrap();
        assert_eq!(cfg, PageConfig::default());
        assert_eq!(cfg.grid_size, 3);
        assert_eq!(cfg.shuffle_moves, 100);
    }

    #[test]
    fn partial_override() {
        let cfg =
            PageConfig::from_json(r#"{"grid_size":4,"notify_endpoint":"https://n.example/x"}"#)
                .unwrap();
        assert_eq!(cfg.grid_size, 4);
        assert_eq!(cfg.notify_endpoint.as_deref(), Some("https://n.example/x"));
        assert_eq!(cfg.image_url, "us.png");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            PageConfig::from_json(r#"{"grid_size":1}"#),
            Err(ConfigError::GridTooSmall(1))
        ));
        assert!(matches!(
            PageConfig::from_json(r#"{"swipe_threshold":0}"#),
            Err(ConfigError::SwipeThreshold(_))
        ));
        assert!(matches!(PageConfig::from_json("not json"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn give_up_breakpoint_is_inclusive() {
        let cfg = PageConfig::default();
        assert!(cfg.give_up_immediately(520.0));
        assert!(!cfg.give_up_immediately(521.0));
    }
}
