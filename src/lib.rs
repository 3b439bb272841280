//! Heart Gate core crate.
//!
//! A sliding-tile puzzle guards the page; solving it (or giving up) reveals a
//! yes/no question, a virtual-hug button and a small media gallery. The puzzle
//! and gallery state machines are plain Rust and test natively; the `web`
//! module binds them to the DOM when built for wasm32.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod gallery;
pub mod notify;
pub mod prompt;
pub mod puzzle;
#[cfg(target_arch = "wasm32")]
mod web;

pub use config::{ConfigError, PageConfig};
pub use controller::{Controller, Effect, PageInput};
pub use gallery::{Gallery, GalleryState, MediaItem, MediaKind};
pub use puzzle::{MoveOutcome, Puzzle, PuzzleState};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Page entrypoint, called from JS once the DOM is ready.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    web::start_page()
}
