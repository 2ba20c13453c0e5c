//! City Mender core crate.
//!
//! Two independent browser mini-games share this crate:
//!
//! - [`reflex`]: the block repair game. A grid of city blocks destabilizes at
//!   random on a spawn timer; the player clicks unstable blocks to repair them
//!   before the clock runs out or the lives are gone.
//! - [`placement`]: the world fragment puzzle. Fragments are sealed into slots
//!   when their tags, climate and mass are compatible, each action spending
//!   reconstruction energy and moving the world metrics.
//!
//! Engines are plain Rust state and run natively under `cargo test`. The `dom`
//! submodules of each game mount an engine into a page and are what JS talks to
//! through [`ReflexGame`] and [`PlacementGame`].

use wasm_bindgen::prelude::*;

pub mod config;
mod dom;
pub mod error;
pub mod placement;
pub mod reflex;

pub use config::{PlacementConfig, ReflexConfig};
pub use error::Error;
pub use placement::dom::PlacementGame;
pub use placement::{FRAGMENTS, SLOTS};
pub use reflex::dom::ReflexGame;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub fn version() -> String {
    format!("city-mender {}", env!("CARGO_PKG_VERSION"))
}

// Millisecond clock used to seed fallback randomness in the browser.
#[allow(dead_code)]
pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
