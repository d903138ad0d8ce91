//! Pin the Dot core crate.
//!
//! A single-page browser game: each round hides a target somewhere on the
//! canvas, reveals it after a short cover delay, and gives the player one
//! click and five seconds to pin it. Scores accumulate on a local
//! leaderboard. `start_game()` wires everything into the DOM; the `round`
//! and `session` modules are pure logic and run under native `cargo test`.

use wasm_bindgen::prelude::*;

mod game;
pub mod round;
pub mod session;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Entry point called from JS once the module is loaded.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start_pin_the_dot()
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
