//! WASM bindings for the phase-space portrait.
//!
//! The JavaScript side owns the canvas, fonts, the animation loop and raw input;
//! it forwards pointer presses and the confirm key here and draws whatever the
//! portrait hands back each frame.

use wasm_bindgen::prelude::*;

mod portrait;

pub use portrait::WasmPhasePortrait;

#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    init_logger();
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}
