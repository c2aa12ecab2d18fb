//! Jewel Search Web App (Leptos + WASM)

mod app;
mod components;
pub mod api;
pub mod logging;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init(if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    leptos::mount::mount_to_body(app::App);
}
