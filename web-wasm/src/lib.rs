//! Soil Search Web App (Leptos + WASM)

mod api;
mod app;
mod components;
mod dom;
mod shell;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(app::App);

    if let Err(e) = shell::start() {
        gloo::console::error!("Failed to start Soil Search:", e.to_string());
    }
}
