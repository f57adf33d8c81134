pub mod assets;
pub mod config;
pub mod meshes;
pub mod render;
pub mod scene;
pub mod viewer;

#[cfg(feature = "web")]
pub mod app;
#[cfg(feature = "web")]
pub mod components;
#[cfg(feature = "web")]
pub mod pages;
#[cfg(feature = "web")]
pub mod routes;

#[cfg(feature = "web")]
pub use crate::app::App;

#[cfg(feature = "web")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    use leptos::*;

    console_error_panic_hook::set_once();
    // fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);

    leptos::mount::mount_to_body(|| view! { <App/> });
}
