#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod app;
pub mod bootstrap;
pub mod collator;
pub mod components;
pub mod context;
pub mod directory;
pub mod dom;
pub mod i18n;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let Some(config) = bootstrap::BootstrapConfig::from_document() else {
        dom::console_error("Purchase form bootstrap missing; nothing to render");
        return;
    };
    if let Some(locale) = config.locale.as_deref() {
        i18n::set_lang(locale);
    }
    yew::Renderer::<app::App>::with_props(app::AppProps { config }).render();
}
