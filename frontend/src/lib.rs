use wasm_bindgen::prelude::*;
use web_sys::{Document, Event};

pub mod config;
pub mod easter_egg;
pub mod error;
pub mod theme;
pub mod effects {
    pub mod counter;
    pub mod particles;
    pub mod reveal;
}
pub mod nav {
    pub mod active_section;
    pub mod menu;
}
pub mod utils {
    pub mod dom;
    pub mod viewport;
}

use config::Config;
use error::EnhanceError;

fn report(component: &str, result: Result<(), EnhanceError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_missing_element() => {
            log::debug!("Skipping {}: {}", component, e);
        }
        Err(e) => log::warn!("{} failed to start: {}", component, e),
    }
}

/// Wires every enhancement. Each one stands alone, so a failure in one
/// leaves the rest running.
pub fn enhance(config: &Config) {
    report("particles", effects::particles::init(&config.particles));
    report("menu", nav::menu::init());
    report("reveal", effects::reveal::init(&config.reveal));
    report("active section", nav::active_section::init(&config.nav));
    report("counters", effects::counter::init(&config.counter));
    report("theme", theme::init(&config.theme));
    report("easter egg", easter_egg::init(&config.easter_egg));
}

fn load_config(document: &Document) -> Config {
    match Config::from_document(document) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}, using defaults", e);
            Config::default()
        }
    }
}

fn run() {
    let document = match utils::dom::document() {
        Ok(document) => document,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };
    let config = load_config(&document);
    log::set_max_level(config.log_level().to_level_filter());
    enhance(&config);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // The console logger accepts everything; the level from the page config
    // is applied through the global max level once the config is read.
    wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));
    log::set_max_level(log::LevelFilter::Info);

    let document = utils::dom::document().map_err(|e| JsValue::from_str(&e.to_string()))?;
    if document.ready_state() == "loading" {
        utils::dom::listen(document.as_ref(), "DOMContentLoaded", |_: Event| run())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
    } else {
        run();
    }
    Ok(())
}
