//! Light/dark theme switch backed by `localStorage`.

use web_sys::{Event, HtmlElement, HtmlInputElement, Storage, Window};

use crate::config::ThemeConfig;
use crate::error::EnhanceError;
use crate::utils::dom;

pub const TOGGLE_ID: &str = "toggle-tema";
pub const LIGHT_CLASS: &str = "modo-claro";
pub const PREFERS_LIGHT_QUERY: &str = "(prefers-color-scheme: light)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_stored(&self) -> &'static str {
        match self {
            Theme::Light => "claro",
            Theme::Dark => "oscuro",
        }
    }

    /// Theme for page load. Any stored value other than `claro` means dark;
    /// with nothing stored the OS preference decides.
    pub fn resolve(stored: Option<&str>, prefers_light: bool) -> Self {
        match stored {
            Some("claro") => Theme::Light,
            Some(value) if !value.is_empty() => Theme::Dark,
            _ if prefers_light => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn from_checked(checked: bool) -> Self {
        if checked { Theme::Light } else { Theme::Dark }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, Theme::Light)
    }
}

fn storage(window: &Window) -> Option<Storage> {
    match window.local_storage() {
        Ok(storage) => storage,
        Err(e) => {
            log::warn!("localStorage unavailable: {:?}", e);
            None
        }
    }
}

fn prefers_light(window: &Window) -> bool {
    window
        .match_media(PREFERS_LIGHT_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn apply(body: &HtmlElement, theme: Theme) -> Result<(), EnhanceError> {
    body.class_list().toggle_with_force(LIGHT_CLASS, theme.is_light())?;
    Ok(())
}

fn persist(window: &Window, key: &str, theme: Theme) {
    let Some(storage) = storage(window) else {
        return;
    };
    if let Err(e) = storage.set_item(key, theme.as_stored()) {
        log::warn!("Failed to save theme preference: {:?}", e);
    }
}

pub fn init(config: &ThemeConfig) -> Result<(), EnhanceError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let toggle: HtmlInputElement = dom::by_id(&document, TOGGLE_ID)?;
    let body = document.body().ok_or_else(|| EnhanceError::missing("body"))?;

    let stored = storage(&window).and_then(|s| s.get_item(&config.storage_key).ok().flatten());
    let theme = Theme::resolve(stored.as_deref(), prefers_light(&window));
    if theme.is_light() {
        apply(&body, theme)?;
        toggle.set_checked(true);
    }
    log::info!("Theme toggle ready ({:?})", theme);

    let key = config.storage_key.clone();
    let win = window.clone();
    let control = toggle.clone();
    dom::listen(toggle.as_ref(), "change", move |_: Event| {
        let theme = Theme::from_checked(control.checked());
        if let Err(e) = apply(&body, theme) {
            log::warn!("Failed to apply theme: {}", e);
        }
        persist(&win, &key, theme);
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_claro_wins_over_os() {
        assert_eq!(Theme::resolve(Some("claro"), false), Theme::Light);
    }

    #[test]
    fn stored_oscuro_wins_over_os() {
        assert_eq!(Theme::resolve(Some("oscuro"), true), Theme::Dark);
    }

    #[test]
    fn nothing_stored_follows_os() {
        assert_eq!(Theme::resolve(None, true), Theme::Light);
        assert_eq!(Theme::resolve(None, false), Theme::Dark);
        assert_eq!(Theme::resolve(Some(""), true), Theme::Light);
    }

    #[test]
    fn unknown_stored_value_is_dark() {
        assert_eq!(Theme::resolve(Some("sepia"), true), Theme::Dark);
    }

    #[test]
    fn toggling_off_stores_oscuro() {
        let theme = Theme::from_checked(false);
        assert_eq!(theme.as_stored(), "oscuro");
        assert!(!theme.is_light());
        assert_eq!(Theme::from_checked(true).as_stored(), "claro");
    }
}
