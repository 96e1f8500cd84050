//! Konami code: ↑ ↑ ↓ ↓ ← → ← → b a pops a toast.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, KeyboardEvent, Window};

use crate::config::EasterEggConfig;
use crate::error::EnhanceError;
use crate::utils::dom;

pub const SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

pub const TOAST_TEXT: &str = "🌱 ¡KernelGarden activa! Colombia 🇨🇴";

const TOAST_HIDDEN: &str = "translateX(-50%) translateY(80px)";
const TOAST_SHOWN: &str = "translateX(-50%) translateY(0)";

const TOAST_STYLE: &[&str] = &[
    "position:fixed",
    "bottom:28px",
    "left:50%",
    "transform:translateX(-50%) translateY(80px)",
    "background:linear-gradient(135deg,#D4A017,#c48c10)",
    "color:#0A0B0E",
    "font-family:var(--font-display,sans-serif)",
    "font-size:0.88rem",
    "font-weight:800",
    "padding:14px 28px",
    "border-radius:999px",
    "box-shadow:0 8px 28px rgba(212,160,23,0.5)",
    "z-index:9999",
    "transition:transform 0.4s ease, opacity 0.4s ease",
    "opacity:0",
    "letter-spacing:1px",
];

/// Strict sequence matcher: one wrong key sends it back to the start.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    sequence: Vec<String>,
    cursor: usize,
}

impl SequenceMatcher {
    pub fn new<S: AsRef<str>>(sequence: &[S]) -> Self {
        Self {
            sequence: sequence.iter().map(|k| k.as_ref().to_string()).collect(),
            cursor: 0,
        }
    }

    #[cfg(test)]
    fn progress(&self) -> usize {
        self.cursor
    }

    /// Feeds one key. Returns `true` when it completes the sequence.
    pub fn feed(&mut self, key: &str) -> bool {
        if self.sequence.get(self.cursor).map(String::as_str) != Some(key) {
            self.cursor = 0;
            return false;
        }
        self.cursor += 1;
        if self.cursor == self.sequence.len() {
            self.cursor = 0;
            return true;
        }
        false
    }
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::new(&SEQUENCE)
    }
}

fn set_motion(toast: &HtmlElement, transform: &str, opacity: &str) {
    let style = toast.style();
    if let Err(e) = style
        .set_property("transform", transform)
        .and_then(|_| style.set_property("opacity", opacity))
    {
        log::warn!("Failed to animate toast: {:?}", e);
    }
}

/// Slides a toast in, holds it for `dwell_ms`, slides it out and removes it.
/// Each call makes its own toast.
pub fn show_toast(
    window: &Window,
    document: &Document,
    config: &EasterEggConfig,
) -> Result<(), EnhanceError> {
    let toast: HtmlElement = document.create_element("div")?.unchecked_into();
    toast.set_attribute("role", "alert")?;
    toast.style().set_css_text(&TOAST_STYLE.join(";"));
    toast.set_text_content(Some(TOAST_TEXT));
    document
        .body()
        .ok_or_else(|| EnhanceError::missing("body"))?
        .append_child(&toast)?;

    {
        let toast = toast.clone();
        dom::after_two_frames(window, move || set_motion(&toast, TOAST_SHOWN, "1"))?;
    }

    let exit_ms = config.exit_ms;
    Timeout::new(config.dwell_ms, move || {
        set_motion(&toast, TOAST_HIDDEN, "0");
        Timeout::new(exit_ms, move || toast.remove()).forget();
    })
    .forget();
    Ok(())
}

pub fn init(config: &EasterEggConfig) -> Result<(), EnhanceError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let matcher = Rc::new(RefCell::new(SequenceMatcher::default()));

    let config = config.clone();
    let doc = document.clone();
    dom::listen(document.as_ref(), "keydown", move |e: KeyboardEvent| {
        if !matcher.borrow_mut().feed(&e.key()) {
            return;
        }
        log::debug!("Easter egg sequence entered");
        if let Err(e) = show_toast(&window, &doc, &config) {
            log::warn!("Failed to show easter egg toast: {}", e);
        }
    })?;
    Ok(())
}
