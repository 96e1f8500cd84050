//! Highlights the navbar link for the section currently scrolled to.

use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement};

use crate::config::NavConfig;
use crate::error::EnhanceError;
use crate::utils::dom;

pub const SECTION_SELECTOR: &str = "section[id]";
pub const LINK_SELECTOR: &str = ".nav-links a[href^=\"#\"]";

#[derive(Debug, Clone, PartialEq)]
pub struct SectionMark {
    pub id: String,
    pub top: f64,
}

/// The last section, in document order, whose top is no more than `offset`
/// pixels below the scroll position.
pub fn current_section(scroll_y: f64, sections: &[SectionMark], offset: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|s| scroll_y >= s.top - offset)
        .map(|s| s.id.as_str())
}

/// Section id a `#anchor` link points at.
pub fn link_target(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

fn marks(sections: &[HtmlElement]) -> Vec<SectionMark> {
    sections
        .iter()
        .map(|s| SectionMark {
            id: s.id(),
            top: s.offset_top() as f64,
        })
        .collect()
}

fn highlight(links: &[Element], current: Option<&str>) -> Result<(), EnhanceError> {
    for link in links {
        let href = link.get_attribute("href").unwrap_or_default();
        if current == Some(link_target(&href)) {
            link.set_attribute("aria-current", "page")?;
        } else {
            link.remove_attribute("aria-current")?;
        }
    }
    Ok(())
}

pub fn init(config: &NavConfig) -> Result<(), EnhanceError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let sections: Vec<HtmlElement> = dom::query_all(&document, SECTION_SELECTOR)?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
        .collect();
    let links = dom::query_all(&document, LINK_SELECTOR)?;
    if sections.is_empty() {
        return Err(EnhanceError::missing(SECTION_SELECTOR));
    }
    if links.is_empty() {
        return Err(EnhanceError::missing(LINK_SELECTOR));
    }

    let offset = config.section_offset;
    let win = window.clone();
    // Offsets are read fresh on every event.
    dom::listen_passive(window.as_ref(), "scroll", move |_: Event| {
        let scroll_y = win.scroll_y().unwrap_or(0.0);
        let marks = marks(&sections);
        if let Err(e) = highlight(&links, current_section(scroll_y, &marks, offset)) {
            log::warn!("Failed to update active nav link: {}", e);
        }
    })?;

    log::info!("Active section highlighting ready");
    Ok(())
}
