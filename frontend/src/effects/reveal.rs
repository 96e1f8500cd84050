use crate::config::RevealConfig;
use crate::error::EnhanceError;
use crate::utils::dom;
use crate::utils::viewport::{self, ViewportOptions, ViewportSupport};

pub const REVEAL_CLASS: &str = "reveal";
pub const VISIBLE_CLASS: &str = "visible";

/// Adds `visible` to each `.reveal` element the first time it scrolls into view.
pub fn init(config: &RevealConfig) -> Result<(), EnhanceError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let targets = dom::query_all(&document, &format!(".{}", REVEAL_CLASS))?;
    let count = targets.len();

    let options = ViewportOptions {
        threshold: config.threshold,
        root_margin: Some(config.root_margin.clone()),
    };
    let support = viewport::on_first_visible(&window, targets, &options, |el| {
        if let Err(e) = el.class_list().add_1(VISIBLE_CLASS) {
            log::warn!("Failed to reveal element: {:?}", e);
        }
    })?;

    match support {
        ViewportSupport::Observer => log::info!("Watching {} reveal elements", count),
        ViewportSupport::Unavailable => {
            log::info!("No IntersectionObserver, revealed {} elements up front", count)
        }
    }
    Ok(())
}
