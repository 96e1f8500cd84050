//! Fire-once viewport entry, shared by the reveal and counter effects.

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use crate::error::EnhanceError;
use crate::utils::dom;

/// Remembers which keys have already been let through.
#[derive(Debug)]
pub struct OnceGate<K> {
    fired: Vec<K>,
}

impl<K: PartialEq> OnceGate<K> {
    pub fn new() -> Self {
        Self { fired: Vec::new() }
    }

    /// Returns `true` the first time a key is seen and `false` ever after.
    pub fn admit(&mut self, key: K) -> bool {
        if self.fired.contains(&key) {
            return false;
        }
        self.fired.push(key);
        true
    }

    #[cfg(test)]
    fn fired(&self) -> usize {
        self.fired.len()
    }
}

impl<K: PartialEq> Default for OnceGate<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct ViewportOptions {
    pub threshold: f64,
    pub root_margin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportSupport {
    Observer,
    Unavailable,
}

impl ViewportSupport {
    pub fn detect(window: &Window) -> Self {
        if dom::has_global(window, "IntersectionObserver") {
            ViewportSupport::Observer
        } else {
            ViewportSupport::Unavailable
        }
    }
}

/// Calls `on_visible` once per target, the first time it enters the
/// viewport. Without `IntersectionObserver` every target is treated as
/// visible right away.
pub fn on_first_visible<F>(
    window: &Window,
    targets: Vec<Element>,
    options: &ViewportOptions,
    mut on_visible: F,
) -> Result<ViewportSupport, EnhanceError>
where
    F: FnMut(&Element) + 'static,
{
    let support = ViewportSupport::detect(window);
    if support == ViewportSupport::Unavailable {
        for target in &targets {
            on_visible(target);
        }
        return Ok(support);
    }

    let mut gate = OnceGate::new();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                observer.unobserve(&target);
                if gate.admit(target.clone()) {
                    on_visible(&target);
                }
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    if let Some(margin) = &options.root_margin {
        init.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();

    for target in &targets {
        observer.observe(target);
    }
    Ok(support)
}
