use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Document, Element, EventTarget, NodeList, Window};

use crate::error::EnhanceError;

pub fn window() -> Result<Window, EnhanceError> {
    web_sys::window().ok_or(EnhanceError::NoWindow)
}

pub fn document() -> Result<Document, EnhanceError> {
    window()?.document().ok_or(EnhanceError::NoDocument)
}

/// Looks up an element by id and casts it to the expected element type.
/// A node with the right id but the wrong type counts as missing.
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, EnhanceError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or_else(|| EnhanceError::missing(&format!("#{}", id)))
}

pub fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, EnhanceError> {
    Ok(elements(document.query_selector_all(selector)?))
}

/// Whether the window exposes a global constructor such as `IntersectionObserver`.
pub fn has_global(window: &Window, name: &str) -> bool {
    js_sys::Reflect::has(window.as_ref(), &JsValue::from_str(name)).unwrap_or(false)
}

/// Adds an event listener that lives as long as the page.
pub fn listen<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), EnhanceError>
where
    E: FromWasmAbi + 'static,
{
    let callback = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Same as [`listen`] but registered as passive, so the handler can never
/// block scrolling.
pub fn listen_passive<E>(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), EnhanceError>
where
    E: FromWasmAbi + 'static,
{
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    let callback = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}

/// Runs `frame` on every animation frame, passing the frame timestamp, for
/// as long as it returns `true`.
pub fn animation_loop<F>(window: &Window, frame: F) -> Result<(), EnhanceError>
where
    F: FnMut(f64) -> bool + 'static,
{
    schedule_frame(window, frame)
}

fn schedule_frame<F>(window: &Window, mut frame: F) -> Result<(), EnhanceError>
where
    F: FnMut(f64) -> bool + 'static,
{
    let win = window.clone();
    let callback = Closure::once_into_js(move |timestamp: f64| {
        if frame(timestamp) {
            if let Err(e) = schedule_frame(&win, frame) {
                log::warn!("Animation loop stopped: {}", e);
            }
        }
    });
    window.request_animation_frame(callback.unchecked_ref())?;
    Ok(())
}

/// Runs `f` after two animation frames, so styles applied before the call
/// have been committed and a CSS transition can start from them.
pub fn after_two_frames(window: &Window, f: impl FnOnce() + 'static) -> Result<(), EnhanceError> {
    let mut f = Some(f);
    let mut frames = 0;
    animation_loop(window, move |_| {
        frames += 1;
        if frames < 2 {
            return true;
        }
        if let Some(f) = f.take() {
            f();
        }
        false
    })
}
