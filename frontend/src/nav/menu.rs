use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent, Node};

use crate::error::EnhanceError;
use crate::utils::dom;

pub const BUTTON_ID: &str = "btn-menu";
pub const MENU_ID: &str = "nav-links";
pub const OPEN_CLASS: &str = "abierto";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }

    pub fn aria_hidden(&self) -> &'static str {
        if self.open { "false" } else { "true" }
    }
}

#[derive(Clone)]
struct MenuController {
    button: Element,
    menu: Element,
    state: Rc<Cell<MenuState>>,
}

impl MenuController {
    fn update(&self, change: impl FnOnce(&mut MenuState)) {
        let mut state = self.state.get();
        change(&mut state);
        self.state.set(state);
        if let Err(e) = self.apply(state) {
            log::warn!("Failed to update menu: {}", e);
        }
    }

    fn apply(&self, state: MenuState) -> Result<(), EnhanceError> {
        self.menu.class_list().toggle_with_force(OPEN_CLASS, state.is_open())?;
        self.button.class_list().toggle_with_force(OPEN_CLASS, state.is_open())?;
        self.button.set_attribute("aria-expanded", state.aria_expanded())?;
        self.menu.set_attribute("aria-hidden", state.aria_hidden())?;
        Ok(())
    }

    fn contains(&self, target: Option<&Node>) -> bool {
        self.button.contains(target) || self.menu.contains(target)
    }
}

/// Wires the mobile menu: the trigger toggles it, and a link click or any
/// click outside the trigger and menu closes it.
pub fn init() -> Result<(), EnhanceError> {
    let document = dom::document()?;
    let button: Element = dom::by_id(&document, BUTTON_ID)?;
    let menu: Element = dom::by_id(&document, MENU_ID)?;

    // Start from whatever the markup says.
    let initial = MenuState {
        open: menu.class_list().contains(OPEN_CLASS),
    };
    let controller = MenuController {
        button: button.clone(),
        menu: menu.clone(),
        state: Rc::new(Cell::new(initial)),
    };

    {
        let controller = controller.clone();
        dom::listen(button.as_ref(), "click", move |_: MouseEvent| {
            controller.update(MenuState::toggle);
        })?;
    }

    for link in dom::elements(menu.query_selector_all("a")?) {
        let controller = controller.clone();
        dom::listen(link.as_ref(), "click", move |_: MouseEvent| {
            controller.update(MenuState::close);
        })?;
    }

    dom::listen(document.as_ref(), "click", move |e: MouseEvent| {
        let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
        if !controller.contains(target.as_ref()) {
            controller.update(MenuState::close);
        }
    })?;

    log::info!("Mobile menu ready");
    Ok(())
}
