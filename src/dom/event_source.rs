// ============================================================================
// DOM EVENT SOURCE - Traduce eventos del DOM a UiEvent
// ============================================================================
// Los listeners de document (click fuera, Escape) se registran en cada
// subscribe: solo hay un suscriptor, el selector, y se suscribe una vez.
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlInputElement, Node};

use super::element::{document, query_selector, require_element, require_input};
use super::events::{on_blur, on_click, on_focus, on_input, on_keydown};
use crate::models::{CloseTrigger, UiEvent};
use crate::utils::constants::*;
use crate::viewmodels::{UiEventHandler, UiEventSource};

pub struct DomEventSource {
    input: HtmlInputElement,
    search_container: Element,
    clear_button: Element,
    locate_button: Element,
    primary_button: Element,
    confirm_button: Element,
    change_button: Element,
    close_button: Element,
    backdrop: Element,
}

impl DomEventSource {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self {
            input: require_input(LOCATION_INPUT_ID)?,
            search_container: require_element(SEARCH_CONTAINER_ID)?,
            clear_button: require_element(CLEAR_INPUT_BUTTON_ID)?,
            locate_button: require_element(LOCATE_BUTTON_ID)?,
            primary_button: require_element(SET_LOCATION_BUTTON_ID)?,
            confirm_button: require_element(SHEET_CONFIRM_BUTTON_ID)?,
            change_button: require_element(SHEET_CHANGE_BUTTON_ID)?,
            close_button: require_element(SHEET_CLOSE_BUTTON_ID)?,
            backdrop: require_element(SHEET_BACKDROP_ID)?,
        })
    }

    fn wire(&self, handler: UiEventHandler) -> Result<(), JsValue> {
        let emit = |event: UiEvent| {
            let handler = handler.clone();
            move || handler(event.clone())
        };

        // Input de búsqueda
        let focus = emit(UiEvent::InputFocus);
        on_focus(&self.input, move |_| focus())?;
        let blur = emit(UiEvent::InputBlur);
        on_blur(&self.input, move |_| blur())?;
        {
            let handler = handler.clone();
            let input = self.input.clone();
            on_input(&self.input, move |_| handler(UiEvent::InputChanged(input.value())))?;
        }

        // Botones
        let buttons = [
            (&self.clear_button, UiEvent::ClearInput),
            (&self.locate_button, UiEvent::LocateMe),
            (&self.primary_button, UiEvent::PrimaryAction),
            (&self.confirm_button, UiEvent::ConfirmHandoff),
            (&self.change_button, UiEvent::CloseSheet(CloseTrigger::Change)),
            (&self.close_button, UiEvent::CloseSheet(CloseTrigger::Generic)),
            (&self.backdrop, UiEvent::CloseSheet(CloseTrigger::Generic)),
        ];
        for (button, event) in buttons {
            let fire = emit(event);
            on_click(button, move |_| fire())?;
        }

        let document = document().ok_or_else(|| JsValue::from_str("No document"))?;

        // Click fuera de la búsqueda
        {
            let handler = handler.clone();
            let search_container = self.search_container.clone();
            on_click(&document, move |event| {
                let inside_search = event_inside(&event, &search_container);
                let inside_suggestions = query_selector(SUGGESTIONS_SELECTOR)
                    .ok()
                    .flatten()
                    .map(|suggestions| event_inside(&event, &suggestions))
                    .unwrap_or(false);
                handler(UiEvent::OutsideClick {
                    inside_search,
                    inside_suggestions,
                });
            })?;
        }

        on_keydown(&document, move |event| {
            if event.key() == "Escape" {
                handler(UiEvent::Escape);
            }
        })?;

        Ok(())
    }
}

fn event_inside(event: &Event, container: &Element) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Node>().ok())
        .map(|node| container.contains(Some(&node)))
        .unwrap_or(false)
}

impl UiEventSource for DomEventSource {
    fn subscribe(&self, handler: UiEventHandler) {
        if let Err(e) = self.wire(Rc::clone(&handler)) {
            log::error!("❌ No se pudieron registrar los eventos del selector: {:?}", e);
        }
    }
}
