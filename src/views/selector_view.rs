// ============================================================================
// SELECTOR VIEW - Render del selector sobre el HTML de la página
// ============================================================================
// No crea elementos: solo cambia clases, textos y atributos de los que ya
// existen en index.html. Sin lógica de estado.
// ============================================================================

use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};

use crate::dom::{add_class, focus, remove_attribute, remove_class, require_element, require_input, set_attribute, set_text_content, toggle_class};
use crate::state::{PrimaryAction, SheetTransitions};
use crate::utils::constants::*;
use crate::viewmodels::SelectorView;

pub struct DomSelectorView {
    input: HtmlInputElement,
    clear_button: Element,
    locate_button: Element,
    primary_button: Element,
    overlay: Element,
    map: Element,
    sheet: Element,
    backdrop: Element,
    sheet_label: Element,
    sheet_coords: Element,
    sheet_turns: SheetTransitions,
}

impl DomSelectorView {
    pub fn new() -> Result<Self, JsValue> {
        Ok(Self {
            input: require_input(LOCATION_INPUT_ID)?,
            clear_button: require_element(CLEAR_INPUT_BUTTON_ID)?,
            locate_button: require_element(LOCATE_BUTTON_ID)?,
            primary_button: require_element(SET_LOCATION_BUTTON_ID)?,
            overlay: require_element(MAP_OVERLAY_ID)?,
            map: require_element(MAP_ID)?,
            sheet: require_element(SHEET_ID)?,
            backdrop: require_element(SHEET_BACKDROP_ID)?,
            sheet_label: require_element(SHEET_LABEL_ID)?,
            sheet_coords: require_element(SHEET_COORDS_ID)?,
            sheet_turns: SheetTransitions::default(),
        })
    }

    fn apply(&self, what: &str, result: Result<(), JsValue>) {
        report(what, result);
    }
}

fn report(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("⚠️ [VIEW] {}: {:?}", what, e);
    }
}

impl SelectorView for DomSelectorView {
    fn show_preview(&self, label: &str, coords: &str) {
        set_text_content(&self.sheet_label, label);
        set_text_content(&self.sheet_coords, coords);
    }

    fn clear_preview(&self) {
        set_text_content(&self.sheet_label, "");
        set_text_content(&self.sheet_coords, "");
    }

    fn set_primary_action(&self, action: PrimaryAction, label: &str) {
        set_text_content(&self.primary_button, label);
        let result = if action.is_enabled() {
            remove_attribute(&self.primary_button, "disabled")
        } else {
            set_attribute(&self.primary_button, "disabled", "")
        };
        self.apply("primary button", result);
    }

    fn set_attention(&self, visible: bool) {
        self.apply("overlay", toggle_class(&self.overlay, OVERLAY_VISIBLE_CLASS, visible));
        self.apply("pulse", toggle_class(&self.input, PULSE_CLASS, visible));
    }

    fn set_clear_button_visible(&self, visible: bool) {
        self.apply("clear button", toggle_class(&self.clear_button, CLEAR_BUTTON_VISIBLE_CLASS, visible));
    }

    fn set_input_value(&self, value: &str) {
        self.input.set_value(value);
    }

    fn focus_input(&self) {
        self.apply("focus", focus(&self.input));
    }

    fn set_keyboard_up(&self, up: bool) {
        // Con el teclado en pantalla los botones suben sobre él
        self.apply("keyboard", toggle_class(&self.primary_button, KEYBOARD_UP_CLASS, up));
        self.apply("keyboard", toggle_class(&self.locate_button, KEYBOARD_UP_CLASS, up));
        self.apply("map blur", toggle_class(&self.map, KEYBOARD_BLUR_CLASS, up));
    }

    fn open_sheet(&self) {
        let turn = self.sheet_turns.begin();

        self.apply("sheet", add_class(&self.sheet, SHEET_VISIBLE_CLASS));
        self.apply("backdrop", add_class(&self.backdrop, SHEET_VISIBLE_CLASS));
        self.apply("sheet aria", set_attribute(&self.sheet, "aria-hidden", "false"));

        // `open` en el siguiente tick, con `visible` ya pintado
        let sheet = self.sheet.clone();
        let backdrop = self.backdrop.clone();
        Timeout::new(0, move || {
            if !turn.is_current() {
                return;
            }
            report("sheet", add_class(&sheet, SHEET_OPEN_CLASS));
            report("backdrop", add_class(&backdrop, SHEET_OPEN_CLASS));
        })
        .forget();
    }

    fn close_sheet(&self, transition: Duration) {
        let turn = self.sheet_turns.begin();

        self.apply("sheet", remove_class(&self.sheet, SHEET_OPEN_CLASS));
        self.apply("backdrop", remove_class(&self.backdrop, SHEET_OPEN_CLASS));

        let sheet = self.sheet.clone();
        let backdrop = self.backdrop.clone();
        let millis = u32::try_from(transition.as_millis()).unwrap_or(u32::MAX);

        Timeout::new(millis, move || {
            if !turn.is_current() {
                return;
            }
            report("sheet aria", set_attribute(&sheet, "aria-hidden", "true"));
            report("sheet", remove_class(&sheet, SHEET_VISIBLE_CLASS));
            report("backdrop", remove_class(&backdrop, SHEET_VISIBLE_CLASS));
        })
        .forget();
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            self.apply("alert", window.alert_with_message(message));
        }
    }

    fn navigate(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            self.apply("navigate", window.location().set_href(url));
        }
    }
}
