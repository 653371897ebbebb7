// ============================================================================
// EVENT HANDLING - Helpers para registrar listeners
// ============================================================================
// GESTIÓN DE MEMORY LEAKS:
// - Los elementos del selector viven toda la vida de la página, así que
//   closure.forget() es seguro para sus listeners.
// - Los listeners globales (document) solo se registran UNA VEZ al arrancar.
// ============================================================================

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, FocusEvent, InputEvent, KeyboardEvent, MouseEvent};

fn listen<E, F>(target: &EventTarget, event_type: &str, handler: F) -> Result<(), JsValue>
where
    E: wasm_bindgen::convert::FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
    // Nota: closure.forget() es necesario para mantener el closure vivo en Rust WASM
    closure.forget();
    Ok(())
}

/// Helper para crear click handler simple
pub fn on_click<F>(target: &EventTarget, handler: F) -> Result<(), JsValue>
where
    F: FnMut(MouseEvent) + 'static,
{
    listen(target, "click", handler)
}

/// Helper para crear input handler simple
pub fn on_input<F>(target: &EventTarget, handler: F) -> Result<(), JsValue>
where
    F: FnMut(InputEvent) + 'static,
{
    listen(target, "input", handler)
}

pub fn on_focus<F>(target: &EventTarget, handler: F) -> Result<(), JsValue>
where
    F: FnMut(FocusEvent) + 'static,
{
    listen(target, "focus", handler)
}

pub fn on_blur<F>(target: &EventTarget, handler: F) -> Result<(), JsValue>
where
    F: FnMut(FocusEvent) + 'static,
{
    listen(target, "blur", handler)
}

pub fn on_keydown<F>(target: &EventTarget, handler: F) -> Result<(), JsValue>
where
    F: FnMut(KeyboardEvent) + 'static,
{
    listen(target, "keydown", handler)
}

/// Listener genérico (p.ej. `load` en window)
pub fn on_event<F>(target: &EventTarget, event_type: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    listen(target, event_type, handler)
}
