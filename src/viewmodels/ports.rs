// ============================================================================
// PORTS - Capacidades que el selector necesita del entorno
// ============================================================================
// El viewmodel solo habla con estos traits. En el navegador los implementan
// `views::DomSelectorView`, `dom::DomEventSource` y `BrowserGeolocation`;
// en los tests, fakes que graban las llamadas.
// ============================================================================

use std::rc::Rc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::models::{Location, UiEvent};
use crate::state::PrimaryAction;

/// Lado "render" del selector
pub trait SelectorView {
    /// Texto del preview en el sheet de revisión
    fn show_preview(&self, label: &str, coords: &str);
    fn clear_preview(&self);

    fn set_primary_action(&self, action: PrimaryAction, label: &str);

    /// Overlay sobre el mapa + pulse en el input
    fn set_attention(&self, visible: bool);

    fn set_clear_button_visible(&self, visible: bool);
    fn set_input_value(&self, value: &str);
    fn focus_input(&self);

    /// Teclado en pantalla: botones arriba, mapa difuminado
    fn set_keyboard_up(&self, up: bool);

    fn open_sheet(&self);
    /// Quita el estado abierto y oculta el sheet después de `transition`
    fn close_sheet(&self, transition: Duration);

    fn alert(&self, message: &str);
    fn navigate(&self, url: &str);
}

pub type UiEventHandler = Rc<dyn Fn(UiEvent)>;

/// Fuente de eventos de UI
pub trait UiEventSource {
    fn subscribe(&self, handler: UiEventHandler);
}

/// Opciones de `getCurrentPosition` (se serializan tal cual a JS)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: u32,
    pub maximum_age: u32,
}

impl PositionOptions {
    pub fn from_config(config: &crate::config::GeolocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.high_accuracy,
            timeout: config.timeout_ms,
            maximum_age: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeolocationError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("position unavailable")]
    PositionUnavailable,
    #[error("timed out")]
    Timeout,
    #[error("invalid position reported ({0}, {1})")]
    InvalidPosition(f64, f64),
    #[error("geolocation error: {0}")]
    Other(String),
}

impl GeolocationError {
    /// `GeolocationPositionError.code`
    pub fn from_code(code: u16, message: String) -> Self {
        match code {
            1 => GeolocationError::PermissionDenied,
            2 => GeolocationError::PositionUnavailable,
            3 => GeolocationError::Timeout,
            _ => GeolocationError::Other(message),
        }
    }
}

pub type PositionCallback = Box<dyn FnOnce(Result<Location, GeolocationError>)>;

/// Sensor de geolocalización del dispositivo
pub trait GeolocationSensor {
    fn is_supported(&self) -> bool;
    fn current_position(&self, options: PositionOptions, callback: PositionCallback);
}
