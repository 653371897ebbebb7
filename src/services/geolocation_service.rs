// ============================================================================
// GEOLOCATION SERVICE - navigator.geolocation del navegador
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Geolocation;

use crate::models::Location;
use crate::viewmodels::{GeolocationError, GeolocationSensor, PositionCallback, PositionOptions};

pub struct BrowserGeolocation {
    geolocation: Option<Geolocation>,
}

impl BrowserGeolocation {
    pub fn new() -> Self {
        let geolocation = web_sys::window().and_then(|w| w.navigator().geolocation().ok());
        if geolocation.is_none() {
            log::warn!("⚠️ navigator.geolocation no disponible");
        }
        Self { geolocation }
    }
}

fn number(target: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .and_then(|value| value.as_f64())
}

/// `GeolocationPosition` -> Location
fn parse_position(position: &JsValue) -> Result<Location, GeolocationError> {
    let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords"))
        .map_err(|_| GeolocationError::Other("position without coords".to_string()))?;
    let latitude = number(&coords, "latitude").unwrap_or(f64::NAN);
    let longitude = number(&coords, "longitude").unwrap_or(f64::NAN);

    Location::new(latitude, longitude).ok_or(GeolocationError::InvalidPosition(latitude, longitude))
}

/// `GeolocationPositionError` -> GeolocationError
fn parse_error(error: &JsValue) -> GeolocationError {
    let code = number(error, "code").unwrap_or(0.0) as u16;
    let message = js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_default();
    GeolocationError::from_code(code, message)
}

impl GeolocationSensor for BrowserGeolocation {
    fn is_supported(&self) -> bool {
        self.geolocation.is_some()
    }

    fn current_position(&self, options: PositionOptions, callback: PositionCallback) {
        let Some(geolocation) = &self.geolocation else {
            callback(Err(GeolocationError::Other("unsupported".to_string())));
            return;
        };

        // Solo uno de los dos callbacks llega a ejecutarse
        let pending = Rc::new(RefCell::new(Some(callback)));
        let deliver = |pending: Rc<RefCell<Option<PositionCallback>>>| {
            move |result: Result<Location, GeolocationError>| {
                let callback = pending.borrow_mut().take();
                if let Some(callback) = callback {
                    callback(result);
                }
            }
        };

        let on_success = {
            let deliver = deliver(pending.clone());
            Closure::once_into_js(move |position: JsValue| deliver(parse_position(&position)))
        };
        let on_error = {
            let deliver = deliver(pending.clone());
            Closure::once_into_js(move |error: JsValue| deliver(Err(parse_error(&error))))
        };

        let js_options = match serde_wasm_bindgen::to_value(&options) {
            Ok(value) => value.unchecked_into::<web_sys::PositionOptions>(),
            Err(e) => {
                deliver(pending)(Err(GeolocationError::Other(e.to_string())));
                return;
            }
        };

        log::info!("📍 Pidiendo posición del dispositivo...");
        if let Err(e) = geolocation.get_current_position_with_error_callback_and_options(
            on_success.unchecked_ref(),
            Some(on_error.unchecked_ref()),
            &js_options,
        ) {
            deliver(pending)(Err(GeolocationError::Other(format!("{:?}", e))));
        }
    }
}
