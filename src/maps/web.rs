// ============================================================================
// GOOGLE MAPS - Implementación web de MapProvider / Geocoder
// ============================================================================
// Mapa + marcador arrastrable + autocomplete de Places sobre el input.
// Los closures de los listeners viven mientras viva el provider.
// ============================================================================

use std::cell::RefCell;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use super::options::{GeocodeRequest, LatLngLiteral, MapOptions, MarkerOptions};
use super::{GeocodeCallback, Geocoder, MapConfig, MapError, MapProvider, MarkerDragCallback, PlaceCallback};
use crate::models::{Location, PlaceResult};
use crate::utils::maps_ffi::{google_maps_loaded, Autocomplete, GeocoderHandle, GoogleMap, LatLng, Marker};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, MapError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| MapError::Unknown(e.to_string()))
}

pub struct GoogleMapProvider {
    map: GoogleMap,
    marker: Marker,
    autocomplete: Autocomplete,
    listeners: RefCell<Vec<Closure<dyn FnMut()>>>,
}

impl GoogleMapProvider {
    /// Crear mapa, marcador y autocomplete. Requiere el script de Google
    /// Maps (con `libraries=places`) ya cargado.
    pub fn initialize(container_id: &str, input_id: &str, config: &MapConfig) -> Result<Self, MapError> {
        if !google_maps_loaded() {
            return Err(MapError::ProviderMissing);
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| MapError::Unknown("no document".to_string()))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| MapError::Unknown(format!("#{} not found", container_id)))?;
        let input = document
            .get_element_by_id(input_id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .ok_or_else(|| MapError::Unknown(format!("#{} is not an input", input_id)))?;

        log::info!("🗺️ Inicializando Google Maps...");

        let map = GoogleMap::new(
            &container,
            &to_js(&MapOptions::from(config))?,
        );

        let marker = Marker::new(&to_js(&MarkerOptions {
            position: config.center.into(),
            draggable: true,
        })?);
        marker.set_map(&map);

        let autocomplete = Autocomplete::new(&input);
        autocomplete.bind_to("bounds", &map);

        log::info!("✅ Mapa inicializado en ({}, {})", config.center.latitude, config.center.longitude);

        Ok(Self {
            map,
            marker,
            autocomplete,
            listeners: RefCell::new(Vec::new()),
        })
    }

    fn keep(&self, closure: Closure<dyn FnMut()>) {
        self.listeners.borrow_mut().push(closure);
    }
}

impl MapProvider for GoogleMapProvider {
    fn pan_to(&self, location: Location) -> Result<(), MapError> {
        self.map.pan_to(&to_js(&LatLngLiteral::from(location))?);
        Ok(())
    }

    fn set_center(&self, location: Location) -> Result<(), MapError> {
        self.map.set_center(&to_js(&LatLngLiteral::from(location))?);
        Ok(())
    }

    fn set_marker_position(&self, location: Location) -> Result<(), MapError> {
        self.marker.set_position(&to_js(&LatLngLiteral::from(location))?);
        Ok(())
    }

    fn set_place_callback(&self, callback: PlaceCallback) -> Result<(), MapError> {
        let autocomplete = self.autocomplete.clone();
        let closure = Closure::wrap(Box::new(move || {
            callback(parse_place(&autocomplete.get_place()));
        }) as Box<dyn FnMut()>);

        self.autocomplete
            .add_listener("place_changed", closure.as_ref().unchecked_ref());
        self.keep(closure);
        Ok(())
    }

    fn set_marker_drag_callback(&self, callback: MarkerDragCallback) -> Result<(), MapError> {
        let marker = self.marker.clone();
        let closure = Closure::wrap(Box::new(move || {
            match marker
                .get_position()
                .and_then(|position| Location::new(position.lat(), position.lng()))
            {
                Some(location) => callback(location),
                None => log::warn!("⚠️ Marcador soltado sin posición válida"),
            }
        }) as Box<dyn FnMut()>);

        self.marker
            .add_listener("dragend", closure.as_ref().unchecked_ref());
        self.keep(closure);
        Ok(())
    }
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

/// `PlaceResult` de Google -> modelo. Sin `geometry` (texto libre sin
/// elegir sugerencia) la ubicación queda vacía.
fn parse_place(place: &JsValue) -> PlaceResult {
    let location = get(place, "geometry")
        .and_then(|geometry| get(&geometry, "location"))
        .and_then(|latlng| {
            let latlng: LatLng = latlng.unchecked_into();
            Location::new(latlng.lat(), latlng.lng())
        });

    PlaceResult {
        location,
        formatted_address: get(place, "formatted_address").and_then(|v| v.as_string()),
        name: get(place, "name").and_then(|v| v.as_string()),
    }
}

pub struct GoogleGeocoder {
    handle: GeocoderHandle,
}

impl GoogleGeocoder {
    pub fn new() -> Result<Self, MapError> {
        if !google_maps_loaded() {
            return Err(MapError::ProviderMissing);
        }
        Ok(Self {
            handle: GeocoderHandle::new(),
        })
    }
}

impl Geocoder for GoogleGeocoder {
    fn reverse_geocode(&self, location: Location, callback: GeocodeCallback) {
        let request = match to_js(&GeocodeRequest {
            location: location.into(),
        }) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("⚠️ Geocode request inválida: {}", e);
                callback(None);
                return;
            }
        };

        let on_result = Closure::once_into_js(move |results: JsValue, status: JsValue| {
            let address = if status.as_string().as_deref() == Some("OK") {
                results
                    .dyn_ref::<js_sys::Array>()
                    .map(|results| results.get(0))
                    .and_then(|first| get(&first, "formatted_address"))
                    .and_then(|address| address.as_string())
            } else {
                log::debug!("Geocode sin resultado: {:?}", status.as_string());
                None
            };
            callback(address);
        });

        self.handle.geocode(&request, on_result.unchecked_ref());
    }
}
