// ============================================================================
// GOOGLE MAPS FFI - Foreign Function Interface para JavaScript
// ============================================================================
// Solo bindings a google.maps.* - Sin estado, sin lógica
// ============================================================================

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Map)]
    pub type GoogleMap;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Map")]
    pub fn new(container: &Element, options: &JsValue) -> GoogleMap;

    #[wasm_bindgen(method, js_name = panTo)]
    pub fn pan_to(this: &GoogleMap, position: &JsValue);

    #[wasm_bindgen(method, js_name = setCenter)]
    pub fn set_center(this: &GoogleMap, position: &JsValue);

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Marker)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Marker")]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setPosition)]
    pub fn set_position(this: &Marker, position: &JsValue);

    #[wasm_bindgen(method, js_name = getPosition)]
    pub fn get_position(this: &Marker) -> Option<LatLng>;

    #[wasm_bindgen(method, js_name = setMap)]
    pub fn set_map(this: &Marker, map: &GoogleMap);

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &Marker, event: &str, handler: &js_sys::Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = LatLng)]
    pub type LatLng;

    #[wasm_bindgen(method)]
    pub fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method)]
    pub fn lng(this: &LatLng) -> f64;

    #[wasm_bindgen(js_namespace = ["google", "maps", "places"], js_name = Autocomplete)]
    pub type Autocomplete;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps", "places"], js_class = "Autocomplete")]
    pub fn new(input: &HtmlInputElement) -> Autocomplete;

    #[wasm_bindgen(method, js_name = bindTo)]
    pub fn bind_to(this: &Autocomplete, key: &str, target: &GoogleMap);

    #[wasm_bindgen(method, js_name = getPlace)]
    pub fn get_place(this: &Autocomplete) -> JsValue;

    #[wasm_bindgen(method, js_name = addListener)]
    pub fn add_listener(this: &Autocomplete, event: &str, handler: &js_sys::Function) -> JsValue;

    #[wasm_bindgen(js_namespace = ["google", "maps"], js_name = Geocoder)]
    pub type GeocoderHandle;

    #[wasm_bindgen(constructor, js_namespace = ["google", "maps"], js_class = "Geocoder")]
    pub fn new() -> GeocoderHandle;

    /// `geocode(request, (results, status) => ...)`
    #[wasm_bindgen(method)]
    pub fn geocode(this: &GeocoderHandle, request: &JsValue, callback: &js_sys::Function);
}

/// Helper: ¿está cargado el script de Google Maps?
pub fn google_maps_loaded() -> bool {
    let global = js_sys::global();
    js_sys::Reflect::get(&global, &JsValue::from_str("google"))
        .ok()
        .filter(|google| !google.is_undefined())
        .and_then(|google| js_sys::Reflect::get(&google, &JsValue::from_str("maps")).ok())
        .map(|maps| !maps.is_undefined())
        .unwrap_or(false)
}
