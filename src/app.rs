// ============================================================================
// APP - Arranque de la página del selector
// ============================================================================
// Orden:
// 1. Validar configuración
// 2. Crear view + selector y conectar eventos del DOM
// 3. Exponer window.initMap (callback del script de Google Maps)
// 4. Registrar el service worker cuando la página termina de cargar
// ============================================================================

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::config::CONFIG;
use crate::dom::{on_event, window, DomEventSource};
use crate::maps::web::{GoogleGeocoder, GoogleMapProvider};
use crate::maps::{MapConfig, MapError};
use crate::services::{BrowserGeolocation, HandoffService};
use crate::utils::constants::{LOCATION_INPUT_ID, MAP_ID};
use crate::utils::maps_ffi::google_maps_loaded;
use crate::utils::storage::{load_language, save_language};
use crate::viewmodels::{GeolocationSensor, LocationSelector, MapPorts, SelectorSettings};
use crate::views::DomSelectorView;

/// Aplicación principal
pub struct App {
    selector: Rc<LocationSelector>,
    _events: DomEventSource,
}

impl App {
    /// Crear nueva aplicación
    pub fn new() -> Result<Self, JsValue> {
        CONFIG
            .validate()
            .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))?;

        let handoff = HandoffService::from_config(&CONFIG.messaging)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let mut settings = SelectorSettings::from_config(&CONFIG);
        settings.language = load_language(&CONFIG.language);

        let view = Rc::new(DomSelectorView::new()?);
        let sensor: Rc<dyn GeolocationSensor> = Rc::new(BrowserGeolocation::new());
        let selector = LocationSelector::new(view, Some(sensor), handoff, settings);

        let events = DomEventSource::new()?;
        selector.attach(&events);

        log::info!("📍 [APP] Selector creado");

        Ok(Self {
            selector,
            _events: events,
        })
    }

    /// Pintar estado inicial y conectar mapa + service worker
    pub fn render(&self) -> Result<(), JsValue> {
        self.selector.render();
        self.expose_init_map()?;
        register_service_worker()?;
        Ok(())
    }

    pub fn set_language(&self, language: &str) {
        if let Err(e) = save_language(language) {
            log::warn!("⚠️ [APP] {}", e);
        }
        self.selector.set_language(language);
    }

    /// `window.initMap`: el script de Maps lo llama con `callback=initMap`.
    /// Si el script ya cargó antes que el WASM, se conecta directamente.
    fn expose_init_map(&self) -> Result<(), JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("No window"))?;

        if google_maps_loaded() {
            connect_map(&self.selector);
            return Ok(());
        }

        let selector = Rc::downgrade(&self.selector);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(selector) = selector.upgrade() {
                connect_map(&selector);
            }
        }) as Box<dyn FnMut()>);

        js_sys::Reflect::set(&win, &JsValue::from_str("initMap"), closure.as_ref())?;
        // Nota: initMap vive toda la vida de la página
        closure.forget();
        Ok(())
    }
}

fn connect_map(selector: &Rc<LocationSelector>) {
    let result = (|| -> Result<(), MapError> {
        let config = MapConfig::from_app_config(&CONFIG.map_config);
        let map = GoogleMapProvider::initialize(MAP_ID, LOCATION_INPUT_ID, &config)?;
        let geocoder = GoogleGeocoder::new()?;
        selector.attach_map(MapPorts {
            map: Rc::new(map),
            geocoder: Rc::new(geocoder),
        })
    })();

    if let Err(e) = result {
        log::error!("❌ [APP] No se pudo inicializar el mapa: {}", e);
    }
}

/// Registrar el service worker en el evento `load` de window
fn register_service_worker() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("No window"))?;

    let has_sw = js_sys::Reflect::has(&win.navigator(), &JsValue::from_str("serviceWorker"))?;
    if !has_sw {
        log::warn!("⚠️ [APP] Service workers no soportados, sin modo offline");
        return Ok(());
    }

    let navigator = win.navigator();
    on_event(&win, "load", move |_| {
        let promise = navigator
            .service_worker()
            .register(&CONFIG.service_worker_url);
        wasm_bindgen_futures::spawn_local(async move {
            match wasm_bindgen_futures::JsFuture::from(promise).await {
                Ok(_) => log::info!("✅ [APP] Service worker registrado"),
                Err(e) => log::warn!("⚠️ [APP] Registro del service worker falló: {:?}", e),
            }
        });
    })
}
