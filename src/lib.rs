// ============================================================================
// DELIVERY PIN - Selector de ubicación de entrega (RUST PURO + WASM)
// ============================================================================
// Arquitectura MVVM:
// - Views: aplican el estado al HTML existente (sin lógica)
// - ViewModels: estado + lógica del selector, detrás de ports
// - Services: hand-off de mensajería, geolocalización, proxy offline
// - State: estado puro del selector
// - Models: ubicación, eventos de UI, peticiones del service worker
//
// El mismo .wasm corre en dos contextos:
// - Página: `main` crea la App
// - Service worker: el shim JS llama a `start_service_worker`
// ============================================================================

pub mod config;
pub mod maps;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod views;

#[cfg(target_arch = "wasm32")]
pub use wasm_entry::*;

#[cfg(target_arch = "wasm32")]
mod wasm_entry {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use wasm_logger::Config;

    use crate::app::App;
    use crate::config::CONFIG;
    use crate::services::cache_service::OfflineCacheProxy;
    use crate::services::sw_bindings::{register_worker_listeners, WebProxyBackend};

    // Variable estática global para mantener la instancia de App
    thread_local! {
        static APP: RefCell<Option<App>> = RefCell::new(None);
    }

    fn init_logging() {
        let level = if !CONFIG.is_logging_enabled() {
            log::Level::Warn
        } else if CONFIG.is_production() {
            log::Level::Info
        } else {
            log::Level::Debug
        };
        wasm_logger::init(Config::new(level));
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        // Inicializar panic hook para mejor debugging
        console_error_panic_hook::set_once();
        init_logging();

        // En el service worker no hay window: ahí arranca start_service_worker
        if web_sys::window().is_none() {
            return Ok(());
        }

        log::info!("🚀 Delivery Pin - Rust Puro + MVVM ({})", CONFIG.environment);

        let app = App::new()?;
        app.render()?;

        APP.with(|app_cell| {
            *app_cell.borrow_mut() = Some(app);
        });

        Ok(())
    }

    /// Cambiar idioma de la UI (llamable desde JavaScript)
    #[wasm_bindgen]
    pub fn set_language(language: &str) {
        APP.with(|app_cell| match app_cell.borrow().as_ref() {
            Some(app) => app.set_language(language),
            None => log::warn!("⚠️ App no está inicializada"),
        });
    }

    /// Arrancar el proxy offline dentro del service worker
    #[wasm_bindgen]
    pub fn start_service_worker() -> Result<(), JsValue> {
        let backend = WebProxyBackend::new()?;
        let scope = backend.scope_url();
        let proxy = OfflineCacheProxy::new(backend, &CONFIG.cache_version, &scope)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!(
            "🛠️ [SW] Proxy offline {} / {}",
            proxy.names().static_cache,
            proxy.names().runtime_cache
        );
        register_worker_listeners(Rc::new(proxy))
    }
}
