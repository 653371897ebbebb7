// ============================================================================
// SERVICE WORKER BINDINGS - ProxyBackend sobre fetch + Cache Storage
// ============================================================================
// Solo se ejecuta dentro del worker (self = ServiceWorkerGlobalScope).
// ============================================================================

use std::rc::Rc;

use async_trait::async_trait;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{future_to_promise, JsFuture};
use web_sys::{Cache, CacheStorage, ExtendableEvent, FetchEvent, Request, RequestDestination, Response, ServiceWorkerGlobalScope};

use super::cache_service::{OfflineCacheProxy, ProxyBackend, ProxyError};
use crate::models::{Destination, RequestClass, RequestInfo, RequestMode};

fn network_error(e: JsValue) -> ProxyError {
    ProxyError::Network(format!("{:?}", e))
}

fn storage_error(e: JsValue) -> ProxyError {
    ProxyError::Storage(format!("{:?}", e))
}

pub struct WebProxyBackend {
    scope: ServiceWorkerGlobalScope,
}

impl WebProxyBackend {
    pub fn new() -> Result<Self, JsValue> {
        let scope = js_sys::global()
            .dyn_into::<ServiceWorkerGlobalScope>()
            .map_err(|_| JsValue::from_str("Not running inside a service worker"))?;
        Ok(Self { scope })
    }

    /// URL de registro del worker
    pub fn scope_url(&self) -> String {
        self.scope.registration().scope()
    }

    fn caches(&self) -> Result<CacheStorage, ProxyError> {
        self.scope.caches().map_err(storage_error)
    }

    async fn open(&self, name: &str) -> Result<Cache, ProxyError> {
        JsFuture::from(self.caches()?.open(name))
            .await
            .map_err(storage_error)?
            .dyn_into::<Cache>()
            .map_err(storage_error)
    }
}

fn request_mode(request: &Request) -> RequestMode {
    match request.mode() {
        web_sys::RequestMode::Navigate => RequestMode::Navigate,
        web_sys::RequestMode::SameOrigin => RequestMode::SameOrigin,
        web_sys::RequestMode::NoCors => RequestMode::NoCors,
        _ => RequestMode::Cors,
    }
}

fn request_destination(request: &Request) -> Destination {
    match request.destination() {
        RequestDestination::Document => Destination::Document,
        RequestDestination::Script => Destination::Script,
        RequestDestination::Style => Destination::Style,
        RequestDestination::Image => Destination::Image,
        RequestDestination::Font => Destination::Font,
        _ => Destination::Other,
    }
}

#[async_trait(?Send)]
impl ProxyBackend for WebProxyBackend {
    type Request = Request;
    type Response = Response;

    fn inspect(&self, request: &Request) -> RequestInfo {
        RequestInfo {
            method: request.method(),
            url: request.url(),
            mode: request_mode(request),
            destination: request_destination(request),
        }
    }

    async fn fetch(&self, request: &Request) -> Result<Response, ProxyError> {
        JsFuture::from(self.scope.fetch_with_request(request))
            .await
            .map_err(network_error)?
            .dyn_into::<Response>()
            .map_err(network_error)
    }

    fn duplicate(&self, response: &Response) -> Result<Response, ProxyError> {
        response.clone().map_err(storage_error)
    }

    async fn put(&self, cache: &str, request: &Request, response: Response) -> Result<(), ProxyError> {
        let cache = self.open(cache).await?;
        JsFuture::from(cache.put_with_request(request, &response))
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn match_url(&self, url: &str) -> Result<Option<Response>, ProxyError> {
        let found = JsFuture::from(self.caches()?.match_with_str(url))
            .await
            .map_err(storage_error)?;
        Ok(found.dyn_into::<Response>().ok())
    }

    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), ProxyError> {
        let cache = self.open(cache).await?;
        let urls: js_sys::Array = urls.iter().map(|url| JsValue::from_str(url)).collect();
        JsFuture::from(cache.add_all_with_str_sequence(&urls))
            .await
            .map_err(network_error)?;
        Ok(())
    }

    async fn cache_names(&self) -> Result<Vec<String>, ProxyError> {
        let keys = JsFuture::from(self.caches()?.keys())
            .await
            .map_err(storage_error)?;
        Ok(js_sys::Array::from(&keys)
            .iter()
            .filter_map(|name| name.as_string())
            .collect())
    }

    async fn delete_cache(&self, cache: &str) -> Result<bool, ProxyError> {
        let deleted = JsFuture::from(self.caches()?.delete(cache))
            .await
            .map_err(storage_error)?;
        Ok(deleted.as_bool().unwrap_or(false))
    }

    async fn skip_waiting(&self) -> Result<(), ProxyError> {
        let promise = self.scope.skip_waiting().map_err(storage_error)?;
        JsFuture::from(promise).await.map_err(storage_error)?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), ProxyError> {
        JsFuture::from(self.scope.clients().claim())
            .await
            .map_err(storage_error)?;
        Ok(())
    }
}

fn to_js_error(e: ProxyError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Registrar install / activate / fetch en el scope del worker.
/// Se llama UNA VEZ al arrancar el worker.
pub fn register_worker_listeners(proxy: Rc<OfflineCacheProxy<WebProxyBackend>>) -> Result<(), JsValue> {
    let scope = js_sys::global().dyn_into::<ServiceWorkerGlobalScope>()?;

    {
        let proxy = proxy.clone();
        let closure = Closure::wrap(Box::new(move |event: ExtendableEvent| {
            let proxy = proxy.clone();
            let promise = future_to_promise(async move {
                proxy.install().await.map_err(to_js_error)?;
                Ok(JsValue::UNDEFINED)
            });
            if let Err(e) = event.wait_until(&promise) {
                log::error!("❌ [SW] install waitUntil: {:?}", e);
            }
        }) as Box<dyn FnMut(ExtendableEvent)>);
        scope.add_event_listener_with_callback("install", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let proxy = proxy.clone();
        let closure = Closure::wrap(Box::new(move |event: ExtendableEvent| {
            let proxy = proxy.clone();
            let promise = future_to_promise(async move {
                proxy.activate().await.map_err(to_js_error)?;
                Ok(JsValue::UNDEFINED)
            });
            if let Err(e) = event.wait_until(&promise) {
                log::error!("❌ [SW] activate waitUntil: {:?}", e);
            }
        }) as Box<dyn FnMut(ExtendableEvent)>);
        scope.add_event_listener_with_callback("activate", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |event: FetchEvent| {
            let request = event.request();
            // respondWith tiene que llamarse de forma síncrona
            if proxy.classify(&request) == RequestClass::Passthrough {
                return;
            }

            let proxy = proxy.clone();
            let promise = future_to_promise(async move {
                let response = match proxy.handle_fetch(&request).await {
                    Some(result) => result,
                    None => proxy.backend().fetch(&request).await,
                };
                response.map(JsValue::from).map_err(to_js_error)
            });
            if let Err(e) = event.respond_with(&promise) {
                log::error!("❌ [SW] respondWith: {:?}", e);
            }
        }) as Box<dyn FnMut(FetchEvent)>);
        scope.add_event_listener_with_callback("fetch", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::info!("✅ [SW] Listeners install/activate/fetch registrados");
    Ok(())
}
