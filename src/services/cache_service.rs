// ============================================================================
// CACHE SERVICE - Proxy offline del service worker
// ============================================================================
// Estrategias por clase de petición:
// - No-GET: no se intercepta
// - Navegación: network-first -> copia en runtime; sin red: cache, luego offline.html
// - Mismo origen: cache-first; script/style/image/font se guardan en static
// - Otro origen (Google Maps, fuentes...): network-first, se guardan incluso
//   respuestas opacas; sin red: cache o error
// Al activar se borran todos los caches que no sean de la versión actual.
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::models::{RequestClass, RequestInfo};
use crate::utils::constants::{CORE_ASSETS, OFFLINE_PAGE, RUNTIME_CACHE_PREFIX, STATIC_CACHE_PREFIX};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProxyError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("cache storage error: {0}")]
    Storage(String),
    #[error("offline and no cached copy of {0}")]
    Offline(String),
    #[error("invalid worker scope {0:?}")]
    InvalidScope(String),
}

/// Nombres de los dos caches de una versión
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    pub static_cache: String,
    pub runtime_cache: String,
}

impl CacheNames {
    pub fn for_version(version: &str) -> Self {
        Self {
            static_cache: format!("{}-{}", STATIC_CACHE_PREFIX, version),
            runtime_cache: format!("{}-{}", RUNTIME_CACHE_PREFIX, version),
        }
    }

    pub fn is_current(&self, name: &str) -> bool {
        name == self.static_cache || name == self.runtime_cache
    }
}

/// Red + Cache Storage del entorno del worker.
///
/// `Request`/`Response` son los objetos nativos del entorno; el proxy solo
/// los mira a través de `inspect`.
#[async_trait(?Send)]
pub trait ProxyBackend {
    type Request;
    type Response;

    fn inspect(&self, request: &Self::Request) -> RequestInfo;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, ProxyError>;

    /// Copia de la respuesta (el body solo se puede leer una vez)
    fn duplicate(&self, response: &Self::Response) -> Result<Self::Response, ProxyError>;

    async fn put(
        &self,
        cache: &str,
        request: &Self::Request,
        response: Self::Response,
    ) -> Result<(), ProxyError>;

    /// Busca en todos los caches, como `caches.match`
    async fn match_url(&self, url: &str) -> Result<Option<Self::Response>, ProxyError>;

    /// Descarga y guarda todas las URLs; falla si falla cualquiera
    async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), ProxyError>;

    async fn cache_names(&self) -> Result<Vec<String>, ProxyError>;

    async fn delete_cache(&self, cache: &str) -> Result<bool, ProxyError>;

    async fn skip_waiting(&self) -> Result<(), ProxyError>;

    async fn claim_clients(&self) -> Result<(), ProxyError>;
}

pub struct OfflineCacheProxy<B: ProxyBackend> {
    backend: B,
    names: CacheNames,
    scope: Url,
    core_assets: Vec<String>,
    offline_page: String,
}

impl<B: ProxyBackend> OfflineCacheProxy<B> {
    /// `scope` es la URL de registro del worker; los assets relativos
    /// (`./index.html`) se resuelven contra ella
    pub fn new(backend: B, version: &str, scope: &str) -> Result<Self, ProxyError> {
        let scope = Url::parse(scope).map_err(|_| ProxyError::InvalidScope(scope.to_string()))?;
        let resolve = |path: &str| {
            scope
                .join(path)
                .map(String::from)
                .map_err(|_| ProxyError::InvalidScope(path.to_string()))
        };

        let core_assets = CORE_ASSETS
            .iter()
            .map(|path| resolve(path))
            .collect::<Result<Vec<_>, _>>()?;
        let offline_page = resolve(OFFLINE_PAGE)?;

        Ok(Self {
            backend,
            names: CacheNames::for_version(version),
            scope,
            core_assets,
            offline_page,
        })
    }

    pub fn names(&self) -> &CacheNames {
        &self.names
    }

    pub fn core_assets(&self) -> &[String] {
        &self.core_assets
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `install`: pre-cachear los assets base y activarse sin esperar
    pub async fn install(&self) -> Result<(), ProxyError> {
        log::info!(
            "📦 Instalando worker: {} assets en {}",
            self.core_assets.len(),
            self.names.static_cache
        );
        self.backend
            .add_all(&self.names.static_cache, &self.core_assets)
            .await?;
        self.backend.skip_waiting().await?;
        log::info!("✅ Assets base pre-cacheados");
        Ok(())
    }

    /// `activate`: borrar caches de otras versiones y tomar control de las
    /// páginas abiertas. Devuelve los caches borrados.
    pub async fn activate(&self) -> Result<Vec<String>, ProxyError> {
        let mut deleted = Vec::new();

        for name in self.backend.cache_names().await? {
            if self.names.is_current(&name) {
                continue;
            }
            match self.backend.delete_cache(&name).await {
                Ok(true) => deleted.push(name),
                Ok(false) => {}
                Err(e) => log::warn!("⚠️ No se pudo borrar el cache {}: {}", name, e),
            }
        }

        if !deleted.is_empty() {
            log::info!("🗑️ Caches antiguos borrados: {:?}", deleted);
        }

        self.backend.claim_clients().await?;
        Ok(deleted)
    }

    pub fn classify(&self, request: &B::Request) -> RequestClass {
        RequestClass::classify(&self.backend.inspect(request), &self.scope.origin())
    }

    /// `fetch`: `None` = no interceptar (el navegador sigue su camino)
    pub async fn handle_fetch(
        &self,
        request: &B::Request,
    ) -> Option<Result<B::Response, ProxyError>> {
        let info = self.backend.inspect(request);

        let response = match RequestClass::classify(&info, &self.scope.origin()) {
            RequestClass::Passthrough => return None,
            RequestClass::Navigation => self.network_first_page(request, &info).await,
            RequestClass::SameOrigin => self.cache_first(request, &info).await,
            RequestClass::CrossOrigin => self.network_first(request, &info).await,
        };
        Some(response)
    }

    async fn network_first_page(
        &self,
        request: &B::Request,
        info: &RequestInfo,
    ) -> Result<B::Response, ProxyError> {
        match self.backend.fetch(request).await {
            Ok(response) => {
                self.store_copy(&self.names.runtime_cache, request, &response)
                    .await;
                Ok(response)
            }
            Err(e) => {
                log::warn!("📴 Navegación sin red ({}): {}", info.url, e);
                if let Some(cached) = self.lookup(&info.url).await {
                    return Ok(cached);
                }
                if let Some(offline) = self.lookup(&self.offline_page).await {
                    return Ok(offline);
                }
                Err(ProxyError::Offline(info.url.clone()))
            }
        }
    }

    async fn cache_first(
        &self,
        request: &B::Request,
        info: &RequestInfo,
    ) -> Result<B::Response, ProxyError> {
        if let Some(cached) = self.lookup(&info.url).await {
            return Ok(cached);
        }

        let response = self.backend.fetch(request).await?;
        if info.destination.is_static_asset() {
            self.store_copy(&self.names.static_cache, request, &response)
                .await;
        }
        Ok(response)
    }

    async fn network_first(
        &self,
        request: &B::Request,
        info: &RequestInfo,
    ) -> Result<B::Response, ProxyError> {
        match self.backend.fetch(request).await {
            Ok(response) => {
                // Las respuestas opacas también se guardan
                self.store_copy(&self.names.runtime_cache, request, &response)
                    .await;
                Ok(response)
            }
            Err(e) => match self.lookup(&info.url).await {
                Some(cached) => Ok(cached),
                None => Err(e),
            },
        }
    }

    async fn lookup(&self, url: &str) -> Option<B::Response> {
        match self.backend.match_url(url).await {
            Ok(found) => found,
            Err(e) => {
                log::warn!("⚠️ Error leyendo cache para {}: {}", url, e);
                None
            }
        }
    }

    /// Un fallo al escribir en cache nunca rompe la respuesta
    async fn store_copy(&self, cache: &str, request: &B::Request, response: &B::Response) {
        let stored = match self.backend.duplicate(response) {
            Ok(copy) => self.backend.put(cache, request, copy).await,
            Err(e) => Err(e),
        };
        if let Err(e) = stored {
            log::warn!("⚠️ No se pudo guardar en {}: {}", cache, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Destination, RequestMode};
    use std::cell::{Cell, RefCell};
    use std::collections::{BTreeMap, HashMap};

    const SCOPE: &str = "https://pin.example/app/sw.js";

    #[derive(Debug, Clone, PartialEq)]
    struct FakeResponse {
        status: u16,
        body: Vec<u8>,
        opaque: bool,
    }

    /// Red + Cache Storage en memoria
    #[derive(Default)]
    struct MemoryBackend {
        offline: Cell<bool>,
        network: RefCell<HashMap<String, FakeResponse>>,
        caches: RefCell<BTreeMap<String, BTreeMap<String, FakeResponse>>>,
        fetched: RefCell<Vec<String>>,
        skipped_waiting: Cell<bool>,
        claimed: Cell<bool>,
    }

    impl MemoryBackend {
        fn serve(&self, url: &str, body: &[u8]) {
            self.network.borrow_mut().insert(
                url.to_string(),
                FakeResponse {
                    status: 200,
                    body: body.to_vec(),
                    opaque: false,
                },
            );
        }

        fn serve_opaque(&self, url: &str) {
            self.network.borrow_mut().insert(
                url.to_string(),
                FakeResponse {
                    status: 0,
                    body: Vec::new(),
                    opaque: true,
                },
            );
        }

        fn seed_cache(&self, cache: &str) {
            self.caches.borrow_mut().entry(cache.to_string()).or_default();
        }

        fn cached(&self, cache: &str, url: &str) -> Option<FakeResponse> {
            self.caches.borrow().get(cache)?.get(url).cloned()
        }

        fn stored_anywhere(&self, url: &str) -> bool {
            self.caches.borrow().values().any(|c| c.contains_key(url))
        }

        fn fetch_count(&self) -> usize {
            self.fetched.borrow().len()
        }

        fn network_fetch(&self, url: &str) -> Result<FakeResponse, ProxyError> {
            self.fetched.borrow_mut().push(url.to_string());
            if self.offline.get() {
                return Err(ProxyError::Network(format!("offline: {}", url)));
            }
            Ok(self.network.borrow().get(url).cloned().unwrap_or(FakeResponse {
                status: 404,
                body: Vec::new(),
                opaque: false,
            }))
        }
    }

    #[async_trait(?Send)]
    impl ProxyBackend for MemoryBackend {
        type Request = RequestInfo;
        type Response = FakeResponse;

        fn inspect(&self, request: &RequestInfo) -> RequestInfo {
            request.clone()
        }

        async fn fetch(&self, request: &RequestInfo) -> Result<FakeResponse, ProxyError> {
            self.network_fetch(&request.url)
        }

        fn duplicate(&self, response: &FakeResponse) -> Result<FakeResponse, ProxyError> {
            Ok(response.clone())
        }

        async fn put(
            &self,
            cache: &str,
            request: &RequestInfo,
            response: FakeResponse,
        ) -> Result<(), ProxyError> {
            self.caches
                .borrow_mut()
                .entry(cache.to_string())
                .or_default()
                .insert(request.url.clone(), response);
            Ok(())
        }

        async fn match_url(&self, url: &str) -> Result<Option<FakeResponse>, ProxyError> {
            Ok(self.caches.borrow().values().find_map(|c| c.get(url).cloned()))
        }

        async fn add_all(&self, cache: &str, urls: &[String]) -> Result<(), ProxyError> {
            let mut responses = Vec::new();
            for url in urls {
                let response = self.network_fetch(url)?;
                if response.status != 200 {
                    return Err(ProxyError::Network(format!("{} -> {}", url, response.status)));
                }
                responses.push((url.clone(), response));
            }
            self.caches
                .borrow_mut()
                .entry(cache.to_string())
                .or_default()
                .extend(responses);
            Ok(())
        }

        async fn cache_names(&self) -> Result<Vec<String>, ProxyError> {
            Ok(self.caches.borrow().keys().cloned().collect())
        }

        async fn delete_cache(&self, cache: &str) -> Result<bool, ProxyError> {
            Ok(self.caches.borrow_mut().remove(cache).is_some())
        }

        async fn skip_waiting(&self) -> Result<(), ProxyError> {
            self.skipped_waiting.set(true);
            Ok(())
        }

        async fn claim_clients(&self) -> Result<(), ProxyError> {
            self.claimed.set(true);
            Ok(())
        }
    }

    fn app_url(path: &str) -> String {
        format!("https://pin.example/app/{}", path)
    }

    /// Backend con todos los assets base publicados
    fn online_backend() -> MemoryBackend {
        let backend = MemoryBackend::default();
        for asset in ["", "index.html", "style.css", "index.js", "manifest.json", "offline.html"] {
            backend.serve(&app_url(asset), format!("<{}>", asset).as_bytes());
        }
        backend
    }

    fn proxy(backend: MemoryBackend) -> OfflineCacheProxy<MemoryBackend> {
        OfflineCacheProxy::new(backend, "v2.0.0", SCOPE).unwrap()
    }

    fn page(url: &str) -> RequestInfo {
        RequestInfo::get(url, RequestMode::Navigate, Destination::Document)
    }

    #[test]
    fn core_assets_resolve_against_scope() {
        let proxy = proxy(MemoryBackend::default());
        assert_eq!(proxy.core_assets()[0], "https://pin.example/app/");
        assert_eq!(proxy.core_assets()[2], "https://pin.example/app/style.css");
        assert_eq!(proxy.names().static_cache, "static-v2.0.0");
        assert_eq!(proxy.names().runtime_cache, "runtime-v2.0.0");
    }

    #[test]
    fn rejects_invalid_scope() {
        let result = OfflineCacheProxy::new(MemoryBackend::default(), "v1", "not a url");
        assert!(matches!(result, Err(ProxyError::InvalidScope(_))));
    }

    #[tokio::test]
    async fn install_precaches_core_assets_and_skips_waiting() {
        let proxy = proxy(online_backend());
        proxy.install().await.unwrap();

        let backend = proxy.backend();
        assert!(backend.skipped_waiting.get());
        for url in proxy.core_assets() {
            assert!(backend.cached("static-v2.0.0", url).is_some(), "{} not cached", url);
        }
    }

    #[tokio::test]
    async fn install_fails_when_an_asset_is_missing() {
        let backend = MemoryBackend::default();
        backend.serve(&app_url("index.html"), b"<index>");
        let proxy = proxy(backend);

        assert!(proxy.install().await.is_err());
        assert!(!proxy.backend().skipped_waiting.get());
    }

    #[tokio::test]
    async fn offline_core_asset_is_the_precached_copy() {
        let proxy = proxy(online_backend());
        proxy.install().await.unwrap();
        let precached = proxy
            .backend()
            .cached("static-v2.0.0", &app_url("style.css"))
            .unwrap();

        proxy.backend().offline.set(true);
        let fetches_before = proxy.backend().fetch_count();
        let css = RequestInfo::get(app_url("style.css"), RequestMode::SameOrigin, Destination::Style);
        let response = proxy.handle_fetch(&css).await.unwrap().unwrap();

        assert_eq!(response, precached);
        assert_eq!(response.body, b"<style.css>".to_vec());
        assert_eq!(proxy.backend().fetch_count(), fetches_before);
    }

    #[tokio::test]
    async fn activate_keeps_only_current_version_caches() {
        let backend = online_backend();
        backend.seed_cache("static-v1.0.0");
        backend.seed_cache("runtime-v1.0.0");
        backend.seed_cache("map-tiles");
        let proxy = proxy(backend);
        proxy.install().await.unwrap();
        proxy.handle_fetch(&page(&app_url(""))).await.unwrap().unwrap();

        let deleted = proxy.activate().await.unwrap();

        assert_eq!(deleted.len(), 3);
        let names = proxy.backend().cache_names().await.unwrap();
        assert_eq!(names, vec!["runtime-v2.0.0".to_string(), "static-v2.0.0".to_string()]);
        assert!(proxy.backend().claimed.get());
    }

    #[tokio::test]
    async fn non_get_requests_pass_through_untouched() {
        let proxy = proxy(online_backend());
        let mut post = RequestInfo::get(app_url("api/orders"), RequestMode::SameOrigin, Destination::Other);
        post.method = "POST".to_string();

        assert!(proxy.handle_fetch(&post).await.is_none());
        assert!(!proxy.backend().stored_anywhere(&post.url));
        assert_eq!(proxy.backend().fetch_count(), 0);
    }

    #[tokio::test]
    async fn navigation_is_network_first_and_keeps_a_runtime_copy() {
        let proxy = proxy(online_backend());
        let request = page(&app_url("index.html"));

        let response = proxy.handle_fetch(&request).await.unwrap().unwrap();

        assert_eq!(response.body, b"<index.html>".to_vec());
        assert_eq!(proxy.backend().cached("runtime-v2.0.0", &request.url), Some(response));
    }

    #[tokio::test]
    async fn offline_navigation_falls_back_to_cache_then_offline_page() {
        let proxy = proxy(online_backend());
        proxy.install().await.unwrap();
        let visited = page(&app_url("index.html"));
        proxy.handle_fetch(&visited).await.unwrap().unwrap();

        proxy.backend().offline.set(true);

        let again = proxy.handle_fetch(&visited).await.unwrap().unwrap();
        assert_eq!(again.body, b"<index.html>".to_vec());

        let unknown = page(&app_url("orders/42"));
        let fallback = proxy.handle_fetch(&unknown).await.unwrap().unwrap();
        assert_eq!(fallback.body, b"<offline.html>".to_vec());
    }

    #[tokio::test]
    async fn offline_navigation_without_any_cache_is_an_error() {
        let backend = MemoryBackend::default();
        backend.offline.set(true);
        let proxy = proxy(backend);

        let result = proxy.handle_fetch(&page(&app_url(""))).await.unwrap();
        assert_eq!(result, Err(ProxyError::Offline(app_url(""))));
    }

    #[tokio::test]
    async fn same_origin_static_assets_are_cached_on_first_fetch() {
        let backend = online_backend();
        backend.serve(&app_url("icons/pin.png"), b"PNG");
        backend.serve(&app_url("data.json"), b"{}");
        let proxy = proxy(backend);

        let icon = RequestInfo::get(app_url("icons/pin.png"), RequestMode::NoCors, Destination::Image);
        let data = RequestInfo::get(app_url("data.json"), RequestMode::SameOrigin, Destination::Other);
        proxy.handle_fetch(&icon).await.unwrap().unwrap();
        proxy.handle_fetch(&data).await.unwrap().unwrap();

        assert!(proxy.backend().cached("static-v2.0.0", &icon.url).is_some());
        assert!(!proxy.backend().stored_anywhere(&data.url));

        // Segunda vez: sale del cache sin tocar la red
        let fetches = proxy.backend().fetch_count();
        proxy.handle_fetch(&icon).await.unwrap().unwrap();
        assert_eq!(proxy.backend().fetch_count(), fetches);
    }

    #[tokio::test]
    async fn same_origin_miss_without_network_is_an_error() {
        let backend = MemoryBackend::default();
        backend.offline.set(true);
        let proxy = proxy(backend);
        let css = RequestInfo::get(app_url("style.css"), RequestMode::SameOrigin, Destination::Style);

        let result = proxy.handle_fetch(&css).await.unwrap();
        assert!(matches!(result, Err(ProxyError::Network(_))));
        assert!(!proxy.backend().stored_anywhere(&css.url));
    }

    #[tokio::test]
    async fn cross_origin_opaque_responses_are_cached_for_offline_use() {
        let backend = MemoryBackend::default();
        let maps_js = "https://maps.googleapis.com/maps/api/js?libraries=places";
        backend.serve_opaque(maps_js);
        let proxy = proxy(backend);
        let request = RequestInfo::get(maps_js, RequestMode::NoCors, Destination::Script);

        let online = proxy.handle_fetch(&request).await.unwrap().unwrap();
        assert!(online.opaque);
        assert!(proxy.backend().cached("runtime-v2.0.0", maps_js).is_some());

        proxy.backend().offline.set(true);
        let offline = proxy.handle_fetch(&request).await.unwrap().unwrap();
        assert_eq!(offline, online);
    }

    #[tokio::test]
    async fn cross_origin_failure_without_cache_propagates() {
        let backend = MemoryBackend::default();
        backend.offline.set(true);
        let proxy = proxy(backend);
        let tile = RequestInfo::get(
            "https://maps.gstatic.com/tiles/1/2/3.png",
            RequestMode::NoCors,
            Destination::Image,
        );

        let result = proxy.handle_fetch(&tile).await.unwrap();
        assert!(matches!(result, Err(ProxyError::Network(_))));
    }
}
