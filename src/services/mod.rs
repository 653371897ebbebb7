pub mod cache_service;
pub mod handoff_service;

#[cfg(target_arch = "wasm32")]
pub mod geolocation_service;
#[cfg(target_arch = "wasm32")]
pub mod sw_bindings;

pub use cache_service::{CacheNames, OfflineCacheProxy, ProxyBackend, ProxyError};
pub use handoff_service::{HandoffError, HandoffService};

#[cfg(target_arch = "wasm32")]
pub use geolocation_service::BrowserGeolocation;
