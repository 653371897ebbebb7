// ============================================================================
// CACHE MODELS - Forma de las peticiones interceptadas por el service worker
// ============================================================================

use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    NoCors,
    Cors,
}

/// Tipo de recurso pedido (`Request.destination`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Script,
    Style,
    Image,
    Font,
    Other,
}

impl Destination {
    /// Recursos que se guardan en el cache estático al pedirlos
    pub fn is_static_asset(&self) -> bool {
        matches!(
            self,
            Destination::Script | Destination::Style | Destination::Image | Destination::Font
        )
    }
}

/// Datos de una petición que deciden la estrategia
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInfo {
    pub method: String,
    pub url: String,
    pub mode: RequestMode,
    pub destination: Destination,
}

impl RequestInfo {
    pub fn get(url: impl Into<String>, mode: RequestMode, destination: Destination) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            mode,
            destination,
        }
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// Estrategia aplicada a cada clase de petición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// No se intercepta (no-GET)
    Passthrough,
    /// network-first, fallback a cache y luego a offline.html
    Navigation,
    /// cache-first
    SameOrigin,
    /// network-first tolerando respuestas opacas
    CrossOrigin,
}

impl RequestClass {
    pub fn classify(info: &RequestInfo, scope_origin: &url::Origin) -> Self {
        if !info.is_get() {
            return RequestClass::Passthrough;
        }
        if info.mode == RequestMode::Navigate || info.destination == Destination::Document {
            return RequestClass::Navigation;
        }
        match Url::parse(&info.url) {
            Ok(url) if &url.origin() == scope_origin => RequestClass::SameOrigin,
            _ => RequestClass::CrossOrigin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> url::Origin {
        Url::parse("https://pin.example/app/").unwrap().origin()
    }

    #[test]
    fn non_get_is_passthrough() {
        let mut info = RequestInfo::get("https://pin.example/api", RequestMode::Cors, Destination::Other);
        info.method = "POST".to_string();
        assert_eq!(RequestClass::classify(&info, &origin()), RequestClass::Passthrough);
    }

    #[test]
    fn document_requests_are_navigations() {
        let nav = RequestInfo::get("https://pin.example/app/", RequestMode::Navigate, Destination::Other);
        let doc = RequestInfo::get("https://other.example/", RequestMode::NoCors, Destination::Document);
        assert_eq!(RequestClass::classify(&nav, &origin()), RequestClass::Navigation);
        assert_eq!(RequestClass::classify(&doc, &origin()), RequestClass::Navigation);
    }

    #[test]
    fn splits_same_and_cross_origin() {
        let css = RequestInfo::get("https://pin.example/app/style.css", RequestMode::SameOrigin, Destination::Style);
        let tiles = RequestInfo::get("https://maps.googleapis.com/maps/api/js", RequestMode::NoCors, Destination::Script);
        let broken = RequestInfo::get("not a url", RequestMode::Cors, Destination::Other);
        assert_eq!(RequestClass::classify(&css, &origin()), RequestClass::SameOrigin);
        assert_eq!(RequestClass::classify(&tiles, &origin()), RequestClass::CrossOrigin);
        assert_eq!(RequestClass::classify(&broken, &origin()), RequestClass::CrossOrigin);
    }
}
