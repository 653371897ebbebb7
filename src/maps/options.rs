// Objetos de opciones que recibe la API de Google Maps (se serializan a JS)

use serde::Serialize;

use super::MapConfig;
use crate::models::Location;

/// `google.maps.LatLngLiteral`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLngLiteral {
    pub lat: f64,
    pub lng: f64,
}

impl From<Location> for LatLngLiteral {
    fn from(location: Location) -> Self {
        Self {
            lat: location.latitude,
            lng: location.longitude,
        }
    }
}

/// `google.maps.MapOptions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    pub center: LatLngLiteral,
    pub zoom: f64,
    /// Google usa `UI` en mayúsculas, no camelCase
    #[serde(rename = "disableDefaultUI")]
    pub disable_default_ui: bool,
}

impl From<&MapConfig> for MapOptions {
    fn from(config: &MapConfig) -> Self {
        Self {
            center: config.center.into(),
            zoom: config.zoom,
            disable_default_ui: config.disable_default_ui,
        }
    }
}

/// `google.maps.MarkerOptions` (el mapa se asigna después con `setMap`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOptions {
    pub position: LatLngLiteral,
    pub draggable: bool,
}

/// `google.maps.GeocoderRequest` para geocoding inverso
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeRequest {
    pub location: LatLngLiteral,
}
