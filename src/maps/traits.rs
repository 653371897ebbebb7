use crate::models::{Location, PlaceResult};
use thiserror::Error;

pub type PlaceCallback = Box<dyn Fn(PlaceResult)>;
pub type MarkerDragCallback = Box<dyn Fn(Location)>;
pub type GeocodeCallback = Box<dyn FnOnce(Option<String>)>;

/// Operaciones de mapa que necesita el selector.
/// Los métodos toman `&self`: el mapa se comparte por `Rc` entre handlers.
pub trait MapProvider {
    /// Desplazar la vista suavemente hasta la ubicación
    fn pan_to(&self, location: Location) -> Result<(), MapError>;

    /// Centrar la vista sin animación
    fn set_center(&self, location: Location) -> Result<(), MapError>;

    /// Mover el marcador arrastrable
    fn set_marker_position(&self, location: Location) -> Result<(), MapError>;

    /// Callback cuando el usuario elige una sugerencia de búsqueda
    fn set_place_callback(&self, callback: PlaceCallback) -> Result<(), MapError>;

    /// Callback cuando termina de arrastrarse el marcador
    fn set_marker_drag_callback(&self, callback: MarkerDragCallback) -> Result<(), MapError>;
}

/// Geocodificación inversa (coordenadas -> dirección)
pub trait Geocoder {
    /// Llama a `callback` con la dirección formateada, o `None` si el
    /// proveedor no devuelve resultados
    fn reverse_geocode(&self, location: Location, callback: GeocodeCallback);
}

/// Configuración del mapa
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub center: Location,
    pub zoom: f64,
    pub disable_default_ui: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Nairobi
            center: Location {
                latitude: -1.271,
                longitude: 36.804,
            },
            zoom: 15.0,
            disable_default_ui: true,
        }
    }
}

impl MapConfig {
    pub fn from_app_config(config: &crate::config::MapConfig) -> Self {
        let center = Location::new(config.default_center_lat, config.default_center_lng)
            .unwrap_or_else(|| Self::default().center);
        Self {
            center,
            zoom: config.default_zoom,
            disable_default_ui: true,
        }
    }
}

/// Error del mapa
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    #[error("Map provider script not loaded")]
    ProviderMissing,
    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configured_center_falls_back_to_default() {
        let config = crate::config::MapConfig {
            default_center_lat: 120.0,
            default_center_lng: 36.8,
            default_zoom: 12.0,
        };
        let map_config = MapConfig::from_app_config(&config);
        assert_eq!(map_config.center, MapConfig::default().center);
        assert_eq!(map_config.zoom, 12.0);
    }
}
