// ============================================================================
// CONFIG - Configuración de compilación (build.rs + .env)
// ============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub enable_logging: bool,
    pub language: String,
    pub messaging: MessagingConfig,
    pub map_config: MapConfig,
    pub ui_config: UIConfig,
    pub geolocation: GeolocationConfig,
    pub cache_version: String,
    pub service_worker_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            enable_logging: true,
            language: "EN".to_string(),
            messaging: MessagingConfig::default(),
            map_config: MapConfig::default(),
            ui_config: UIConfig::default(),
            geolocation: GeolocationConfig::default(),
            cache_version: "v2.0.0".to_string(),
            service_worker_url: "sw.js".to_string(),
        }
    }
}

/// Destino del hand-off: `{base_url}/{recipient}?text=...`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    pub base_url: String,
    pub recipient: String,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wa.me".to_string(),
            recipient: "254700000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center_lat: -1.271,
            default_center_lng: 36.804,
            default_zoom: 15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UIConfig {
    /// Duración de la transición CSS del sheet de revisión.
    /// Tiene que coincidir con `transition` en style.css, si no el sheet
    /// se oculta antes (o después) de terminar la animación.
    pub sheet_transition_ms: u32,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            sheet_transition_ms: 280,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    pub timeout_ms: u32,
    pub high_accuracy: bool,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            high_accuracy: true,
        }
    }
}

/// Configuración inválida detectada al arrancar
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("messaging recipient must be numeric, got {0:?}")]
    InvalidRecipient(String),
    #[error("invalid messaging base url {0:?}")]
    InvalidBaseUrl(String),
    #[error("cache version must not be empty")]
    EmptyCacheVersion,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enable_logging),
            language: option_env!("LANGUAGE")
                .unwrap_or("EN").to_uppercase(),
            messaging: MessagingConfig {
                base_url: option_env!("MESSAGING_BASE_URL")
                    .unwrap_or("https://wa.me")
                    .trim_end_matches('/')
                    .to_string(),
                recipient: option_env!("MESSAGING_RECIPIENT")
                    .map(str::to_string)
                    .unwrap_or(defaults.messaging.recipient),
            },
            map_config: MapConfig {
                default_center_lat: option_env!("DEFAULT_MAP_CENTER_LAT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lat),
                default_center_lng: option_env!("DEFAULT_MAP_CENTER_LNG")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_center_lng),
                default_zoom: option_env!("DEFAULT_MAP_ZOOM")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.map_config.default_zoom),
            },
            ui_config: UIConfig {
                sheet_transition_ms: option_env!("SHEET_TRANSITION_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.ui_config.sheet_transition_ms),
            },
            geolocation: GeolocationConfig {
                timeout_ms: option_env!("GEOLOCATION_TIMEOUT_MS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.geolocation.timeout_ms),
                high_accuracy: option_env!("GEOLOCATION_HIGH_ACCURACY")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.geolocation.high_accuracy),
            },
            cache_version: option_env!("CACHE_VERSION")
                .map(str::to_string)
                .unwrap_or(defaults.cache_version),
            service_worker_url: option_env!("SERVICE_WORKER_URL")
                .map(str::to_string)
                .unwrap_or(defaults.service_worker_url),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let recipient = &self.messaging.recipient;
        if recipient.is_empty() || !recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidRecipient(recipient.clone()));
        }
        if url::Url::parse(&self.messaging.base_url).is_err() {
            return Err(ConfigError::InvalidBaseUrl(self.messaging.base_url.clone()));
        }
        if self.cache_version.trim().is_empty() {
            return Err(ConfigError::EmptyCacheVersion);
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    pub fn sheet_transition(&self) -> Duration {
        Duration::from_millis(u64::from(self.ui_config.sheet_transition_ms))
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
