// ============================================================================
// HANDOFF SERVICE - Deep link al canal de mensajería
// ============================================================================
// Formato (contrato externo, bit a bit):
//   {base_url}/{recipient}?text={encodeURIComponent("{label} {lat},{lng}")}
// Fire-and-forget: no hay confirmación de entrega.
// ============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::config::{ConfigError, MessagingConfig};
use crate::models::Selection;

/// Mismo conjunto que `encodeURIComponent`: todo salvo `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HandoffError {
    #[error("no delivery location selected")]
    MissingLocation,
}

impl HandoffError {
    /// Clave i18n del mensaje para el usuario
    pub fn message_key(&self) -> &'static str {
        match self {
            HandoffError::MissingLocation => "location_required",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandoffService {
    base_url: String,
    recipient: String,
}

impl HandoffService {
    pub fn new(base_url: &str, recipient: &str) -> Result<Self, ConfigError> {
        if recipient.is_empty() || !recipient.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::InvalidRecipient(recipient.to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            recipient: recipient.to_string(),
        })
    }

    pub fn from_config(config: &MessagingConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url, &config.recipient)
    }

    pub fn link_for(&self, selection: &Selection) -> String {
        let message = selection.message_text();
        let text = utf8_percent_encode(&message, URI_COMPONENT);
        format!("{}/{}?text={}", self.base_url, self.recipient, text)
    }

    /// Valida que haya selección y construye el link
    pub fn prepare(&self, selection: Option<&Selection>) -> Result<String, HandoffError> {
        let selection = selection.ok_or(HandoffError::MissingLocation)?;
        let link = self.link_for(selection);
        log::info!("📨 Hand-off preparado: {}", link);
        Ok(link)
    }
}
