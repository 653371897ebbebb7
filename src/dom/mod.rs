// ============================================================================
// DOM MODULE - Helpers para manipulación DOM
// ============================================================================

pub mod element;
pub mod events;
pub mod event_source;

pub use element::*;
pub use events::*;
pub use event_source::DomEventSource;
