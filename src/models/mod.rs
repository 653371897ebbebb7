pub mod location;
pub mod ui_event;
pub mod cache;

pub use location::{Location, LocationSource, PlaceResult, Selection};
pub use ui_event::{CloseTrigger, UiEvent};
pub use cache::{Destination, RequestClass, RequestInfo, RequestMode};
