pub mod ports;
pub mod selector_viewmodel;

#[cfg(test)]
pub(crate) mod testing;

pub use ports::*;
pub use selector_viewmodel::{LocationSelector, MapPorts, SelectorSettings};
