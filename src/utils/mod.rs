// Utils compartidos

pub mod constants;
pub mod i18n;
pub mod storage;
#[cfg(target_arch = "wasm32")]
pub mod maps_ffi;

pub use constants::*;
pub use i18n::*;
