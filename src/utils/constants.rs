// ============================================================================
// CONSTANTS - IDs del DOM, clases CSS y assets del service worker
// ============================================================================
// El HTML de la página tiene que exponer exactamente estos IDs antes de que
// el script de mapas llame a `initMap`.
// ============================================================================

// Elementos de la página
pub const MAP_ID: &str = "map";
pub const LOCATION_INPUT_ID: &str = "locationInput";
pub const LOCATE_BUTTON_ID: &str = "locateBtn";
pub const SET_LOCATION_BUTTON_ID: &str = "setLocationBtn";
pub const SEARCH_CONTAINER_ID: &str = "searchContainer";
pub const CLEAR_INPUT_BUTTON_ID: &str = "clearInputBtn";
pub const MAP_OVERLAY_ID: &str = "mapOverlay";

// Sheet de revisión
pub const SHEET_ID: &str = "reviewSheet";
pub const SHEET_BACKDROP_ID: &str = "reviewSheetBackdrop";
pub const SHEET_LABEL_ID: &str = "sheetLocationLabel";
pub const SHEET_COORDS_ID: &str = "sheetLocationCoords";
pub const SHEET_CONFIRM_BUTTON_ID: &str = "confirmLocationBtn";
pub const SHEET_CHANGE_BUTTON_ID: &str = "changeLocationBtn";
pub const SHEET_CLOSE_BUTTON_ID: &str = "closeSheetBtn";

/// Dropdown de sugerencias que inyecta Google Places en <body>
pub const SUGGESTIONS_SELECTOR: &str = ".pac-container";

// Clases CSS
pub const SHEET_VISIBLE_CLASS: &str = "visible";
pub const SHEET_OPEN_CLASS: &str = "open";
pub const OVERLAY_VISIBLE_CLASS: &str = "visible";
pub const CLEAR_BUTTON_VISIBLE_CLASS: &str = "visible";
pub const PULSE_CLASS: &str = "pulse";
pub const KEYBOARD_UP_CLASS: &str = "keyboard-up";
pub const KEYBOARD_BLUR_CLASS: &str = "keyboard-blur";

// Service worker
pub const STATIC_CACHE_PREFIX: &str = "static";
pub const RUNTIME_CACHE_PREFIX: &str = "runtime";

/// Assets pre-cacheados en `install`, relativos al scope del worker
pub const CORE_ASSETS: &[&str] = &[
    "./",
    "./index.html",
    "./style.css",
    "./index.js",
    "./manifest.json",
    "./offline.html",
];

pub const OFFLINE_PAGE: &str = "./offline.html";

// localStorage
pub const LANGUAGE_STORAGE_KEY: &str = "language";
