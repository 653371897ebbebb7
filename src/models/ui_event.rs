// ============================================================================
// UI EVENTS - Eventos discretos que llegan al selector
// ============================================================================

/// Qué control cerró el sheet de revisión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    /// Escape, click fuera del sheet, botón cerrar
    Generic,
    /// Botón "cambiar ubicación": además resetea la selección
    Change,
    /// Confirmación antes del hand-off
    Confirm,
}

/// Evento de UI, independiente del DOM
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    InputFocus,
    InputBlur,
    InputChanged(String),
    /// Click en el documento. Solo cuenta si no cae en la caja de búsqueda
    /// ni en el dropdown de sugerencias del proveedor.
    OutsideClick {
        inside_search: bool,
        inside_suggestions: bool,
    },
    ClearInput,
    LocateMe,
    PrimaryAction,
    ConfirmHandoff,
    CloseSheet(CloseTrigger),
    Escape,
}
