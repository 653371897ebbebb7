// ============================================================================
// SELECTOR STATE - Estado del selector de ubicación
// ============================================================================
// Todo lo visible (botón principal, overlay, pulse, botón limpiar) se deriva
// de estos campos; no se guarda por separado.
// ============================================================================

use crate::models::Selection;

/// Fase del selector (derivada)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorPhase {
    NoSelection,
    Selected,
    ReviewOpen,
}

/// Estado del botón principal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    /// Deshabilitado, invita a elegir una ubicación
    Prompt,
    /// Habilitado, abre el sheet de revisión
    Review,
}

impl PrimaryAction {
    pub fn is_enabled(&self) -> bool {
        matches!(self, PrimaryAction::Review)
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            PrimaryAction::Prompt => "set_delivery_location",
            PrimaryAction::Review => "review_location",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorState {
    pub selection: Option<Selection>,
    pub input_text: String,
    pub sheet_open: bool,
}

impl SelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectorPhase {
        match (&self.selection, self.sheet_open) {
            (Some(_), true) => SelectorPhase::ReviewOpen,
            (Some(_), false) => SelectorPhase::Selected,
            (None, _) => SelectorPhase::NoSelection,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selection.is_some()
    }

    /// Overlay + pulse: sin ubicación y con el input vacío
    pub fn attention_visible(&self) -> bool {
        self.selection.is_none() && self.input_text.is_empty()
    }

    pub fn clear_button_visible(&self) -> bool {
        !self.input_text.is_empty()
    }

    pub fn primary_action(&self) -> PrimaryAction {
        if self.is_selected() {
            PrimaryAction::Review
        } else {
            PrimaryAction::Prompt
        }
    }

    /// Vuelve a "sin ubicación" (cierre con "cambiar ubicación")
    pub fn reset_selection(&mut self) {
        self.selection = None;
        self.input_text.clear();
        self.sheet_open = false;
    }
}
