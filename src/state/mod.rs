// ============================================================================
// STATE MODULE - Estado de la página (Rc<RefCell> en el viewmodel)
// ============================================================================

pub mod selector_state;
pub mod sheet_transition;

pub use selector_state::*;
pub use sheet_transition::{SheetTransitions, SheetTurn};
