// Turnos de la transición del sheet: cada apertura o cierre invalida el
// paso diferido (añadir `open` / ocultar) que haya dejado el anterior.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct SheetTransitions {
    generation: Rc<Cell<u32>>,
}

/// Paso diferido de una transición; solo vale mientras nadie abra o
/// cierre el sheet de nuevo.
#[derive(Debug, Clone)]
pub struct SheetTurn {
    generation: u32,
    current: Rc<Cell<u32>>,
}

impl SheetTransitions {
    pub fn begin(&self) -> SheetTurn {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        SheetTurn {
            generation,
            current: self.generation.clone(),
        }
    }
}

impl SheetTurn {
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_cancels_the_pending_hide() {
        let transitions = SheetTransitions::default();
        let close = transitions.begin();
        let open = transitions.begin();

        assert!(!close.is_current());
        assert!(open.is_current());
    }

    #[test]
    fn closing_before_the_next_tick_cancels_the_open_step() {
        let transitions = SheetTransitions::default();
        let open = transitions.begin();
        let close = transitions.begin();

        assert!(!open.is_current());
        assert!(close.is_current());
    }

    #[test]
    fn turns_share_the_counter_across_clones() {
        let transitions = SheetTransitions::default();
        let turn = transitions.begin();
        transitions.clone().begin();
        assert!(!turn.is_current());
    }
}
