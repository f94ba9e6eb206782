//! Outside-click dismissal listeners.
//!
//! A popup acquires a [`DismissGuard`] when it opens and holds it while
//! visible. The event loop only hit-tests mouse presses for dismissal while
//! at least one guard is alive. Dropping the guard (close or drop of the
//! owner) releases the listener.

use std::cell::Cell;
use std::rc::Rc;

use ratatui::layout::{Position, Rect};

#[derive(Debug, Clone, Default)]
pub struct DismissRegistry {
    active: Rc<Cell<usize>>,
}

impl DismissRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> DismissGuard {
        self.active.set(self.active.get() + 1);
        tracing::trace!("Dismiss listener acquired ({} active)", self.active.get());
        DismissGuard {
            active: Rc::clone(&self.active),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.active.get() > 0
    }
}

#[derive(Debug)]
pub struct DismissGuard {
    active: Rc<Cell<usize>>,
}

impl Drop for DismissGuard {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        tracing::trace!("Dismiss listener released ({} active)", self.active.get());
    }
}

/// True when the press at (`column`, `row`) lands outside every given area
pub fn is_outside(areas: &[Rect], column: u16, row: u16) -> bool {
    let pos = Position::new(column, row);
    !areas.iter().any(|area| area.contains(pos))
}
