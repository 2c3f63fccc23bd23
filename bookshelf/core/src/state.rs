//! Navigation State
//!
//! The one mutable record every controller reads: which shelf is in view,
//! whether a shelf transition holds the lock, and which book (if any) is
//! raised. Both halves are explicit state machines; controllers move them
//! through the `pub(crate)` transition methods below and nothing else.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::book::BookId;

/// Paging direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards shelf 0
    Previous,
    /// Towards the last shelf
    Next,
}

impl Direction {
    /// Signed step, `-1` or `+1`
    #[must_use]
    pub fn step(self) -> isize {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }

    /// Direction of a signed step, `None` for zero
    #[must_use]
    pub fn from_step(step: isize) -> Option<Self> {
        match step.signum() {
            -1 => Some(Self::Previous),
            1 => Some(Self::Next),
            _ => None,
        }
    }
}

/// Shelf paging state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShelfPhase {
    /// Ready to page
    Idle,
    /// Camera is moving to `to`; the lock is held
    Transitioning {
        /// Destination shelf
        to: usize,
        /// Clock reading when the lock was taken
        since: Duration,
    },
}

/// Active-book state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Nothing raised
    #[default]
    None,
    /// Exactly one raised book
    Active(BookId),
}

impl Selection {
    /// The raised book, if any
    #[must_use]
    pub fn book(self) -> Option<BookId> {
        match self {
            Self::None => None,
            Self::Active(book) => Some(book),
        }
    }
}

/// Current shelf, transition lock and active book
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationState {
    current_shelf: usize,
    shelf_count: usize,
    phase: ShelfPhase,
    selection: Selection,
}

impl NavigationState {
    /// Start on shelf 0, idle, with nothing selected
    #[must_use]
    pub fn new(shelf_count: usize) -> Self {
        Self {
            current_shelf: 0,
            shelf_count,
            phase: ShelfPhase::Idle,
            selection: Selection::None,
        }
    }

    /// Shelf in view
    #[must_use]
    pub fn current_shelf(&self) -> usize {
        self.current_shelf
    }

    /// Number of shelves
    #[must_use]
    pub fn shelf_count(&self) -> usize {
        self.shelf_count
    }

    /// Paging state
    #[must_use]
    pub fn phase(&self) -> ShelfPhase {
        self.phase
    }

    /// Whether a shelf transition holds the lock
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, ShelfPhase::Transitioning { .. })
    }

    /// Active-book state
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// The raised book, if any
    #[must_use]
    pub fn active_book(&self) -> Option<BookId> {
        self.selection.book()
    }

    /// Shelf one step in `direction`, if it exists
    #[must_use]
    pub fn neighbour(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Previous => self.current_shelf.checked_sub(1),
            Direction::Next => Some(self.current_shelf + 1).filter(|s| *s < self.shelf_count),
        }
    }

    /// Idle → Transitioning, moving to `to`
    pub(crate) fn begin_transition(&mut self, to: usize, now: Duration) {
        self.current_shelf = to;
        self.phase = ShelfPhase::Transitioning { to, since: now };
    }

    /// Transitioning → Idle
    pub(crate) fn release(&mut self) {
        self.phase = ShelfPhase::Idle;
    }

    pub(crate) fn activate(&mut self, book: BookId) {
        self.selection = Selection::Active(book);
    }

    pub(crate) fn clear_active(&mut self) -> Option<BookId> {
        std::mem::take(&mut self.selection).book()
    }
}
