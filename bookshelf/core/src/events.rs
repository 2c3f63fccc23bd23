//! Bookshelf Events
//!
//! Notifications from the core to its host. The core queues them while
//! handling input and ticking; the host collects them with
//! [`crate::Bookshelf::drain_events`] once per frame.

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::input::CursorStyle;

/// Events from the core to the host
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookshelfEvent {
    // ============================================
    // Layout
    // ============================================
    /// Every book has been placed
    LayoutComplete {
        /// Books placed
        books: usize,
        /// Shelves built
        shelves: usize,
    },

    // ============================================
    // Navigation
    // ============================================
    /// A shelf transition started
    ShelfChanged {
        /// Shelf left
        from: usize,
        /// Shelf entered
        to: usize,
    },

    /// The camera reached the shelf and the lock was released
    ShelfSettled {
        /// Shelf in view
        shelf: usize,
    },

    /// The watchdog released a stalled transition lock
    LockReleased {
        /// Destination of the stalled transition
        shelf: usize,
    },

    // ============================================
    // Selection
    // ============================================
    /// The active book changed
    SelectionChanged {
        /// New active book
        active: Option<BookId>,
    },

    /// The host should change the pointer cursor
    CursorChanged {
        /// Cursor to show
        cursor: CursorStyle,
    },

    // ============================================
    // Visit
    // ============================================
    /// The visit cinematic started
    VisitStarted {
        /// Book being visited
        book: BookId,
    },

    /// The cinematic finished; the host should navigate away
    ExitRequested {
        /// Visited book
        book: BookId,
        /// Page to open
        url: String,
    },
}

impl BookshelfEvent {
    /// Short name for logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LayoutComplete { .. } => "layout_complete",
            Self::ShelfChanged { .. } => "shelf_changed",
            Self::ShelfSettled { .. } => "shelf_settled",
            Self::LockReleased { .. } => "lock_released",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::CursorChanged { .. } => "cursor_changed",
            Self::VisitStarted { .. } => "visit_started",
            Self::ExitRequested { .. } => "exit_requested",
        }
    }
}
