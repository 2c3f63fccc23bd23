//! Interaction gate: pointer events only reach books on the shelf in view.

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::state::NavigationState;

/// Why a pointer event was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionRejection {
    /// The book sits on a shelf that is not in view
    OtherShelf {
        /// Shelf of the book
        shelf: usize,
        /// Shelf in view
        current: usize,
    },
    /// Pointer left the active book, which keeps its highlight
    ActiveBook,
    /// The book has not been placed yet
    NotPlaced,
}

/// Whether a hover or click on `book` should be processed
#[must_use]
pub fn should_handle(book: BookId, nav: &NavigationState) -> bool {
    book.shelf == nav.current_shelf()
}

/// Whether a hover-end on `book` should be processed
#[must_use]
pub fn should_handle_unhover(book: BookId, nav: &NavigationState) -> bool {
    should_handle(book, nav) && nav.active_book() != Some(book)
}

/// [`should_handle`] with the reason for dropping
pub(crate) fn check(book: BookId, nav: &NavigationState) -> Result<(), InteractionRejection> {
    if should_handle(book, nav) {
        Ok(())
    } else {
        Err(InteractionRejection::OtherShelf {
            shelf: book.shelf,
            current: nav.current_shelf(),
        })
    }
}

/// [`should_handle_unhover`] with the reason for dropping
pub(crate) fn check_unhover(
    book: BookId,
    nav: &NavigationState,
) -> Result<(), InteractionRejection> {
    check(book, nav)?;
    if nav.active_book() == Some(book) {
        return Err(InteractionRejection::ActiveBook);
    }
    Ok(())
}
