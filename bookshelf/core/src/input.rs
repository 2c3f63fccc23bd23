//! Host input: pointer events, paging controls and wheel gestures.

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::state::Direction;

/// Kind of pointer event delivered by the ray-intersection source
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerKind {
    /// Pointer entered a book
    HoverStart,
    /// Pointer left a book
    HoverEnd,
    /// Book clicked
    Click,
}

/// Pointer event tagged with the intersected book
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// What happened
    pub kind: PointerKind,
    /// Which book
    pub book: BookId,
}

impl PointerEvent {
    /// Shorthand constructor
    #[must_use]
    pub const fn new(kind: PointerKind, book: BookId) -> Self {
        Self { kind, book }
    }
}

/// Parameterless host UI controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostCommand {
    /// "previous" paging control
    Previous,
    /// "next" paging control
    Next,
    /// "visit" control
    Visit,
}

/// Cursor the host should show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorStyle {
    /// Arrow
    #[default]
    Default,
    /// Hand over a clickable book
    Pointer,
}

/// Turns wheel deltas into paging steps
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelAccumulator {
    threshold: f32,
    accumulated: f32,
}

impl WheelAccumulator {
    /// Page once the accumulated delta reaches `threshold`
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.abs(),
            accumulated: 0.0,
        }
    }

    /// Delta gathered since the last page turn
    #[must_use]
    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Add a wheel delta; positive scrolls towards the next shelf
    pub fn push(&mut self, delta: f32) -> Option<Direction> {
        if !delta.is_finite() {
            return None;
        }
        self.accumulated += delta;
        if self.accumulated.abs() < self.threshold {
            return None;
        }
        let direction = if self.accumulated > 0.0 {
            Direction::Next
        } else {
            Direction::Previous
        };
        self.accumulated = 0.0;
        Some(direction)
    }
}
