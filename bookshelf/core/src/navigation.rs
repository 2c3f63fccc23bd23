//! Navigation Controller
//!
//! Shelf paging. A successful [`NavigationController::navigate`] takes the
//! transition lock, resets every book on the shelf being left, clears the
//! active book and sends the camera to the new shelf. The lock is released
//! only when that camera tween hands back [`Completion::ShelfSettled`].
//!
//! A tween engine that never completes the camera tween leaves the lock
//! held forever. With `motion.lock_timeout_secs` set, [`NavigationController::release_stalled`]
//! frees it after the timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::BookshelfConfig;
use crate::selection::reset_book;
use crate::stage::Stage;
use crate::state::{Direction, NavigationState, ShelfPhase};
use crate::tween::{
    AnimationTarget, Completion, EasingFunction, Property, TransitionOrchestrator, TweenEngine,
    TweenRequest,
};

/// Why a navigation request was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationRejection {
    /// A shelf transition holds the lock
    Transitioning,
    /// Already on shelf 0
    AtFirstShelf,
    /// Already on the last shelf
    AtLastShelf,
}

/// Result of a navigation request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationOutcome {
    /// Paging started
    Moved {
        /// Shelf left
        from: usize,
        /// Shelf entered
        to: usize,
    },
    /// Nothing happened
    Ignored(NavigationRejection),
}

/// Drives shelf paging
#[derive(Clone, Debug)]
pub struct NavigationController {
    shelf_spacing: f32,
    camera_base_z: f32,
    duration: Duration,
    color_duration: Duration,
    base: Color,
    lock_timeout: Option<Duration>,
}

impl NavigationController {
    /// Create a controller from configuration
    #[must_use]
    pub fn new(config: &BookshelfConfig) -> Self {
        Self {
            shelf_spacing: config.layout.shelf_spacing,
            camera_base_z: config.camera.base_z,
            duration: config.motion.duration(),
            color_duration: config.motion.color_duration(),
            base: config.palette.base,
            lock_timeout: config.motion.lock_timeout(),
        }
    }

    /// Camera Z that frames shelf `index`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn camera_z(&self, index: usize) -> f32 {
        index as f32 * self.shelf_spacing + self.camera_base_z
    }

    /// Page one shelf in `direction`
    pub fn navigate<E: TweenEngine>(
        &self,
        direction: Direction,
        nav: &mut NavigationState,
        stage: &Stage,
        tweens: &mut TransitionOrchestrator<E>,
        now: Duration,
    ) -> NavigationOutcome {
        if nav.is_transitioning() {
            tracing::debug!(?direction, "Navigation ignored, transition in flight");
            return NavigationOutcome::Ignored(NavigationRejection::Transitioning);
        }
        let Some(to) = nav.neighbour(direction) else {
            let reason = match direction {
                Direction::Previous => NavigationRejection::AtFirstShelf,
                Direction::Next => NavigationRejection::AtLastShelf,
            };
            tracing::debug!(?direction, ?reason, "Navigation ignored");
            return NavigationOutcome::Ignored(reason);
        };
        let from = nav.current_shelf();

        if let Some(shelf) = stage.shelf(from) {
            for book in shelf.books() {
                reset_book(
                    tweens,
                    book.id(),
                    self.base,
                    self.duration,
                    self.color_duration,
                );
            }
        }
        nav.clear_active();
        nav.begin_transition(to, now);

        tweens.animate(
            TweenRequest::new(AnimationTarget::Camera, self.duration)
                .to(Property::PositionZ, self.camera_z(to))
                .easing(EasingFunction::EaseInOutQuad)
                .on_complete(Completion::ShelfSettled { shelf: to }),
        );

        tracing::debug!(from, to, "Shelf transition started");
        NavigationOutcome::Moved { from, to }
    }

    /// Camera arrived at `shelf`. Returns whether the lock was released.
    pub fn settle(&self, shelf: usize, nav: &mut NavigationState) -> bool {
        match nav.phase() {
            ShelfPhase::Transitioning { to, .. } if to == shelf => {
                nav.release();
                tracing::debug!(shelf, "Shelf transition settled");
                true
            }
            phase => {
                tracing::trace!(shelf, ?phase, "Stale shelf completion");
                false
            }
        }
    }

    /// Release a lock held longer than the configured timeout.
    /// Returns the destination shelf of the released transition.
    pub fn release_stalled(&self, nav: &mut NavigationState, now: Duration) -> Option<usize> {
        let timeout = self.lock_timeout?;
        let ShelfPhase::Transitioning { to, since } = nav.phase() else {
            return None;
        };
        let held = now.saturating_sub(since);
        if held < timeout {
            return None;
        }
        nav.release();
        tracing::warn!(
            shelf = to,
            held_ms = held.as_millis(),
            timeout_ms = timeout.as_millis(),
            "Released stalled shelf lock"
        );
        Some(to)
    }
}
