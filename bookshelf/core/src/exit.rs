//! Exit Sequencer
//!
//! The visit cinematic. All steps are scheduled at once, relative to the
//! moment of the call (`t0`), with `D` the configured transform duration:
//!
//! | Start        | Target            | Change                                   |
//! |--------------|-------------------|------------------------------------------|
//! | `t0`         | active book       | color → base, rotation x/y → 0, y → 0    |
//! | `t0`         | camera            | x −= shift, y = frontal, rotation → 0    |
//! | `t0 + 0.8D`  | every other book  | x += Δx · scatter                        |
//! | `t0 + 1.2D`  | every other book  | opacity → 0                              |
//! | `t0 + 1.5D`  | active book       | opacity → 0                              |
//! | `t0 + 0.8D`  | camera            | z −= depth, then [`Completion::ExitReady`] |
//!
//! A visit is one-shot: once started, the sequencer refuses every later
//! call for the lifetime of the page.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::color::Color;
use crate::config::{BookshelfConfig, VisitConfig};
use crate::stage::Stage;
use crate::state::NavigationState;
use crate::tween::{
    AnimationTarget, Completion, Property, TransitionOrchestrator, TweenEngine, TweenRequest,
};

/// Why a visit was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitRejection {
    /// Nothing is selected
    NoActiveBook,
    /// A shelf transition holds the lock
    Transitioning,
    /// A visit already started
    AlreadyLeaving,
}

/// Result of a visit request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitOutcome {
    /// Cinematic scheduled
    Started {
        /// Book being visited
        book: BookId,
    },
    /// Nothing happened
    Ignored(VisitRejection),
}

/// One-shot page state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PagePhase {
    /// No visit yet
    #[default]
    Browsing,
    /// Visit cinematic running or finished
    Leaving {
        /// Book being visited
        book: BookId,
    },
}

/// Orchestrates the visit cinematic
#[derive(Clone, Debug)]
pub struct ExitSequencer {
    visit: VisitConfig,
    duration: Duration,
    color_duration: Duration,
    base: Color,
    phase: PagePhase,
}

impl ExitSequencer {
    /// Create a sequencer from configuration
    #[must_use]
    pub fn new(config: &BookshelfConfig) -> Self {
        Self {
            visit: config.visit.clone(),
            duration: config.motion.duration(),
            color_duration: config.motion.color_duration(),
            base: config.palette.base,
            phase: PagePhase::Browsing,
        }
    }

    /// Page state
    #[must_use]
    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    /// Whether a visit has started
    #[must_use]
    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, PagePhase::Leaving { .. })
    }

    /// Page opened when `book` is visited
    #[must_use]
    pub fn url_for<'a>(&'a self, stage: &'a Stage, book: BookId) -> &'a str {
        stage
            .book(book)
            .and_then(|b| b.config().url.as_deref())
            .unwrap_or(&self.visit.default_url)
    }

    /// Start the visit cinematic on the active book
    pub fn visit<E: TweenEngine>(
        &mut self,
        nav: &NavigationState,
        stage: &Stage,
        tweens: &mut TransitionOrchestrator<E>,
    ) -> VisitOutcome {
        let rejection = if self.is_leaving() {
            Some(VisitRejection::AlreadyLeaving)
        } else if nav.is_transitioning() {
            Some(VisitRejection::Transitioning)
        } else {
            None
        };
        if let Some(reason) = rejection {
            tracing::debug!(?reason, "Visit ignored");
            return VisitOutcome::Ignored(reason);
        }
        let Some(active) = nav.active_book().and_then(|id| stage.book(id)) else {
            tracing::debug!("Visit ignored, no active book");
            return VisitOutcome::Ignored(VisitRejection::NoActiveBook);
        };
        let book = active.id();
        let active_x = active.transform().position.x;
        self.phase = PagePhase::Leaving { book };

        let d = self.duration;
        let target = AnimationTarget::Book(book);
        let camera = stage.camera();

        // t0: present the active book and frame it
        tweens.transition_color(target, self.base, self.color_duration);
        tweens.animate(
            TweenRequest::new(target, d)
                .to(Property::RotationX, 0.0)
                .to(Property::RotationY, 0.0)
                .to(Property::PositionY, 0.0),
        );
        tweens.animate(
            TweenRequest::new(AnimationTarget::Camera, d)
                .to(Property::PositionX, camera.position.x - self.visit.frontal_shift_x)
                .to(Property::PositionY, self.visit.frontal_y)
                .to(Property::RotationX, 0.0)
                .to(Property::RotationY, 0.0)
                .to(Property::RotationZ, 0.0),
        );

        // Scatter and fade everything else
        for other in stage.books().filter(|b| b.id() != book) {
            let x = other.transform().position.x;
            let dx = x - active_x;
            let other_target = AnimationTarget::Book(other.id());
            tweens.animate(
                TweenRequest::new(other_target, d)
                    .to(Property::PositionX, x + dx * self.visit.scatter_factor)
                    .delay(d.mul_f32(0.8)),
            );
            tweens.animate(
                TweenRequest::new(other_target, d)
                    .to(Property::Opacity, 0.0)
                    .delay(d.mul_f32(1.2)),
            );
        }

        tweens.animate(
            TweenRequest::new(target, d)
                .to(Property::Opacity, 0.0)
                .delay(d.mul_f32(1.5)),
        );

        // Dolly-in; its completion is the only way out
        tweens.animate(
            TweenRequest::new(AnimationTarget::Camera, d)
                .to(Property::PositionZ, camera.position.z - self.visit.dolly_depth)
                .delay(d.mul_f32(0.8))
                .on_complete(Completion::ExitReady { book }),
        );

        tracing::debug!(%book, "Visit started");
        VisitOutcome::Started { book }
    }
}
