//! Selection Controller
//!
//! Owns the transitions of the active-book half of [`NavigationState`]:
//!
//! | Selection     | `select(b)`        | Result                                |
//! |---------------|--------------------|---------------------------------------|
//! | `None`        | any `b`            | raise `b`, pan camera, `Active(b)`    |
//! | `Active(a)`   | `b != a`           | reset `a`, raise `b`, pan, `Active(b)`|
//! | `Active(a)`   | `b == a`           | `None`, no animation                  |
//!
//! Hover and unhover only blend the material color. Every handler is
//! gated by [`crate::gate`] first; dropped events have no side effect.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::color::{Color, Palette};
use crate::config::{BookshelfConfig, SelectionConfig};
use crate::gate::{self, InteractionRejection};
use crate::stage::Stage;
use crate::state::{NavigationState, Selection};
use crate::tween::{AnimationTarget, Property, TransitionOrchestrator, TweenEngine, TweenRequest};

/// Result of a click
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionOutcome {
    /// `book` is now the active book
    Raised {
        /// Newly active book
        book: BookId,
        /// Book that was reset to make room
        previous: Option<BookId>,
    },
    /// The active book was clicked again and released
    Deselected {
        /// Formerly active book
        book: BookId,
    },
    /// Dropped by the gate
    Ignored(InteractionRejection),
}

/// Result of a hover-start or hover-end
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverOutcome {
    /// Highlight color requested
    Highlighted {
        /// Hovered book
        book: BookId,
    },
    /// Base color requested
    Restored {
        /// Book the pointer left
        book: BookId,
    },
    /// Dropped by the gate
    Ignored(InteractionRejection),
}

/// Put `book` back in its resting pose and color
pub(crate) fn reset_book<E: TweenEngine>(
    tweens: &mut TransitionOrchestrator<E>,
    book: BookId,
    base: Color,
    duration: Duration,
    color_duration: Duration,
) {
    let target = AnimationTarget::Book(book);
    tweens.animate(
        TweenRequest::new(target, duration)
            .to(Property::RotationX, 0.0)
            .to(Property::PositionY, 0.0)
            .to(Property::PositionZ, 0.0),
    );
    tweens.transition_color(target, base, color_duration);
}

/// Drives the active book
#[derive(Clone, Debug)]
pub struct SelectionController {
    pose: SelectionConfig,
    pan_offset: f32,
    group_offset_x: f32,
    duration: Duration,
    color_duration: Duration,
    palette: Palette,
}

impl SelectionController {
    /// Create a controller from configuration
    #[must_use]
    pub fn new(config: &BookshelfConfig) -> Self {
        Self {
            pose: config.selection.clone(),
            pan_offset: config.camera.pan_offset,
            group_offset_x: config.layout.group_offset_x,
            duration: config.motion.duration(),
            color_duration: config.motion.color_duration(),
            palette: config.palette,
        }
    }

    /// Click on `book`
    pub fn select<E: TweenEngine>(
        &self,
        book: BookId,
        nav: &mut NavigationState,
        stage: &Stage,
        tweens: &mut TransitionOrchestrator<E>,
    ) -> SelectionOutcome {
        if let Err(reason) = gate::check(book, nav) {
            tracing::trace!(%book, ?reason, "Click dropped");
            return SelectionOutcome::Ignored(reason);
        }
        let Some(instance) = stage.book(book) else {
            return SelectionOutcome::Ignored(InteractionRejection::NotPlaced);
        };

        let previous = match nav.selection() {
            Selection::Active(active) if active == book => {
                nav.clear_active();
                tracing::debug!(%book, "Deselected active book");
                return SelectionOutcome::Deselected { book };
            }
            Selection::Active(active) => {
                reset_book(
                    tweens,
                    active,
                    self.palette.base,
                    self.duration,
                    self.color_duration,
                );
                Some(active)
            }
            Selection::None => None,
        };

        tweens.animate(
            TweenRequest::new(AnimationTarget::Book(book), self.duration)
                .to(Property::RotationX, self.pose.tilt)
                .to(Property::PositionY, self.pose.lift_y)
                .to(Property::PositionZ, self.pose.lift_z),
        );
        nav.activate(book);

        let camera_x = instance.transform().position.x + self.pan_offset + self.group_offset_x;
        tweens.animate(
            TweenRequest::new(AnimationTarget::Camera, self.duration)
                .to(Property::PositionX, camera_x),
        );

        tracing::debug!(%book, previous = ?previous, camera_x, "Raised book");
        SelectionOutcome::Raised { book, previous }
    }

    /// Pointer entered `book`
    pub fn hover<E: TweenEngine>(
        &self,
        book: BookId,
        nav: &NavigationState,
        stage: &Stage,
        tweens: &mut TransitionOrchestrator<E>,
    ) -> HoverOutcome {
        if let Err(reason) = gate::check(book, nav) {
            return HoverOutcome::Ignored(reason);
        }
        let Some(instance) = stage.book(book) else {
            return HoverOutcome::Ignored(InteractionRejection::NotPlaced);
        };

        tweens.transition_color(
            AnimationTarget::Book(book),
            self.palette.highlight,
            self.color_duration,
        );
        tweens.animate(
            TweenRequest::new(AnimationTarget::Spotlight, self.duration).to(
                Property::PositionX,
                instance.transform().position.x + self.group_offset_x,
            ),
        );
        HoverOutcome::Highlighted { book }
    }

    /// Pointer left `book`
    pub fn unhover<E: TweenEngine>(
        &self,
        book: BookId,
        nav: &NavigationState,
        stage: &Stage,
        tweens: &mut TransitionOrchestrator<E>,
    ) -> HoverOutcome {
        if let Err(reason) = gate::check_unhover(book, nav) {
            return HoverOutcome::Ignored(reason);
        }
        if stage.book(book).is_none() {
            return HoverOutcome::Ignored(InteractionRejection::NotPlaced);
        }

        tweens.transition_color(
            AnimationTarget::Book(book),
            self.palette.base,
            self.color_duration,
        );
        HoverOutcome::Restored { book }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::fixture;
    use crate::tween::test_utils::ManualEngine;
    use crate::tween::TweenValue;
    use pretty_assertions::assert_eq;

    struct Harness {
        controller: SelectionController,
        nav: NavigationState,
        stage: Stage,
        tweens: TransitionOrchestrator<ManualEngine>,
    }

    impl Harness {
        fn new() -> Self {
            let stage = fixture(10, 5);
            Self {
                controller: SelectionController::new(&BookshelfConfig::default()),
                nav: NavigationState::new(stage.shelf_count()),
                stage,
                tweens: TransitionOrchestrator::new(ManualEngine::new()),
            }
        }

        fn select(&mut self, book: BookId) -> SelectionOutcome {
            self.controller
                .select(book, &mut self.nav, &self.stage, &mut self.tweens)
        }

        fn engine(&self) -> &ManualEngine {
            self.tweens.engine()
        }
    }

    #[test]
    fn test_select_raises_and_pans() {
        let mut h = Harness::new();
        let book = BookId::new(0, 2);

        assert_eq!(
            h.select(book),
            SelectionOutcome::Raised {
                book,
                previous: None
            }
        );
        assert_eq!(h.nav.active_book(), Some(book));

        let raise = h.engine().requests_for(AnimationTarget::Book(book));
        assert_eq!(raise.len(), 1);
        assert_eq!(
            raise[0].end_value(Property::PositionY),
            Some(TweenValue::Scalar(0.5))
        );

        let pan = h.engine().requests_for(AnimationTarget::Camera);
        assert_eq!(pan.len(), 1);
        let x = h.stage.book(book).unwrap().transform().position.x;
        assert_eq!(
            pan[0].end_value(Property::PositionX),
            Some(TweenValue::Scalar(x + 3.0 - 15.0))
        );
    }

    #[test]
    fn test_select_other_book_resets_previous() {
        let mut h = Harness::new();
        let a = BookId::new(0, 1);
        let b = BookId::new(0, 3);

        h.select(a);
        h.tweens.engine_mut().clear_history();

        assert_eq!(
            h.select(b),
            SelectionOutcome::Raised {
                book: b,
                previous: Some(a)
            }
        );
        assert_eq!(h.nav.active_book(), Some(b));

        let reset = h.engine().requests_for(AnimationTarget::Book(a));
        assert_eq!(reset.len(), 2);
        assert_eq!(
            reset[0].end_value(Property::RotationX),
            Some(TweenValue::Scalar(0.0))
        );
        assert_eq!(
            reset[1].end_value(Property::Color),
            Some(TweenValue::Color(Palette::default().base))
        );
    }

    #[test]
    fn test_reselect_toggles_off_without_animation() {
        let mut h = Harness::new();
        let book = BookId::new(0, 0);

        h.select(book);
        h.tweens.engine_mut().clear_history();

        assert_eq!(h.select(book), SelectionOutcome::Deselected { book });
        assert_eq!(h.nav.active_book(), None);
        assert_eq!(h.engine().scheduled_count(), 0);
    }

    #[test]
    fn test_click_on_other_shelf_is_dropped() {
        let mut h = Harness::new();

        assert_eq!(
            h.select(BookId::new(1, 0)),
            SelectionOutcome::Ignored(InteractionRejection::OtherShelf { shelf: 1, current: 0 })
        );
        assert_eq!(h.nav.active_book(), None);
        assert_eq!(h.engine().scheduled_count(), 0);
    }

    #[test]
    fn test_hover_highlights_and_moves_spotlight() {
        let mut h = Harness::new();
        let book = BookId::new(0, 4);

        let outcome = h
            .controller
            .hover(book, &h.nav, &h.stage, &mut h.tweens);
        assert_eq!(outcome, HoverOutcome::Highlighted { book });

        let color = h.engine().requests_for(AnimationTarget::Book(book));
        assert_eq!(
            color[0].end_value(Property::Color),
            Some(TweenValue::Color(Palette::default().highlight))
        );
        assert_eq!(h.engine().requests_for(AnimationTarget::Spotlight).len(), 1);
    }

    #[test]
    fn test_unhover_keeps_active_highlight() {
        let mut h = Harness::new();
        let book = BookId::new(0, 1);
        h.select(book);
        h.tweens.engine_mut().clear_history();

        let outcome = h
            .controller
            .unhover(book, &h.nav, &h.stage, &mut h.tweens);
        assert_eq!(outcome, HoverOutcome::Ignored(InteractionRejection::ActiveBook));
        assert_eq!(h.engine().scheduled_count(), 0);

        let other = BookId::new(0, 2);
        let outcome = h
            .controller
            .unhover(other, &h.nav, &h.stage, &mut h.tweens);
        assert_eq!(outcome, HoverOutcome::Restored { book: other });
    }
}
