//! Transitions
//!
//! Every visible change in the bookshelf is a tween: a time-bounded
//! interpolation of one or more properties of one target, optionally ending
//! in a [`Completion`]. Controllers never interpolate anything themselves;
//! they describe tweens and hand them to a [`TweenEngine`] through the
//! [`TransitionOrchestrator`].
//!
//! # Completions
//!
//! Completion callbacks are modelled as plain values. When a tween finishes,
//! the engine hands its [`Completion`] back from [`TweenEngine::advance`]
//! exactly once; the owner of the state dispatches it. No ordering holds
//! between completions of independently scheduled tweens beyond their own
//! delay and duration.
//!
//! # Overwrites
//!
//! Nothing is cancelable. A tween that starts on a (target, property) pair
//! another running tween is animating takes that property over
//! (last-write-wins). Only the value is taken over: the earlier tween keeps
//! its schedule, and its completion still fires at its own end time even
//! when it has no property left to write.

mod easing;
pub mod test_utils;
mod timeline;

pub use easing::EasingFunction;
pub use timeline::Timeline;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::color::Color;

/// Something a tween can animate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationTarget {
    /// A placed book
    Book(BookId),
    /// The scene camera
    Camera,
    /// The hover spotlight
    Spotlight,
}

/// Animatable property of a target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Property {
    /// Position along X
    PositionX,
    /// Position along Y
    PositionY,
    /// Position along Z
    PositionZ,
    /// Euler rotation about X
    RotationX,
    /// Euler rotation about Y
    RotationY,
    /// Euler rotation about Z
    RotationZ,
    /// Material opacity
    Opacity,
    /// Material color (blended, never per-channel)
    Color,
}

/// Value of an animatable property
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TweenValue {
    /// Numeric property
    Scalar(f32),
    /// Color property
    Color(Color),
}

impl TweenValue {
    /// Interpolate between two values of the same kind.
    ///
    /// Mismatched kinds snap to `to`.
    #[must_use]
    pub fn interpolate(from: Self, to: Self, t: f32) -> Self {
        match (from, to) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(crate::math::lerp(a, b, t)),
            (Self::Color(a), Self::Color(b)) => Self::Color(a.lerp(b, t)),
            (_, to) => to,
        }
    }

    /// Scalar payload, if any
    #[must_use]
    pub fn as_scalar(self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }
}

/// Where tweens read start values from and write interpolated values to
pub trait PropertyStore {
    /// Current value, or `None` if the target does not exist
    fn read(&self, target: AnimationTarget, property: Property) -> Option<TweenValue>;

    /// Overwrite a value. Writes to missing targets are ignored.
    fn write(&mut self, target: AnimationTarget, property: Property, value: TweenValue);
}

/// Continuation carried by a tween, handed back once it finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// The camera reached the shelf the navigation lock was taken for
    ShelfSettled {
        /// Destination shelf
        shelf: usize,
    },
    /// The visit dolly-in finished; the host should leave the page
    ExitReady {
        /// Book being visited
        book: BookId,
    },
}

/// Handle of a scheduled tween
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub u64);

impl std::fmt::Display for TweenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tween-{}", self.0)
    }
}

/// Description of one tween
#[derive(Clone, Debug, PartialEq)]
pub struct TweenRequest {
    /// Animated object
    pub target: AnimationTarget,
    /// End values, one per animated property
    pub properties: Vec<(Property, TweenValue)>,
    /// Time from start to end
    pub duration: Duration,
    /// Time from scheduling to start
    pub delay: Duration,
    /// Progress curve
    pub easing: EasingFunction,
    /// Handed back once the tween ends
    pub on_complete: Option<Completion>,
}

impl TweenRequest {
    /// Start describing a tween on `target`
    #[must_use]
    pub fn new(target: AnimationTarget, duration: Duration) -> Self {
        Self {
            target,
            properties: Vec::new(),
            duration,
            delay: Duration::ZERO,
            easing: EasingFunction::default(),
            on_complete: None,
        }
    }

    /// Animate a numeric property to `value`
    #[must_use]
    pub fn to(mut self, property: Property, value: f32) -> Self {
        self.properties.push((property, TweenValue::Scalar(value)));
        self
    }

    /// Animate the material color to `color`
    #[must_use]
    pub fn color(mut self, color: Color) -> Self {
        self.properties.push((Property::Color, TweenValue::Color(color)));
        self
    }

    /// Start after `delay`
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Use a specific easing curve
    #[must_use]
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Hand `completion` back when the tween ends
    #[must_use]
    pub fn on_complete(mut self, completion: Completion) -> Self {
        self.on_complete = Some(completion);
        self
    }

    /// Target end value for `property`, if this tween animates it
    #[must_use]
    pub fn end_value(&self, property: Property) -> Option<TweenValue> {
        self.properties
            .iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| *v)
    }

    /// Time from scheduling to the end of the tween
    #[must_use]
    pub fn ends_after(&self) -> Duration {
        self.delay + self.duration
    }
}

/// External tween scheduler
///
/// Implementations must hand each completion back at most once, and only
/// after the tween's delay plus duration of simulated time.
pub trait TweenEngine {
    /// Queue a tween
    fn schedule(&mut self, request: TweenRequest) -> TweenId;

    /// Advance simulated time, writing interpolated values into `store`.
    /// Returns completions of tweens that finished during this step.
    fn advance(&mut self, delta: Duration, store: &mut dyn PropertyStore) -> Vec<Completion>;

    /// Tweens scheduled or running
    fn in_flight(&self) -> usize;
}

/// Thin façade over a [`TweenEngine`]
#[derive(Debug)]
pub struct TransitionOrchestrator<E> {
    engine: E,
}

impl<E: TweenEngine> TransitionOrchestrator<E> {
    /// Wrap an engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Schedule a tween
    pub fn animate(&mut self, request: TweenRequest) -> TweenId {
        let target = request.target;
        let delay = request.delay;
        let duration = request.duration;
        let id = self.engine.schedule(request);
        tracing::trace!(
            tween = %id,
            ?target,
            delay_ms = delay.as_millis(),
            duration_ms = duration.as_millis(),
            "Scheduled tween"
        );
        id
    }

    /// Blend the material color of `target` towards `color`
    pub fn transition_color(
        &mut self,
        target: AnimationTarget,
        color: Color,
        duration: Duration,
    ) -> TweenId {
        self.animate(TweenRequest::new(target, duration).color(color))
    }

    /// Advance the engine
    pub fn advance(&mut self, delta: Duration, store: &mut dyn PropertyStore) -> Vec<Completion> {
        self.engine.advance(delta, store)
    }

    /// Underlying engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Underlying engine, mutably
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
