//! Easing Curves
//!
//! Maps linear tween progress onto eased progress. The set is deliberately
//! small: the bookshelf only ever uses the quadratic family.

use serde::{Deserialize, Serialize};

/// Easing functions for tween progress
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EasingFunction {
    /// Constant speed
    Linear,

    /// Quadratic ease in (slow start)
    EaseInQuad,

    /// Quadratic ease out (slow end)
    #[default]
    EaseOutQuad,

    /// Quadratic ease in and out, used for shelf paging
    EaseInOutQuad,

    /// Cubic ease in and out
    EaseInOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_linear() {
        assert!((EasingFunction::Linear.apply(0.0)).abs() < f32::EPSILON);
        assert!((EasingFunction::Linear.apply(0.5) - 0.5).abs() < f32::EPSILON);
        assert!((EasingFunction::Linear.apply(1.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_easing_boundaries() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::EaseInQuad,
            EasingFunction::EaseOutQuad,
            EasingFunction::EaseInOutQuad,
            EasingFunction::EaseInOutCubic,
        ] {
            assert!(
                easing.apply(0.0).abs() < 0.001,
                "{easing:?} at 0.0 = {}",
                easing.apply(0.0)
            );
            assert!(
                (easing.apply(1.0) - 1.0).abs() < 0.001,
                "{easing:?} at 1.0 = {}",
                easing.apply(1.0)
            );
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert!((EasingFunction::EaseOutQuad.apply(1.7) - 1.0).abs() < f32::EPSILON);
        assert!(EasingFunction::EaseInQuad.apply(-0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_in_out_is_symmetric() {
        let e = EasingFunction::EaseInOutQuad;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-6);
    }
}
