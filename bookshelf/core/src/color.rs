//! Material Colors
//!
//! Book materials switch between a base and a highlight color. Color tweens
//! never interpolate channels independently of each other: they animate a
//! single blend factor and derive RGB from it.

use serde::{Deserialize, Serialize};

// ============================================================================
// Bookshelf Palette
// ============================================================================

/// Off-white paper tone used for books, background and fog
pub const PAPER: u32 = 0x00FA_F9F8;

/// Soft pink used for hovered and selected books
pub const PAPER_PINK: u32 = 0x00FF_CCCB;

/// Linear RGB color with channels in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color {
    /// Build a color from a `0xRRGGBB` integer
    #[must_use]
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Pack back into `0xRRGGBB`, rounding each channel
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Blend towards `other` by factor `t` (0.0 = self, 1.0 = other)
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: crate::math::lerp(self.r, other.r, t),
            g: crate::math::lerp(self.g, other.g, t),
            b: crate::math::lerp(self.b, other.b, t),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_hex(PAPER)
    }
}

/// The two material colors a book moves between
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Resting color
    pub base: Color,
    /// Hover / selection color
    pub highlight: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Color::from_hex(PAPER),
            highlight: Color::from_hex(PAPER_PINK),
        }
    }
}
