//! Book Instances
//!
//! A [`BookInstance`] is created once its geometry has loaded and lives for
//! the rest of the page. Hover, click, shelf paging and visit mutate its
//! transform and material through the tween engine; nothing in the core
//! ever removes it.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::catalog::BookConfig;
use crate::color::Color;
use crate::math::{Transform, Vec3};

/// Stable handle for a book: its shelf and its slot within that shelf.
///
/// Slots follow catalog order, so a handle can be computed before the
/// book's geometry exists. Asset loads carry it as their context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId {
    /// Owning shelf index
    pub shelf: usize,
    /// Position within the shelf
    pub slot: usize,
}

impl BookId {
    /// Create a handle
    #[must_use]
    pub const fn new(shelf: usize, slot: usize) -> Self {
        Self { shelf, slot }
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.shelf, self.slot)
    }
}

/// Runtime book entity
#[derive(Clone, Debug, PartialEq)]
pub struct BookInstance {
    pub(crate) id: BookId,
    pub(crate) config: BookConfig,
    pub(crate) offset_x: f32,
    pub(crate) size: Vec3,
    pub(crate) transform: Transform,
    pub(crate) color: Color,
    pub(crate) opacity: f32,
}

impl BookInstance {
    /// Place a freshly loaded book at `offset_x` in its resting pose
    #[must_use]
    pub fn new(id: BookId, config: BookConfig, offset_x: f32, size: Vec3, color: Color) -> Self {
        let transform = Self::resting_transform(&config, offset_x);
        Self {
            id,
            config,
            offset_x,
            size,
            transform,
            color,
            opacity: 1.0,
        }
    }

    fn resting_transform(config: &BookConfig, offset_x: f32) -> Transform {
        Transform {
            position: Vec3::new(offset_x, 0.0, 0.0),
            // Spine faces the camera
            rotation: Vec3::new(0.0, FRAC_PI_2, 0.0),
            scale: Vec3::new(1.0, config.scale.y, config.scale.z),
        }
    }

    /// Handle of this book
    #[must_use]
    pub fn id(&self) -> BookId {
        self.id
    }

    /// Index of the shelf that owns this book
    #[must_use]
    pub fn shelf_index(&self) -> usize {
        self.id.shelf
    }

    /// Catalog record this book was built from
    #[must_use]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// Layout offset along the shelf
    #[must_use]
    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// World-space bounding size measured at load
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Current transform
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Current material color
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current material opacity
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether position and tilt are back at the resting pose
    #[must_use]
    pub fn is_resting(&self) -> bool {
        let p = self.transform.position;
        self.transform.rotation.x.abs() < 1e-5 && p.y.abs() < 1e-5 && p.z.abs() < 1e-5
    }
}
