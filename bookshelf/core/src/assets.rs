//! Asset loader boundary.
//!
//! The core never parses models. It hands the loader one [`AssetRequest`]
//! per book and expects a [`Geometry`] back for each, tagged with the same
//! [`BookId`], in any order.

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::catalog::BookScale;
use crate::math::Vec3;

/// One model load
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetRequest {
    /// Load context, echoed back with the geometry
    pub book: BookId,
    /// Model to load
    pub model_path: String,
    /// Scale the book will be shown at
    pub scale: BookScale,
}

/// Parsed model geometry
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Unscaled axis-aligned extents of the model
    pub extents: Vec3,
}

/// External asynchronous model loader
pub trait AssetLoader {
    /// Start loading; completion is reported through
    /// [`crate::Bookshelf::on_geometry_loaded`]
    fn load(&mut self, request: AssetRequest);
}

impl AssetLoader for Vec<AssetRequest> {
    fn load(&mut self, request: AssetRequest) {
        self.push(request);
    }
}
