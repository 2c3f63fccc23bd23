//! Book Catalog
//!
//! The immutable input to the layout: one [`BookConfig`] per book, in catalog
//! order. Catalogs come from JSON files or from a seeded mock generator.
//!
//! # JSON Format
//!
//! ```json
//! [
//!   { "position": 0, "scale": { "y": 1.05, "z": 0.8 } },
//!   { "position": 1, "scale": { "y": 0.95, "z": 1.2 }, "url": "https://example.org/b/1" }
//! ]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::Vec3;

/// Errors that can occur when reading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Failed to read the catalog file
    #[error("Failed to read catalog at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Malformed JSON
    #[error("Failed to parse catalog JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Two records claim the same ordinal
    #[error("Duplicate catalog position {0}")]
    DuplicatePosition(usize),
}

/// Height/depth scale factors applied to the shared book model
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookScale {
    /// Height factor
    pub y: f32,
    /// Depth factor (becomes the on-shelf width once the book is turned)
    pub z: f32,
}

impl Default for BookScale {
    fn default() -> Self {
        Self { y: 1.0, z: 1.0 }
    }
}

/// One catalog record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookConfig {
    /// Ordinal position in the source catalog
    pub position: usize,

    /// Scale factors
    #[serde(default)]
    pub scale: BookScale,

    /// Page opened when this book is visited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BookConfig {
    /// Create a record without a visit URL
    #[must_use]
    pub fn new(position: usize, scale: BookScale) -> Self {
        Self {
            position,
            scale,
            url: None,
        }
    }

    /// World-space bounding size of this book given the raw model extents.
    ///
    /// The model is scaled by `(1, scale.y, scale.z)` and then turned a
    /// quarter turn about Y, so its depth ends up along the shelf.
    #[must_use]
    pub fn bounding_size(&self, extents: Vec3) -> Vec3 {
        Vec3::new(extents.z * self.scale.z, extents.y * self.scale.y, extents.x)
    }
}

/// Ordered list of book records
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    records: Vec<BookConfig>,
}

impl Catalog {
    /// Build a catalog, sorting by ordinal and rejecting duplicates
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePosition`] if two records share an ordinal.
    pub fn new(mut records: Vec<BookConfig>) -> Result<Self, CatalogError> {
        records.sort_by_key(|r| r.position);
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.position) {
                return Err(CatalogError::DuplicatePosition(record.position));
            }
        }
        Ok(Self { records })
    }

    /// Parse a JSON array of records
    ///
    /// # Errors
    ///
    /// Returns an error on malformed JSON or duplicate ordinals.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<BookConfig> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Read and parse a JSON catalog file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Deterministic mock catalog of `count` books with varied proportions
    #[must_use]
    pub fn mock(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = (0..count)
            .map(|position| {
                BookConfig::new(
                    position,
                    BookScale {
                        y: rng.gen_range(0.8..1.25),
                        z: rng.gen_range(0.5..1.6),
                    },
                )
            })
            .collect();
        Self { records }
    }

    /// Records in catalog order
    #[must_use]
    pub fn records(&self) -> &[BookConfig] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
