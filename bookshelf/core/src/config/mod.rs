//! TOML Configuration File Support
//!
//! Centralized configuration loading for the bookshelf, from a TOML file at
//! `~/.config/bookshelf/bookshelf.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the host through [`ConfigOverrides`])
//! 2. Environment variables (`BOOKSHELF_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [layout]
//! books_per_shelf = 80
//! gap = 0.02
//! shelf_spacing = -8.0
//! group_offset_x = -15.0
//! model_path = "models/books/book_1.obj"
//!
//! [motion]
//! duration_secs = 0.75
//! color_duration_secs = 0.35
//! lock_timeout_secs = 5.0
//!
//! [camera]
//! position = [3.0, 4.0, 6.0]
//! look_at = [0.0, 1.0, 0.0]
//!
//! [palette]
//! base = 0xFAF9F8
//! highlight = 0xFFCCCB
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{Color, Palette, PAPER, PAPER_PINK};
use crate::math::Vec3;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Layout section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutToml {
    /// Books per shelf
    pub books_per_shelf: Option<usize>,

    /// Gap between neighbouring books
    pub gap: Option<f32>,

    /// Z distance between shelves
    pub shelf_spacing: Option<f32>,

    /// X offset of every shelf group
    pub group_offset_x: Option<f32>,

    /// Book model handed to the asset loader
    pub model_path: Option<String>,
}

/// Motion section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionToml {
    /// Transform animation duration in seconds
    pub duration_secs: Option<f32>,

    /// Color animation duration in seconds
    pub color_duration_secs: Option<f32>,

    /// Release a stuck shelf lock after this many seconds
    pub lock_timeout_secs: Option<f32>,
}

/// Camera section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraToml {
    /// Initial position
    pub position: Option<[f32; 3]>,

    /// Initial aim point
    pub look_at: Option<[f32; 3]>,

    /// Camera Z when the first shelf is in view
    pub base_z: Option<f32>,

    /// X distance kept between a selected book and the camera
    pub pan_offset: Option<f32>,
}

/// Selection section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionToml {
    /// Tilt of a raised book in radians
    pub tilt: Option<f32>,

    /// Lift of a raised book along Y
    pub lift_y: Option<f32>,

    /// Pull of a raised book along Z
    pub lift_z: Option<f32>,
}

/// Visit section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitToml {
    /// Camera X shift into the frontal pose
    pub frontal_shift_x: Option<f32>,

    /// Camera Y in the frontal pose
    pub frontal_y: Option<f32>,

    /// Camera Z travel of the dolly-in
    pub dolly_depth: Option<f32>,

    /// Horizontal scatter of the other books
    pub scatter_factor: Option<f32>,

    /// Page opened for books without their own URL
    pub default_url: Option<String>,
}

/// Palette section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteToml {
    /// Resting color as `0xRRGGBB`
    pub base: Option<u32>,

    /// Highlight color as `0xRRGGBB`
    pub highlight: Option<u32>,
}

/// Input section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputToml {
    /// Accumulated wheel delta that turns a page
    pub wheel_threshold: Option<f32>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookshelfToml {
    /// Layout section
    pub layout: LayoutToml,
    /// Motion section
    pub motion: MotionToml,
    /// Camera section
    pub camera: CameraToml,
    /// Selection section
    pub selection: SelectionToml,
    /// Visit section
    pub visit: VisitToml,
    /// Palette section
    pub palette: PaletteToml,
    /// Input section
    pub input: InputToml,
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Shelf layout settings
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
    /// Books per shelf
    pub books_per_shelf: usize,
    /// Gap between neighbouring books
    pub gap: f32,
    /// Z distance between shelves
    pub shelf_spacing: f32,
    /// X offset of every shelf group
    pub group_offset_x: f32,
    /// Book model handed to the asset loader
    pub model_path: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            books_per_shelf: 80,
            gap: 0.02,
            shelf_spacing: -8.0,
            group_offset_x: -15.0,
            model_path: "models/books/book_1.obj".to_string(),
        }
    }
}

/// Animation timing
#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    /// Transform animation duration in seconds
    pub duration_secs: f32,
    /// Color animation duration in seconds
    pub color_duration_secs: f32,
    /// Shelf lock watchdog, off when `None`
    pub lock_timeout_secs: Option<f32>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            duration_secs: 0.75,
            color_duration_secs: 0.35,
            lock_timeout_secs: None,
        }
    }
}

fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

impl MotionConfig {
    /// Transform animation duration
    #[must_use]
    pub fn duration(&self) -> Duration {
        secs(self.duration_secs)
    }

    /// Color animation duration
    #[must_use]
    pub fn color_duration(&self) -> Duration {
        secs(self.color_duration_secs)
    }

    /// Shelf lock watchdog timeout
    #[must_use]
    pub fn lock_timeout(&self) -> Option<Duration> {
        self.lock_timeout_secs.map(secs)
    }
}

/// Camera placement
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Initial position
    pub position: Vec3,
    /// Initial aim point
    pub look_at: Vec3,
    /// Camera Z when the first shelf is in view
    pub base_z: f32,
    /// X distance kept between a selected book and the camera
    pub pan_offset: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 4.0, 6.0),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            base_z: 6.0,
            pan_offset: 3.0,
        }
    }
}

/// Pose of a raised book
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionConfig {
    /// Tilt in radians
    pub tilt: f32,
    /// Lift along Y
    pub lift_y: f32,
    /// Pull along Z
    pub lift_z: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tilt: std::f32::consts::PI * 0.1,
            lift_y: 0.5,
            lift_z: 0.5,
        }
    }
}

/// Visit cinematic
#[derive(Clone, Debug, PartialEq)]
pub struct VisitConfig {
    /// Camera X shift into the frontal pose
    pub frontal_shift_x: f32,
    /// Camera Y in the frontal pose
    pub frontal_y: f32,
    /// Camera Z travel of the dolly-in
    pub dolly_depth: f32,
    /// Horizontal scatter of the other books
    pub scatter_factor: f32,
    /// Page opened for books without their own URL
    pub default_url: String,
}

impl Default for VisitConfig {
    fn default() -> Self {
        Self {
            frontal_shift_x: 3.0,
            frontal_y: 1.5,
            dolly_depth: 4.0,
            scatter_factor: 3.0,
            default_url: "https://americana.jcblibrary.org/search/object/jcbcap-991004232549706966/"
                .to_string(),
        }
    }
}

/// Input translation
#[derive(Clone, Debug, PartialEq)]
pub struct InputConfig {
    /// Accumulated wheel delta that turns a page
    pub wheel_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            wheel_threshold: 100.0,
        }
    }
}

/// Centralized configuration for the bookshelf
///
/// Use [`load_config`] to load configuration with proper priority handling.
#[derive(Clone, Debug)]
pub struct BookshelfConfig {
    /// Layout settings
    pub layout: LayoutConfig,
    /// Animation timing
    pub motion: MotionConfig,
    /// Camera placement
    pub camera: CameraConfig,
    /// Raised pose
    pub selection: SelectionConfig,
    /// Visit cinematic
    pub visit: VisitConfig,
    /// Material colors
    pub palette: Palette,
    /// Input translation
    pub input: InputConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    source: ConfigSource,
}

impl Default for BookshelfConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            motion: MotionConfig::default(),
            camera: CameraConfig::default(),
            selection: SelectionConfig::default(),
            visit: VisitConfig::default(),
            palette: Palette {
                base: Color::from_hex(PAPER),
                highlight: Color::from_hex(PAPER_PINK),
            },
            input: InputConfig::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl BookshelfConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.layout.books_per_shelf == 0 {
            return Err(ConfigError::ValidationError(
                "layout.books_per_shelf must be at least 1".to_string(),
            ));
        }
        if self.layout.gap.is_nan() || self.layout.gap < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "layout.gap must not be negative, got {}",
                self.layout.gap
            )));
        }
        let durations = [
            ("motion.duration_secs", Some(self.motion.duration_secs)),
            ("motion.color_duration_secs", Some(self.motion.color_duration_secs)),
            ("motion.lock_timeout_secs", self.motion.lock_timeout_secs),
        ];
        for (name, value) in durations {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::ValidationError(format!(
                        "{name} must be a positive number of seconds, got {value}"
                    )));
                }
            }
        }
        let threshold = self.input.wheel_threshold;
        if !(threshold.is_finite() && threshold > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "input.wheel_threshold must be a positive wheel delta, got {threshold}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/bookshelf/bookshelf.toml` or
/// `~/.config/bookshelf/bookshelf.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("bookshelf").join("bookshelf.toml"))
}

/// Load configuration from the default path, environment and defaults
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values fail validation. A missing config file is not an error.
pub fn load_config() -> Result<BookshelfConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed,
/// or if the merged values fail validation.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<BookshelfConfig, ConfigError> {
    let mut config = BookshelfConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: BookshelfToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config);
    config.validate()?;

    Ok(config)
}

fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut BookshelfConfig, toml: &BookshelfToml) {
    let layout = &toml.layout;
    set(&mut config.layout.books_per_shelf, layout.books_per_shelf.as_ref());
    set(&mut config.layout.gap, layout.gap.as_ref());
    set(&mut config.layout.shelf_spacing, layout.shelf_spacing.as_ref());
    set(&mut config.layout.group_offset_x, layout.group_offset_x.as_ref());
    set(&mut config.layout.model_path, layout.model_path.as_ref());

    let motion = &toml.motion;
    set(&mut config.motion.duration_secs, motion.duration_secs.as_ref());
    set(&mut config.motion.color_duration_secs, motion.color_duration_secs.as_ref());
    if motion.lock_timeout_secs.is_some() {
        config.motion.lock_timeout_secs = motion.lock_timeout_secs;
    }

    let camera = &toml.camera;
    if let Some(position) = camera.position {
        config.camera.position = position.into();
    }
    if let Some(look_at) = camera.look_at {
        config.camera.look_at = look_at.into();
    }
    set(&mut config.camera.base_z, camera.base_z.as_ref());
    set(&mut config.camera.pan_offset, camera.pan_offset.as_ref());

    let selection = &toml.selection;
    set(&mut config.selection.tilt, selection.tilt.as_ref());
    set(&mut config.selection.lift_y, selection.lift_y.as_ref());
    set(&mut config.selection.lift_z, selection.lift_z.as_ref());

    let visit = &toml.visit;
    set(&mut config.visit.frontal_shift_x, visit.frontal_shift_x.as_ref());
    set(&mut config.visit.frontal_y, visit.frontal_y.as_ref());
    set(&mut config.visit.dolly_depth, visit.dolly_depth.as_ref());
    set(&mut config.visit.scatter_factor, visit.scatter_factor.as_ref());
    set(&mut config.visit.default_url, visit.default_url.as_ref());

    if let Some(base) = toml.palette.base {
        config.palette.base = Color::from_hex(base);
    }
    if let Some(highlight) = toml.palette.highlight {
        config.palette.highlight = Color::from_hex(highlight);
    }

    set(&mut config.input.wheel_threshold, toml.input.wheel_threshold.as_ref());
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut BookshelfConfig) {
    if let Ok(per_shelf) = std::env::var("BOOKSHELF_BOOKS_PER_SHELF") {
        if let Ok(n) = per_shelf.parse::<usize>() {
            config.layout.books_per_shelf = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(gap) = std::env::var("BOOKSHELF_GAP") {
        if let Ok(g) = gap.parse::<f32>() {
            config.layout.gap = g;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(path) = std::env::var("BOOKSHELF_MODEL_PATH") {
        config.layout.model_path = path;
        config.source = ConfigSource::Env;
    }
    if let Ok(duration) = std::env::var("BOOKSHELF_DURATION_SECS") {
        if let Ok(d) = duration.parse::<f32>() {
            config.motion.duration_secs = d;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(duration) = std::env::var("BOOKSHELF_COLOR_DURATION_SECS") {
        if let Ok(d) = duration.parse::<f32>() {
            config.motion.color_duration_secs = d;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(timeout) = std::env::var("BOOKSHELF_LOCK_TIMEOUT_SECS") {
        if let Ok(t) = timeout.parse::<f32>() {
            config.motion.lock_timeout_secs = Some(t);
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(url) = std::env::var("BOOKSHELF_DEFAULT_URL") {
        config.visit.default_url = url;
        config.source = ConfigSource::Env;
    }
    if let Ok(threshold) = std::env::var("BOOKSHELF_WHEEL_THRESHOLD") {
        if let Ok(t) = threshold.parse::<f32>() {
            config.input.wheel_threshold = t;
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides,
/// then call [`BookshelfConfig::validate`] again.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Books per shelf override
    pub books_per_shelf: Option<usize>,

    /// Animation duration override (seconds)
    pub duration_secs: Option<f32>,

    /// Lock watchdog override (seconds)
    pub lock_timeout_secs: Option<f32>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set books per shelf override
    #[must_use]
    pub fn with_books_per_shelf(mut self, n: usize) -> Self {
        self.books_per_shelf = Some(n);
        self
    }

    /// Set animation duration override
    #[must_use]
    pub fn with_duration_secs(mut self, secs: f32) -> Self {
        self.duration_secs = Some(secs);
        self
    }

    /// Set lock watchdog override
    #[must_use]
    pub fn with_lock_timeout_secs(mut self, secs: f32) -> Self {
        self.lock_timeout_secs = Some(secs);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut BookshelfConfig) {
        if self.books_per_shelf.is_some()
            || self.duration_secs.is_some()
            || self.lock_timeout_secs.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(n) = self.books_per_shelf {
            config.layout.books_per_shelf = n;
        }
        if let Some(secs) = self.duration_secs {
            config.motion.duration_secs = secs;
        }
        if let Some(secs) = self.lock_timeout_secs {
            config.motion.lock_timeout_secs = Some(secs);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
