//! Bookshelf Core - Headless Navigation and Selection for a Virtual Bookshelf
//!
//! Books from a catalog are packed into shelves, the user pages between
//! shelves, raises one book at a time and finally "visits" it through a
//! cinematic exit. This crate holds all of that logic and none of the
//! rendering: the scene graph, the model loader and the pointer source are
//! collaborators behind traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                             Host                                  │
//! │   pointer events · paging controls · wheel · frame clock          │
//! └───────────────┬───────────────────────────────▲──────────────────┘
//!                 │ handle_* / tick                │ drain_events / render
//! ┌───────────────▼───────────────────────────────┴──────────────────┐
//! │                          Bookshelf                                │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐            │
//! │  │  Navigation  │  │  Selection   │  │     Exit     │            │
//! │  │  Controller  │  │  Controller  │  │  Sequencer   │            │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘            │
//! │         └──────── TransitionOrchestrator ───┘                    │
//! │                          │ TweenEngine                            │
//! │                    ┌─────▼─────┐                                  │
//! │                    │   Stage   │ ── flush ──▶ SceneGraph          │
//! │                    └───────────┘                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use bookshelf_core::{Bookshelf, BookshelfConfig, Catalog, HostCommand};
//!
//! let catalog = Catalog::mock(85, 7);
//! let mut shelf = Bookshelf::with_timeline(&catalog, BookshelfConfig::default())?;
//!
//! let mut requests = Vec::new();
//! shelf.request_assets(&mut requests);
//! // ... hand requests to a loader, feed results to on_geometry_loaded ...
//!
//! shelf.handle_command(HostCommand::Next);
//! loop {
//!     shelf.tick(Duration::from_millis(16));
//!     shelf.render(&mut scene);
//!     for event in shelf.drain_events() { /* ... */ }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`catalog`]: Book records and catalog loading
//! - [`layout`]: Partitioning books into shelves and computing offsets
//! - [`gate`]: Dropping pointer events for shelves out of view
//! - [`state`]: Current shelf, transition lock and active book
//! - [`navigation`]: Shelf paging
//! - [`selection`]: Active book, hover highlight
//! - [`exit`]: The visit cinematic
//! - [`tween`]: Tween requests, the engine seam and a reference engine
//! - [`stage`]: Animated scene state and the scene-graph seam
//! - [`config`]: TOML configuration
//!
//! # No Runtime Dependencies
//!
//! This crate has no async runtime and no UI framework dependency. Time
//! only moves when the host calls [`Bookshelf::tick`].

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assets;
pub mod book;
pub mod bookshelf;
pub mod catalog;
pub mod color;
pub mod config;
pub mod events;
pub mod exit;
pub mod gate;
pub mod input;
pub mod layout;
pub mod math;
pub mod navigation;
pub mod selection;
pub mod stage;
pub mod state;
pub mod tween;

// Re-exports for convenience
pub use assets::{AssetLoader, AssetRequest, Geometry};
pub use book::{BookId, BookInstance};
pub use bookshelf::{Bookshelf, CommandOutcome, PointerOutcome};
pub use catalog::{BookConfig, BookScale, Catalog, CatalogError};
pub use color::{Color, Palette};
pub use events::BookshelfEvent;
pub use exit::{ExitSequencer, PagePhase, VisitOutcome, VisitRejection};
pub use gate::{should_handle, should_handle_unhover, InteractionRejection};
pub use input::{CursorStyle, HostCommand, PointerEvent, PointerKind, WheelAccumulator};
pub use layout::{LayoutError, Shelf, ShelfLayoutBuilder};
pub use math::{Transform, Vec3};
pub use navigation::{NavigationController, NavigationOutcome, NavigationRejection};
pub use selection::{HoverOutcome, SelectionController, SelectionOutcome};
pub use stage::{Camera, SceneGraph, ShelfOrigin, Stage};
pub use state::{Direction, NavigationState, Selection, ShelfPhase};
pub use tween::{
    AnimationTarget, Completion, EasingFunction, Property, PropertyStore, Timeline,
    TransitionOrchestrator, TweenEngine, TweenId, TweenRequest, TweenValue,
};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, BookshelfConfig, BookshelfToml,
    ConfigError, ConfigOverrides, ConfigSource,
};
