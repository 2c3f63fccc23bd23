//! Bookshelf - Headless Core Façade
//!
//! Owns the stage, the navigation state, the three controllers and the tween
//! engine, and exposes the programmatic surface a host drives:
//!
//! - input: [`Bookshelf::navigate`], [`Bookshelf::select`], [`Bookshelf::hover`],
//!   [`Bookshelf::unhover`], [`Bookshelf::visit`] and the `handle_*` adapters
//! - loading: [`Bookshelf::request_assets`], [`Bookshelf::on_geometry_loaded`]
//! - the frame loop: [`Bookshelf::tick`], [`Bookshelf::render`],
//!   [`Bookshelf::drain_events`]
//!
//! Everything runs on the caller's thread. Tween completions are dispatched
//! inside [`Bookshelf::tick`], never re-entrantly from an input handler.

use std::time::Duration;

use crate::assets::{AssetLoader, AssetRequest, Geometry};
use crate::book::BookId;
use crate::catalog::Catalog;
use crate::config::BookshelfConfig;
use crate::events::BookshelfEvent;
use crate::exit::{ExitSequencer, PagePhase, VisitOutcome};
use crate::input::{CursorStyle, HostCommand, PointerEvent, PointerKind, WheelAccumulator};
use crate::layout::{LayoutError, ShelfLayoutBuilder};
use crate::math::Vec3;
use crate::navigation::{NavigationController, NavigationOutcome};
use crate::selection::{HoverOutcome, SelectionController, SelectionOutcome};
use crate::stage::{Camera, SceneGraph, ShelfOrigin, Stage};
use crate::state::{Direction, NavigationState};
use crate::tween::{Completion, Timeline, TransitionOrchestrator, TweenEngine};

/// Resting position of the hover spotlight
const SPOTLIGHT_HOME: Vec3 = Vec3::new(0.0, 2.0, 6.0);

/// Result of a pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Click
    Selection(SelectionOutcome),
    /// Hover start or end
    Hover(HoverOutcome),
}

/// Result of a host control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Paging control
    Navigation(NavigationOutcome),
    /// Visit control
    Visit(VisitOutcome),
}

/// The bookshelf core
#[derive(Debug)]
pub struct Bookshelf<E> {
    config: BookshelfConfig,
    layout: ShelfLayoutBuilder,
    stage: Stage,
    nav: NavigationState,
    navigation: NavigationController,
    selection: SelectionController,
    exit: ExitSequencer,
    tweens: TransitionOrchestrator<E>,
    wheel: WheelAccumulator,
    clock: Duration,
    events: Vec<BookshelfEvent>,
}

impl Bookshelf<Timeline> {
    /// Create a bookshelf driven by the built-in [`Timeline`]
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroBooksPerShelf`] for an unusable layout.
    pub fn with_timeline(catalog: &Catalog, config: BookshelfConfig) -> Result<Self, LayoutError> {
        Self::new(catalog, config, Timeline::new())
    }
}

impl<E: TweenEngine> Bookshelf<E> {
    /// Plan the shelves for `catalog`. No book is placed until its geometry
    /// arrives through [`Bookshelf::on_geometry_loaded`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ZeroBooksPerShelf`] for an unusable layout.
    pub fn new(catalog: &Catalog, config: BookshelfConfig, engine: E) -> Result<Self, LayoutError> {
        let layout = ShelfLayoutBuilder::new(config.layout.books_per_shelf, config.layout.gap)?;
        let origin = ShelfOrigin {
            group_offset_x: config.layout.group_offset_x,
            shelf_spacing: config.layout.shelf_spacing,
        };
        let camera = Camera::looking_at(config.camera.position, config.camera.look_at);
        let stage = Stage::new(layout.plan(catalog.records()), origin, camera, SPOTLIGHT_HOME);
        let nav = NavigationState::new(stage.shelf_count());

        tracing::info!(
            books = catalog.len(),
            shelves = stage.shelf_count(),
            per_shelf = layout.per_shelf(),
            "Planned bookshelf"
        );

        let mut events = Vec::new();
        if catalog.is_empty() {
            events.push(BookshelfEvent::LayoutComplete {
                books: 0,
                shelves: 0,
            });
        }

        Ok(Self {
            navigation: NavigationController::new(&config),
            selection: SelectionController::new(&config),
            exit: ExitSequencer::new(&config),
            wheel: WheelAccumulator::new(config.input.wheel_threshold),
            tweens: TransitionOrchestrator::new(engine),
            config,
            layout,
            stage,
            nav,
            clock: Duration::ZERO,
            events,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Effective configuration
    #[must_use]
    pub fn config(&self) -> &BookshelfConfig {
        &self.config
    }

    /// Shelf partitioning
    #[must_use]
    pub fn layout(&self) -> &ShelfLayoutBuilder {
        &self.layout
    }

    /// Scene state
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Current shelf, lock and active book
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.nav
    }

    /// Whether a visit has started
    #[must_use]
    pub fn page_phase(&self) -> PagePhase {
        self.exit.phase()
    }

    /// Simulated time since creation
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock
    }

    /// Tween engine
    #[must_use]
    pub fn engine(&self) -> &E {
        self.tweens.engine()
    }

    /// Tween engine, mutably
    pub fn engine_mut(&mut self) -> &mut E {
        self.tweens.engine_mut()
    }

    /// Handle of the book at catalog `position`
    #[must_use]
    pub fn find_book(&self, position: usize) -> Option<BookId> {
        self.stage.shelves().iter().find_map(|shelf| {
            shelf
                .records()
                .iter()
                .position(|r| r.position == position)
                .map(|slot| BookId::new(shelf.index(), slot))
        })
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Ask `loader` for the model of every book. Returns the number of requests.
    pub fn request_assets<L: AssetLoader + ?Sized>(&self, loader: &mut L) -> usize {
        let mut count = 0;
        for shelf in self.stage.shelves() {
            for (slot, record) in shelf.records().iter().enumerate() {
                loader.load(AssetRequest {
                    book: BookId::new(shelf.index(), slot),
                    model_path: self.config.layout.model_path.clone(),
                    scale: record.scale,
                });
                count += 1;
            }
        }
        tracing::debug!(count, "Requested book models");
        count
    }

    /// Geometry for `book` finished loading. Returns how many books became
    /// placed; zero while an earlier slot of the same shelf is still missing.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown book or a repeated load.
    pub fn on_geometry_loaded(
        &mut self,
        book: BookId,
        geometry: Geometry,
    ) -> Result<usize, LayoutError> {
        let record = self
            .stage
            .shelf(book.shelf)
            .and_then(|shelf| shelf.records().get(book.slot))
            .ok_or(LayoutError::UnknownSlot(book))?;
        let size = record.bounding_size(geometry.extents);

        let placed = self
            .stage
            .accept_geometry(book, size, self.config.palette.base)?;
        tracing::trace!(%book, placed = placed.len(), "Geometry loaded");

        if !placed.is_empty() && self.stage.is_complete() {
            let books = self.stage.placed_count();
            let shelves = self.stage.shelf_count();
            tracing::info!(books, shelves, "Layout complete");
            self.events
                .push(BookshelfEvent::LayoutComplete { books, shelves });
        }
        Ok(placed.len())
    }

    // =========================================================================
    // Interaction
    // =========================================================================

    /// Page one shelf in `direction`
    pub fn navigate(&mut self, direction: Direction) -> NavigationOutcome {
        let had_active = self.nav.active_book().is_some();
        let outcome = self.navigation.navigate(
            direction,
            &mut self.nav,
            &self.stage,
            &mut self.tweens,
            self.clock,
        );
        if let NavigationOutcome::Moved { from, to } = outcome {
            self.events.push(BookshelfEvent::ShelfChanged { from, to });
            if had_active {
                self.events
                    .push(BookshelfEvent::SelectionChanged { active: None });
            }
        }
        outcome
    }

    /// Click on `book`
    pub fn select(&mut self, book: BookId) -> SelectionOutcome {
        let outcome = self
            .selection
            .select(book, &mut self.nav, &self.stage, &mut self.tweens);
        match outcome {
            SelectionOutcome::Raised { book, .. } => self
                .events
                .push(BookshelfEvent::SelectionChanged { active: Some(book) }),
            SelectionOutcome::Deselected { .. } => self
                .events
                .push(BookshelfEvent::SelectionChanged { active: None }),
            SelectionOutcome::Ignored(_) => {}
        }
        outcome
    }

    /// Pointer entered `book`
    pub fn hover(&mut self, book: BookId) -> HoverOutcome {
        let outcome = self
            .selection
            .hover(book, &self.nav, &self.stage, &mut self.tweens);
        if matches!(outcome, HoverOutcome::Highlighted { .. }) {
            self.events.push(BookshelfEvent::CursorChanged {
                cursor: CursorStyle::Pointer,
            });
        }
        outcome
    }

    /// Pointer left `book`
    pub fn unhover(&mut self, book: BookId) -> HoverOutcome {
        let outcome = self
            .selection
            .unhover(book, &self.nav, &self.stage, &mut self.tweens);
        if matches!(outcome, HoverOutcome::Restored { .. }) {
            self.events.push(BookshelfEvent::CursorChanged {
                cursor: CursorStyle::Default,
            });
        }
        outcome
    }

    /// Start the visit cinematic on the active book
    pub fn visit(&mut self) -> VisitOutcome {
        let outcome = self.exit.visit(&self.nav, &self.stage, &mut self.tweens);
        if let VisitOutcome::Started { book } = outcome {
            self.events.push(BookshelfEvent::VisitStarted { book });
        }
        outcome
    }

    /// Dispatch a pointer event
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        match event.kind {
            PointerKind::HoverStart => PointerOutcome::Hover(self.hover(event.book)),
            PointerKind::HoverEnd => PointerOutcome::Hover(self.unhover(event.book)),
            PointerKind::Click => PointerOutcome::Selection(self.select(event.book)),
        }
    }

    /// Dispatch a host control
    pub fn handle_command(&mut self, command: HostCommand) -> CommandOutcome {
        match command {
            HostCommand::Previous => CommandOutcome::Navigation(self.navigate(Direction::Previous)),
            HostCommand::Next => CommandOutcome::Navigation(self.navigate(Direction::Next)),
            HostCommand::Visit => CommandOutcome::Visit(self.visit()),
        }
    }

    /// Feed a wheel delta; pages once enough has accumulated
    pub fn handle_wheel(&mut self, delta: f32) -> Option<NavigationOutcome> {
        self.wheel.push(delta).map(|direction| self.navigate(direction))
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// Advance simulated time by `delta` and dispatch finished tweens
    pub fn tick(&mut self, delta: Duration) {
        self.clock += delta;

        for completion in self.tweens.advance(delta, &mut self.stage) {
            match completion {
                Completion::ShelfSettled { shelf } => {
                    if self.navigation.settle(shelf, &mut self.nav) {
                        self.events.push(BookshelfEvent::ShelfSettled { shelf });
                    }
                }
                Completion::ExitReady { book } => {
                    let url = self.exit.url_for(&self.stage, book).to_string();
                    tracing::info!(%book, url = %url, "Exit ready");
                    self.events.push(BookshelfEvent::ExitRequested { book, url });
                }
            }
        }

        if let Some(shelf) = self.navigation.release_stalled(&mut self.nav, self.clock) {
            self.events.push(BookshelfEvent::LockReleased { shelf });
        }
    }

    /// Push everything that changed since the last render to `scene`
    pub fn render<S: SceneGraph + ?Sized>(&mut self, scene: &mut S) {
        self.stage.flush(scene);
    }

    /// Take the queued events
    pub fn drain_events(&mut self) -> Vec<BookshelfEvent> {
        std::mem::take(&mut self.events)
    }
}
