//! Session
//!
//! Owns the bookshelf and the headless scene, applies script commands and
//! reports core events. Nothing here is async; the tokio loop in `main`
//! decides when frames and commands happen.

use std::time::Duration;

use tracing::{debug, info, warn};

use bookshelf_core::{
    BookId, Bookshelf, BookshelfEvent, Direction, Geometry, PagePhase, PointerEvent, PointerKind,
    Timeline, TweenEngine,
};

use crate::scene::TraceScene;
use crate::script::Command;

/// What the input reader should do after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Let frames run for this long first
    Wait(Duration),
    /// Stop reading input
    Quit,
}

/// A running bookshelf plus its output options
pub struct Session<E: TweenEngine = Timeline> {
    shelf: Bookshelf<E>,
    scene: TraceScene,
    json: bool,
    layout_ready: bool,
}

impl<E: TweenEngine> Session<E> {
    /// Wrap a freshly built bookshelf
    pub fn new(shelf: Bookshelf<E>, json: bool) -> Self {
        Self {
            shelf,
            scene: TraceScene::new(),
            json,
            layout_ready: false,
        }
    }

    /// The bookshelf
    pub fn shelf(&self) -> &Bookshelf<E> {
        &self.shelf
    }

    /// The headless scene
    pub fn scene(&self) -> &TraceScene {
        &self.scene
    }

    /// Whether every book has been placed
    pub fn is_ready(&self) -> bool {
        self.layout_ready
    }

    /// Whether the visit cinematic is playing
    pub fn is_leaving(&self) -> bool {
        matches!(self.shelf.page_phase(), PagePhase::Leaving { .. })
    }

    /// Feed one loaded model into the layout
    pub fn geometry_loaded(&mut self, book: BookId, geometry: Geometry) {
        if let Err(e) = self.shelf.on_geometry_loaded(book, geometry) {
            warn!(%book, error = %e, "Dropping loaded model");
        }
    }

    /// Apply a script command
    pub fn run(&mut self, command: Command) -> Flow {
        debug!(?command, "Command");
        match command {
            Command::Previous => {
                let outcome = self.shelf.navigate(Direction::Previous);
                info!(?outcome, "Previous shelf");
            }
            Command::Next => {
                let outcome = self.shelf.navigate(Direction::Next);
                info!(?outcome, "Next shelf");
            }
            Command::Hover(position) => self.pointer(PointerKind::HoverStart, position),
            Command::Unhover(position) => self.pointer(PointerKind::HoverEnd, position),
            Command::Click(position) => self.pointer(PointerKind::Click, position),
            Command::Wheel(delta) => {
                if let Some(outcome) = self.shelf.handle_wheel(delta) {
                    info!(?outcome, "Wheel paged");
                }
            }
            Command::Visit => {
                let outcome = self.shelf.visit();
                info!(?outcome, "Visit");
            }
            Command::Wait(duration) => return Flow::Wait(duration),
            Command::Status => println!("{}", self.status()),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn pointer(&mut self, kind: PointerKind, position: usize) {
        let Some(book) = self.shelf.find_book(position) else {
            warn!(position, "No book at catalog position");
            return;
        };
        let outcome = self.shelf.handle_pointer(PointerEvent::new(kind, book));
        debug!(%book, ?kind, ?outcome, "Pointer");
    }

    /// Run one frame. Returns the exit URL once the visit finished.
    pub fn frame(&mut self, delta: Duration) -> Option<String> {
        self.shelf.tick(delta);
        self.shelf.render(&mut self.scene);

        let mut exit = None;
        for event in self.shelf.drain_events() {
            self.report(&event);
            match event {
                BookshelfEvent::LayoutComplete { .. } => self.layout_ready = true,
                BookshelfEvent::ExitRequested { url, .. } => exit = Some(url),
                _ => {}
            }
        }
        exit
    }

    fn report(&self, event: &BookshelfEvent) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode event"),
            }
        }
        info!(kind = event.kind(), ?event, "Event");
    }

    /// One-line summary of the current state
    pub fn status(&self) -> String {
        let state = self.shelf.state();
        let active = state
            .active_book()
            .map_or_else(|| "none".to_string(), |book| book.to_string());
        format!(
            "shelf {}/{} | {} | active {} | placed {}/{} | t={:.2}s",
            state.current_shelf() + 1,
            state.shelf_count().max(1),
            if state.is_transitioning() { "moving" } else { "idle" },
            active,
            self.shelf.stage().placed_count(),
            self.shelf.stage().capacity(),
            self.shelf.now().as_secs_f32(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookshelf_core::{BookshelfConfig, Catalog, Vec3};
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn session(count: usize, per_shelf: usize) -> Session {
        let mut config = BookshelfConfig::default();
        config.layout.books_per_shelf = per_shelf;
        let catalog = Catalog::mock(count, 11);
        let shelf = Bookshelf::with_timeline(&catalog, config).unwrap();
        let mut session = Session::new(shelf, false);

        let mut requests = Vec::new();
        session.shelf.request_assets(&mut requests);
        for request in requests.into_iter().rev() {
            session.geometry_loaded(
                request.book,
                Geometry {
                    extents: Vec3::new(0.25, 1.0, 0.7),
                },
            );
        }
        session.frame(FRAME);
        session
    }

    fn run_script(session: &mut Session, script: &str) {
        for line in script.lines() {
            if let Some(command) = Command::parse_line(line).unwrap() {
                session.run(command);
            }
        }
    }

    #[test]
    fn test_ready_after_layout_complete() {
        let s = session(12, 5);
        assert!(s.is_ready());
        assert_eq!(s.scene().shelves(), 3);
        assert_eq!(s.scene().books(), 12);
    }

    #[test]
    fn test_click_by_catalog_position() {
        let mut s = session(12, 5);
        run_script(&mut s, "click 3");
        assert_eq!(s.shelf().state().active_book(), Some(BookId::new(0, 3)));

        // Position 7 lives on the second shelf and is gated out
        run_script(&mut s, "click 7");
        assert_eq!(s.shelf().state().active_book(), Some(BookId::new(0, 3)));
    }

    #[test]
    fn test_wait_and_quit_flow() {
        let mut s = session(4, 4);
        assert_eq!(
            s.run(Command::Wait(Duration::from_millis(40))),
            Flow::Wait(Duration::from_millis(40))
        );
        assert_eq!(s.run(Command::Quit), Flow::Quit);
        assert_eq!(s.run(Command::Status), Flow::Continue);
    }

    #[test]
    fn test_visit_script_ends_with_default_url() {
        let mut s = session(6, 6);
        run_script(&mut s, "hover 2\nclick 2\nvisit");
        assert!(s.is_leaving());

        let mut url = None;
        for _ in 0..200 {
            url = s.frame(FRAME);
            if url.is_some() {
                break;
            }
        }
        assert_eq!(url.as_deref(), Some(s.shelf().config().visit.default_url.as_str()));
    }

    #[test]
    fn test_status_line() {
        let mut s = session(12, 5);
        run_script(&mut s, "next\nclick 6");
        assert_eq!(
            s.status(),
            "shelf 2/3 | moving | active 1:1 | placed 12/12 | t=0.02s"
        );
    }
}
