//! Navigation and selection scenarios
//!
//! Drives the public [`Bookshelf`] surface with a [`ManualEngine`], so every
//! tween completion happens exactly when a test says so. Covers:
//! - shelf paging bounds and the transition lock
//! - exclusive active book and the toggle law
//! - re-entrant input while a transition is in flight
//! - the visit guard and the opt-in lock watchdog

use std::time::Duration;

use pretty_assertions::assert_eq;

use bookshelf_core::tween::test_utils::ManualEngine;
use bookshelf_core::{
    AnimationTarget, BookId, Bookshelf, BookshelfConfig, BookshelfEvent, Catalog, Completion,
    Direction, Geometry, InteractionRejection, NavigationOutcome, NavigationRejection, Property,
    SelectionOutcome, TweenValue, Vec3, VisitOutcome, VisitRejection,
};

const FRAME: Duration = Duration::from_millis(16);

fn loaded(count: usize, per_shelf: usize, config: BookshelfConfig) -> Bookshelf<ManualEngine> {
    let mut config = config;
    config.layout.books_per_shelf = per_shelf;
    let catalog = Catalog::mock(count, 42);
    let mut shelf = Bookshelf::new(&catalog, config, ManualEngine::new()).unwrap();

    let mut requests = Vec::new();
    shelf.request_assets(&mut requests);
    for request in requests {
        shelf
            .on_geometry_loaded(
                request.book,
                Geometry {
                    extents: Vec3::new(0.3, 1.0, 0.25),
                },
            )
            .unwrap();
    }
    shelf.drain_events();
    shelf
}

/// Complete the pending camera tween for `shelf` and tick once
fn settle(shelf: &mut Bookshelf<ManualEngine>, to: usize) {
    let id = shelf
        .engine()
        .pending_with(Completion::ShelfSettled { shelf: to })
        .expect("camera tween pending");
    shelf.engine_mut().settle(id);
    shelf.tick(FRAME);
}

// =============================================================================
// Paging
// =============================================================================

#[test]
fn test_85_books_page_once_then_stop() {
    let mut shelf = loaded(85, 80, BookshelfConfig::default());
    let sizes: Vec<usize> = shelf.stage().shelves().iter().map(|s| s.books().len()).collect();
    assert_eq!(sizes, vec![80, 5]);

    let a = BookId::new(0, 10);
    shelf.select(a);
    shelf.engine_mut().clear_history();

    assert_eq!(
        shelf.navigate(Direction::Next),
        NavigationOutcome::Moved { from: 0, to: 1 }
    );
    assert_eq!(shelf.state().current_shelf(), 1);
    assert_eq!(shelf.state().active_book(), None);

    // Every book on shelf 0 got a pose reset and a color reset
    for slot in 0..80 {
        let requests = shelf
            .engine()
            .requests_for(AnimationTarget::Book(BookId::new(0, slot)));
        assert_eq!(requests.len(), 2, "slot {slot}");
        assert_eq!(
            requests[0].end_value(Property::RotationX),
            Some(TweenValue::Scalar(0.0))
        );
    }
    assert!(shelf
        .engine()
        .requests_for(AnimationTarget::Book(BookId::new(1, 0)))
        .is_empty());

    settle(&mut shelf, 1);
    assert!(!shelf.state().is_transitioning());

    assert_eq!(
        shelf.navigate(Direction::Next),
        NavigationOutcome::Ignored(NavigationRejection::AtLastShelf)
    );
    assert_eq!(shelf.state().current_shelf(), 1);
}

#[test]
fn test_navigate_changes_shelf_iff_in_range_and_idle() {
    let count = 4;
    for start in 0..count {
        for direction in [Direction::Previous, Direction::Next] {
            for locked in [false, true] {
                let mut shelf = loaded(count * 3, 3, BookshelfConfig::default());
                for to in 1..=start {
                    shelf.navigate(Direction::Next);
                    settle(&mut shelf, to);
                }
                if locked {
                    // Lock without moving: step away and back, leaving the return unsettled
                    let away = if start + 1 < count {
                        Direction::Next
                    } else {
                        Direction::Previous
                    };
                    let back = if away == Direction::Next {
                        Direction::Previous
                    } else {
                        Direction::Next
                    };
                    let mid = shelf.state().neighbour(away).unwrap();
                    shelf.navigate(away);
                    settle(&mut shelf, mid);
                    shelf.navigate(back);
                }
                assert_eq!(shelf.state().current_shelf(), start);

                let outcome = shelf.navigate(direction);
                let destination = start as isize + direction.step();
                let in_range = destination >= 0 && destination < count as isize;
                let moved = matches!(outcome, NavigationOutcome::Moved { .. });

                assert_eq!(
                    moved,
                    in_range && !locked,
                    "start {start} {direction:?} locked {locked}"
                );
                let expected = if moved { destination as usize } else { start };
                assert_eq!(shelf.state().current_shelf(), expected);
            }
        }
    }
}

#[test]
fn test_stalled_camera_tween_holds_lock_forever() {
    let mut shelf = loaded(10, 5, BookshelfConfig::default());

    shelf.navigate(Direction::Next);
    for _ in 0..10_000 {
        shelf.tick(FRAME);
    }

    assert!(shelf.state().is_transitioning());
    assert_eq!(
        shelf.navigate(Direction::Previous),
        NavigationOutcome::Ignored(NavigationRejection::Transitioning)
    );
}

#[test]
fn test_watchdog_releases_stalled_lock() {
    let mut config = BookshelfConfig::default();
    config.motion.lock_timeout_secs = Some(1.0);
    let mut shelf = loaded(10, 5, config);

    shelf.navigate(Direction::Next);
    shelf.drain_events();
    for _ in 0..62 {
        shelf.tick(FRAME);
    }
    assert!(shelf.state().is_transitioning());

    shelf.tick(FRAME);
    assert!(!shelf.state().is_transitioning());
    assert_eq!(
        shelf.drain_events(),
        vec![BookshelfEvent::LockReleased { shelf: 1 }]
    );

    // The stale camera completion arriving later changes nothing
    settle(&mut shelf, 1);
    assert!(shelf.drain_events().is_empty());
    assert_eq!(
        shelf.navigate(Direction::Previous),
        NavigationOutcome::Moved { from: 1, to: 0 }
    );
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_select_a_then_b() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    let a = BookId::new(0, 2);
    let b = BookId::new(0, 7);

    shelf.select(a);
    shelf.engine_mut().clear_history();
    assert_eq!(
        shelf.select(b),
        SelectionOutcome::Raised {
            book: b,
            previous: Some(a)
        }
    );

    let reset = shelf.engine().requests_for(AnimationTarget::Book(a));
    assert_eq!(
        reset[0].end_value(Property::PositionY),
        Some(TweenValue::Scalar(0.0))
    );
    let raise = shelf.engine().requests_for(AnimationTarget::Book(b));
    assert_eq!(
        raise[0].end_value(Property::PositionY),
        Some(TweenValue::Scalar(0.5))
    );
    assert_eq!(shelf.state().active_book(), Some(b));
    assert_eq!(
        shelf.drain_events(),
        vec![
            BookshelfEvent::SelectionChanged { active: Some(a) },
            BookshelfEvent::SelectionChanged { active: Some(b) },
        ]
    );
}

#[test]
fn test_select_then_navigate_clears_active() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    shelf.select(BookId::new(0, 4));

    shelf.navigate(Direction::Next);

    assert_eq!(shelf.state().active_book(), None);
    let events = shelf.drain_events();
    assert_eq!(
        events[events.len() - 1],
        BookshelfEvent::SelectionChanged { active: None }
    );
}

#[test]
fn test_toggle_law() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    for slot in [0, 3, 9] {
        let book = BookId::new(0, slot);
        shelf.select(book);
        shelf.select(book);
        assert_eq!(shelf.state().active_book(), None);
    }
}

#[test]
fn test_at_most_one_active_book_over_any_click_sequence() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    let clicks = [1, 4, 4, 7, 1, 1, 2, 9, 9, 9, 0, 5];
    let mut expected: Option<BookId> = None;

    for slot in clicks {
        let book = BookId::new(0, slot);
        shelf.select(book);
        expected = if expected == Some(book) { None } else { Some(book) };
        assert_eq!(shelf.state().active_book(), expected);
    }
}

#[test]
fn test_clicks_during_transition_follow_new_shelf() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    shelf.navigate(Direction::Next);

    assert_eq!(
        shelf.select(BookId::new(0, 1)),
        SelectionOutcome::Ignored(InteractionRejection::OtherShelf { shelf: 0, current: 1 })
    );
    assert!(matches!(
        shelf.select(BookId::new(1, 1)),
        SelectionOutcome::Raised { .. }
    ));

    // Re-entrant paging leaves shelf and selection untouched
    assert_eq!(
        shelf.navigate(Direction::Previous),
        NavigationOutcome::Ignored(NavigationRejection::Transitioning)
    );
    assert_eq!(shelf.state().current_shelf(), 1);
    assert_eq!(shelf.state().active_book(), Some(BookId::new(1, 1)));
}

// =============================================================================
// Visit
// =============================================================================

#[test]
fn test_visit_with_no_active_book_schedules_nothing() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    shelf.engine_mut().clear_history();

    assert_eq!(
        shelf.visit(),
        VisitOutcome::Ignored(VisitRejection::NoActiveBook)
    );
    assert_eq!(shelf.engine().scheduled_count(), 0);
    assert!(shelf.drain_events().is_empty());
}

#[test]
fn test_visit_during_transition_is_ignored() {
    let mut shelf = loaded(20, 10, BookshelfConfig::default());
    shelf.navigate(Direction::Next);
    shelf.select(BookId::new(1, 0));
    shelf.engine_mut().clear_history();

    assert_eq!(
        shelf.visit(),
        VisitOutcome::Ignored(VisitRejection::Transitioning)
    );
    assert_eq!(shelf.engine().scheduled_count(), 0);

    settle(&mut shelf, 1);
    assert!(matches!(shelf.visit(), VisitOutcome::Started { .. }));
}

#[test]
fn test_exit_uses_book_url_when_present() {
    let json = r#"[
        { "position": 0 },
        { "position": 1, "url": "https://example.org/books/1" }
    ]"#;
    let catalog = Catalog::from_json_str(json).unwrap();
    let mut shelf =
        Bookshelf::new(&catalog, BookshelfConfig::default(), ManualEngine::new()).unwrap();
    for slot in 0..2 {
        shelf
            .on_geometry_loaded(BookId::new(0, slot), Geometry { extents: Vec3::ONE })
            .unwrap();
    }

    shelf.select(BookId::new(0, 1));
    shelf.visit();
    let id = shelf
        .engine()
        .pending_with(Completion::ExitReady {
            book: BookId::new(0, 1),
        })
        .unwrap();
    shelf.engine_mut().settle(id);
    shelf.tick(FRAME);

    let events = shelf.drain_events();
    assert_eq!(
        events.last(),
        Some(&BookshelfEvent::ExitRequested {
            book: BookId::new(0, 1),
            url: "https://example.org/books/1".to_string(),
        })
    );
}
