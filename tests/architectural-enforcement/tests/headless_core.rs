//! Integration Test: Headless Core
//!
//! **Policy**: `bookshelf/core` is driven entirely by its host. It MUST NOT
//! depend on an async runtime or terminal stack, read the wall clock, or
//! print to the console. Time only advances through `Bookshelf::tick`.

use std::fs;

use architectural_enforcement::{production_lines, workspace_root};

const CORE_SRC: &str = "bookshelf/core/src";

const FORBIDDEN_CRATES: &[&str] = &["tokio", "ratatui", "crossterm", "futures"];

const FORBIDDEN_CALLS: &[(&str, &str)] = &[
    ("Instant::now", "read time from the tick delta instead"),
    ("SystemTime::now", "read time from the tick delta instead"),
    ("println!", "emit a BookshelfEvent or a tracing record"),
    ("eprintln!", "emit a BookshelfEvent or a tracing record"),
    ("std::thread::spawn", "the host owns concurrency"),
];

#[test]
fn test_core_manifest_has_no_runtime_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("bookshelf/core/Cargo.toml"))
        .expect("core manifest readable");

    let offending: Vec<&str> = manifest
        .lines()
        .map(str::trim)
        .filter(|line| {
            FORBIDDEN_CRATES.iter().any(|name| {
                line.starts_with(&format!("{name} ")) || line.starts_with(&format!("{name}="))
            })
        })
        .collect();

    assert!(
        offending.is_empty(),
        "bookshelf-core must stay runtime free, found: {offending:?}"
    );
}

#[test]
fn test_core_sources_do_not_use_runtime_crates() {
    let violations: Vec<String> = production_lines(CORE_SRC)
        .into_iter()
        .filter(|line| {
            FORBIDDEN_CRATES
                .iter()
                .any(|name| line.code.contains(&format!("{name}::")))
        })
        .map(|line| line.to_string())
        .collect();

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        panic!("Found {} runtime crate use(s) in bookshelf-core", violations.len());
    }
}

#[test]
fn test_core_does_not_read_clock_or_print() {
    let mut violations = Vec::new();
    for line in production_lines(CORE_SRC) {
        for (pattern, fix) in FORBIDDEN_CALLS {
            if line.code.contains(pattern) {
                violations.push(format!("{line} ({fix})"));
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ bookshelf-core must stay headless and clock free\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        panic!("Found {} violation(s) in bookshelf-core", violations.len());
    }
}

#[test]
fn test_core_sources_are_scanned() {
    // Guards against the scan silently matching nothing
    assert!(production_lines(CORE_SRC).len() > 500);
}
