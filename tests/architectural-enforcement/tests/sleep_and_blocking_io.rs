//! Integration Test: Sleep and Blocking I/O Prohibition
//!
//! **Policy**: Production code MUST NOT sleep; the CLI waits on its frame
//! interval, the loader channel and input instead. The CLI runs on tokio and
//! MUST NOT use blocking file or network I/O.
//!
//! **Exceptions**: the simulated model loader sleeps to stand in for network
//! latency; test code is never scanned.

use std::path::Path;

use architectural_enforcement::{production_lines, CodeLine};

const SLEEP_ALLOWED_IN: &[&str] = &["cli/src/loader.rs"];

const BLOCKING_IO: &[&str] = &[
    "std::fs::",
    "std::net::",
    "std::process::Command",
    "std::io::stdin",
    "std::io::Read",
];

fn allowed(path: &Path, files: &[&str]) -> bool {
    files.iter().any(|suffix| path.ends_with(suffix))
}

fn report(title: &str, violations: &[CodeLine]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ CRITICAL: {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!(
        "\nFound {} violation(s): {title}.\nFix these before merging!",
        violations.len()
    );
}

#[test]
fn test_no_sleep_in_production_code() {
    let violations: Vec<CodeLine> = ["bookshelf/core/src", "bookshelf/cli/src"]
        .into_iter()
        .flat_map(production_lines)
        .filter(|line| line.code.contains("::sleep(") || line.code.contains(".sleep("))
        .filter(|line| !allowed(&line.path, SLEEP_ALLOWED_IN))
        .collect();

    report("Sleep calls found in production code", &violations);
}

#[test]
fn test_no_blocking_io_in_cli() {
    let violations: Vec<CodeLine> = production_lines("bookshelf/cli/src")
        .into_iter()
        .filter(|line| BLOCKING_IO.iter().any(|p| line.code.contains(p)))
        .collect();

    report("Blocking I/O calls found in the async CLI", &violations);
}
