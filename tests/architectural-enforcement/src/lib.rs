//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The core stays headless: no async runtime, no terminal, no wall clock
//! - No sleep() calls in production code outside the simulated loader
//! - No blocking I/O inside the async CLI
//!
//! The helpers here walk the workspace sources and hand each test the code
//! lines it should inspect, with comments and `#[cfg(test)]` modules removed.

use std::fs;
use std::path::{Path, PathBuf};

/// A line of production code
#[derive(Debug, Clone)]
pub struct CodeLine {
    /// File the line came from
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Line text with any trailing `//` comment removed
    pub code: String,
}

impl std::fmt::Display for CodeLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.number, self.code.trim())
    }
}

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

/// All `.rs` files under `dir`, relative to the workspace root
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Production code lines of every file under `dir`
pub fn production_lines(dir: &str) -> Vec<CodeLine> {
    rust_files(dir)
        .into_iter()
        .flat_map(|path| {
            let content = fs::read_to_string(&path).unwrap_or_default();
            strip_tests_and_comments(&content)
                .into_iter()
                .map(move |(number, code)| CodeLine {
                    path: path.clone(),
                    number,
                    code,
                })
        })
        .collect()
}

/// Keep (line number, code) pairs outside `#[cfg(test)]` items and drop
/// comment text
pub fn strip_tests_and_comments(content: &str) -> Vec<(usize, String)> {
    let mut kept = Vec::new();
    let mut pending_cfg_test = false;
    let mut skip_depth: Option<i32> = None;
    let mut depth = 0_i32;

    for (idx, line) in content.lines().enumerate() {
        let code = line.split("//").next().unwrap_or(line);
        let trimmed = code.trim();

        let opens = i32::try_from(code.matches('{').count()).unwrap_or(0);
        let closes = i32::try_from(code.matches('}').count()).unwrap_or(0);

        if skip_depth.is_none() {
            if trimmed.starts_with("#[cfg(test)]") {
                pending_cfg_test = true;
            } else if pending_cfg_test && !trimmed.is_empty() && !trimmed.starts_with("#[") {
                pending_cfg_test = false;
                if opens > closes {
                    skip_depth = Some(depth);
                } else if !trimmed.ends_with(';') {
                    // Brace on a later line
                    skip_depth = Some(depth);
                }
            } else if !trimmed.is_empty() {
                kept.push((idx + 1, code.to_string()));
            }
        }

        depth += opens - closes;
        if let Some(start) = skip_depth {
            if depth <= start && closes > 0 {
                skip_depth = None;
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_drops_test_modules_and_comments() {
        let source = "\
use std::time::Duration; // wall clock free
fn real() {
    work();
}

#[cfg(test)]
mod tests {
    fn helper() {
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn after() {}
";
        let kept: Vec<String> = strip_tests_and_comments(source)
            .into_iter()
            .map(|(_, code)| code.trim().to_string())
            .collect();
        assert_eq!(
            kept,
            vec![
                "use std::time::Duration;",
                "fn real() {",
                "work();",
                "}",
                "fn after() {}",
            ]
        );
    }

    #[test]
    fn test_cfg_test_single_item_is_skipped() {
        let source = "\
#[cfg(test)]
pub(crate) fn fixture() -> u8 {
    1
}
pub fn kept() {}
";
        let kept: Vec<usize> = strip_tests_and_comments(source)
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(kept, vec![5]);
    }

    #[test]
    fn test_workspace_root_has_core() {
        assert!(workspace_root().join("bookshelf/core/Cargo.toml").exists());
    }
}
