//! Hygiene: enforces coding standards at test time
//!
//! Scans the client crate's production sources for antipatterns. Each pattern
//! has a budget (ideally zero). If you must add one, fix an existing one first;
//! the budget never grows.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics: a store action must never bring the view down.
    Budget { pattern: ".unwrap()", max: 0, why: "panics" },
    Budget { pattern: ".expect(", max: 0, why: "panics" },
    Budget { pattern: "panic!(", max: 0, why: "panics" },
    Budget { pattern: "unreachable!(", max: 0, why: "panics" },
    Budget { pattern: "todo!(", max: 0, why: "unfinished" },
    Budget { pattern: "unimplemented!(", max: 0, why: "unfinished" },
    // Silent loss: failures are recorded in a fetch slot, not dropped.
    Budget { pattern: "let _ =", max: 0, why: "discards a value unseen" },
    // The one allowed use maps an unset environment variable to `None`.
    Budget { pattern: ".ok()", max: 1, why: "discards an error unseen" },
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "hides unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`. Sibling `_test.rs` files and the
/// test-only fixtures module are skipped.
fn source_files(root: &str) -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new(root), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        let is_rust = path.extension().is_some_and(|e| e == "rs");
        if !is_rust || path_str.ends_with("_test.rs") || path_str.ends_with("test_helpers.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter().map(|(path, count)| format!("  {path}: {count}")).collect::<Vec<_>>().join("\n")
}

#[test]
fn sources_were_found() {
    assert!(source_files("src").len() >= 10, "expected to scan the client sources from the crate root");
}

#[test]
fn antipattern_budgets() {
    let files = source_files("src");
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            failures.push(format!(
                "`{}` ({}) budget exceeded: found {count}, max {}.\n{}",
                budget.pattern,
                budget.why,
                budget.max,
                format_hits(&found)
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn stores_reach_the_network_only_through_the_api_trait() {
    let files = source_files("src/state");
    let found = hits(&files, "reqwest");
    assert!(found.is_empty(), "state modules must go through LeadApi:\n{}", format_hits(&found));
}
