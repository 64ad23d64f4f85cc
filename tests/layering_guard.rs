//! Layering guardrails to keep the semantic core free of dependencies.
//!
//! `quill_core` holds the type algebra shared by every other crate. It must stay a leaf: no IO, no logging, no
//! third-party crates. This test scans its `Cargo.toml` and fails if a `[dependencies]` table gains an entry.

#[test]
fn semantic_core_has_no_dependencies() {
    let manifest = include_str!("../crates/quill_core/Cargo.toml");
    let mut in_dependencies = false;

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if !line_no_comment.is_empty() {
            panic!("`quill_core` must not have dependencies, found `{line_no_comment}`");
        }
    }
}

#[test]
fn syntax_crate_does_not_depend_on_the_checker() {
    let manifest = include_str!("../crates/quill_syntax/Cargo.toml");
    assert!(
        !manifest
            .lines()
            .any(|line| line.trim_start().starts_with("quill ") || line.trim_start().starts_with("quill=")),
        "`quill_syntax` must not depend on the root crate"
    );
}
