//! Conformance tests that run YAML fixtures against typecase
//!
//! Run with: cargo test -p typecase-test --test conformance
//!
//! Note: This test file requires the `fixtures` feature (on by default).

#![cfg(feature = "fixtures")]

use std::fs;
use std::path::{Path, PathBuf};
use typecase_test::fixture::Fixture;

/// The fixtures directory of this crate
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run every fixture in one file
fn run_fixture_file(name: &str) {
    let path = fixtures_dir().join(name);
    println!("Running fixture: {}", path.display());

    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));

    // Parse potentially multiple fixtures (separated by ---)
    let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
        panic!("Failed to parse {}: {}", path.display(), e);
    });
    assert!(!fixtures.is_empty(), "{} has no fixtures", path.display());

    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert();
    }
}

#[test]
fn test_kind_dispatch() {
    run_fixture_file("01_kinds.yaml");
}

#[test]
fn test_guards() {
    run_fixture_file("02_guards.yaml");
}

#[test]
fn test_fallback() {
    run_fixture_file("03_fallback.yaml");
}

#[test]
fn test_load_errors() {
    run_fixture_file("04_load_errors.yaml");
}

#[test]
fn test_every_fixture_file_is_run() {
    let mut files: Vec<_> = fs::read_dir(fixtures_dir())
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").file_name())
        .filter(|name| Path::new(name).extension().is_some_and(|e| e == "yaml"))
        .collect();
    files.sort();

    assert_eq!(
        files,
        [
            "01_kinds.yaml",
            "02_guards.yaml",
            "03_fallback.yaml",
            "04_load_errors.yaml"
        ]
    );
}
