//! Snapshot tests for error report formatting
//!
//! These tests pin down the Elm-style report layout. If the format changes
//! intentionally, update the .expected files by running:
//!
//!     UPDATE_SNAPSHOTS=1 cargo test error_snapshots
//!
//! The snapshot files are in tests/snapshots/

use std::fs;

use stagelink::errors::{format_header, Colors};
use stagelink::test_support::{compile_stage, translate};
use stagelink::{parse, CompileError, ErrorConfig, SourceMap};

/// Assert that actual output matches snapshot file, or create/update if UPDATE_SNAPSHOTS=1
fn assert_snapshot(actual: &str, snapshot_name: &str) {
    let snapshot_path = format!("tests/snapshots/{}.expected", snapshot_name);

    if std::env::var("UPDATE_SNAPSHOTS").is_ok() {
        fs::write(&snapshot_path, actual).expect("Failed to write snapshot");
        println!("Updated snapshot: {}", snapshot_path);
        return;
    }

    let expected = fs::read_to_string(&snapshot_path).unwrap_or_else(|_| {
        panic!(
            "Snapshot not found: {}\n\
             Run with UPDATE_SNAPSHOTS=1 to create it.\n\
             Actual output:\n{}",
            snapshot_path, actual
        )
    });

    assert_eq!(
        actual, expected,
        "\nSnapshot mismatch for {}\n\
         Run with UPDATE_SNAPSHOTS=1 to update.\n\
         Actual:\n{}\n\
         Expected:\n{}",
        snapshot_name, actual, expected
    );
}

fn render(err: &CompileError, source: &str) -> String {
    let config = ErrorConfig::new(false).with_filename("material.stage");
    err.render(&SourceMap::new(source), &config)
}

#[test]
fn snapshot_unsupported_while() {
    let source = "output color: vec4;\nfn frag_shader(self) {\n    while self.t < 1.0 {\n        self.t += 0.1;\n    }\n}\n";
    let err = compile_stage(source, "frag_shader").unwrap_err();
    assert_snapshot(&render(&err, source), "unsupported_while");
}

#[test]
fn snapshot_missing_function() {
    let source = "fn frag_shader(self) { self.shad(); }\nfn shade(self) {}\n";
    let err = compile_stage(source, "frag_shader").unwrap_err();
    assert_snapshot(&render(&err, source), "missing_function");
}

#[test]
fn snapshot_unknown_type() {
    let source = "varying normal: vec5;";
    let err = parse(source).unwrap_err();
    assert_snapshot(&render(&err, source), "unknown_type");
}

#[test]
fn snapshot_missing_stage() {
    let source = "fn vertex_shader(self) {}";
    let err = translate(source).unwrap_err();
    assert_snapshot(&render(&err, source), "missing_stage");
}

#[test]
fn colors_wrap_the_header() {
    let header = format_header("MISSING STAGE", &Colors::new(true));
    assert!(header.starts_with("\x1b[36m-- MISSING STAGE"));
    assert!(header.ends_with("\x1b[0m"));
}

#[test]
fn synthesized_spans_render_without_a_snippet() {
    let err = CompileError::UnsupportedConstruct {
        kind: "while loop",
        span: Default::default(),
    };
    let report = render(&err, "fn frag_shader(self) {}");
    assert!(!report.contains("material.stage:"));
    assert!(report.ends_with("cannot emit while loop: not supported by the GLSL backend"));
}
