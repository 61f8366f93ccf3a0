//! File-based workflow tests.

use std::fs;
use std::path::PathBuf;

use designtok_core::settings::AnalyzeSettings;
use designtok_core::types::ErrorCode;
use designtok_core::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/button")
        .join(name)
}

fn inputs() -> AnalyzeInputs {
    let mut inputs = AnalyzeInputs::new(fixture("node.json"), fixture("tokens.json"));
    inputs.variables = Some(fixture("variables.json"));
    inputs.extracted_at = Some("2026-01-15T09:30:00Z".into());
    inputs
}

#[test]
fn analyze_workflow_reads_fixture_files() {
    let analysis = analyze_workflow(&inputs(), &AnalyzeSettings::default()).expect("analyze");
    assert_eq!(analysis.component.name, "Button");
    assert_eq!(analysis.classification_summary.total(), 11);
    assert_eq!(analysis.unresolved_bindings.len(), 1);
}

#[test]
fn settings_file_is_loaded_and_validated() {
    let settings = load_settings(Some(&fixture("designtok.toml"))).expect("settings");
    assert_eq!(settings.recommend.min_occurrences, 2);
    assert_eq!(load_settings(None).expect("defaults"), AnalyzeSettings::default());
}

#[test]
fn missing_node_file_is_an_io_failure_naming_the_path() {
    let mut inputs = inputs();
    inputs.node = fixture("does-not-exist.json");
    let err = analyze_workflow(&inputs, &AnalyzeSettings::default()).expect_err("missing");
    assert_eq!(err.code, ErrorCode::IoFailure);
    assert!(err.message.contains("does-not-exist.json"), "{err}");
}

#[test]
fn malformed_node_file_fails_before_any_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let node = dir.path().join("node.json");
    fs::write(&node, r#"{"id":"","name":"Broken","type":"FRAME"}"#).expect("seed");
    let mut inputs = inputs();
    inputs.node = node;

    let err = analyze_workflow(&inputs, &AnalyzeSettings::default()).expect_err("malformed");
    assert_eq!(err.code, ErrorCode::MalformedInput);
    assert_eq!(fs::read_dir(dir.path()).expect("list").count(), 1);
}

#[test]
fn invalid_token_json_is_invalid_json_with_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let tokens = dir.path().join("tokens.json");
    fs::write(&tokens, "{ not json").expect("seed");
    let mut inputs = inputs();
    inputs.tokens = tokens;

    let err = analyze_workflow(&inputs, &AnalyzeSettings::default()).expect_err("bad json");
    assert_eq!(err.code, ErrorCode::InvalidJson);
    assert!(err.details.as_deref().unwrap_or_default().contains("tokens.json"));
}

#[test]
fn emit_then_render_reproduces_identical_artifacts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    let settings = AnalyzeSettings::default();

    let analysis = analyze_workflow(&inputs(), &settings).expect("analyze");
    let emitted = emit_workflow(&first, &analysis, &settings.emit).expect("emit");
    let rendered = render_workflow(&emitted.json, &second, &settings.emit).expect("render");

    assert_eq!(
        fs::read_to_string(&emitted.json).expect("json"),
        fs::read_to_string(&rendered.json).expect("json")
    );
    assert_eq!(
        fs::read_to_string(&emitted.markdown).expect("md"),
        fs::read_to_string(&rendered.markdown).expect("md")
    );
}

#[test]
fn stored_record_with_other_schema_version_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = AnalyzeSettings::default();
    let mut analysis = analyze_workflow(&inputs(), &settings).expect("analyze");
    analysis.schema_version += 1;
    let path = dir.path().join("old.json");
    fs::write(&path, serde_json::to_string(&analysis).expect("json")).expect("seed");

    let err = load_analysis(&path).expect_err("version");
    assert_eq!(err.code, ErrorCode::InvalidJson);
    assert!(err.message.contains("schema version"));
}

/// A node export that is a single chain of frames `levels` deep below the root.
fn write_chain(dir: &std::path::Path, levels: usize) -> PathBuf {
    let mut json = String::new();
    for i in 0..=levels {
        json.push_str(&format!(
            r#"{{"id":"1:{i}","name":"Level {i}","type":"FRAME","children":["#
        ));
    }
    json.push_str(&"]}".repeat(levels + 1));
    let path = dir.join("chain.json");
    fs::write(&path, json).expect("seed chain");
    path
}

#[test]
fn tree_one_level_past_max_depth_is_malformed_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = AnalyzeSettings::default();
    let mut inputs = inputs();
    inputs.node = write_chain(dir.path(), settings.tree.max_depth + 1);

    let err = analyze_workflow(&inputs, &settings).expect_err("too deep");
    assert_eq!(err.code, ErrorCode::MalformedInput);
    assert!(err.message.contains("maximum tree depth"), "{err}");
}

#[test]
fn tree_at_max_depth_round_trips_through_load_analysis() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = AnalyzeSettings::default();
    let mut inputs = inputs();
    inputs.node = write_chain(dir.path(), settings.tree.max_depth);

    let analysis = analyze_workflow(&inputs, &settings).expect("analyze");
    let emitted = emit_workflow(&dir.path().join("out"), &analysis, &settings.emit).expect("emit");
    assert_eq!(load_analysis(&emitted.json).expect("load"), analysis);
}

#[test]
fn tree_at_depth_ceiling_round_trips_through_load_analysis() {
    // Match the main thread's stack; test threads default to 2 MiB.
    std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| {
            let dir = tempfile::tempdir().expect("tempdir");
            let mut settings = AnalyzeSettings::default();
            settings.tree.max_depth = designtok_core::types::MAX_TREE_DEPTH;
            let mut inputs = inputs();
            inputs.node = write_chain(dir.path(), settings.tree.max_depth);

            let analysis = analyze_workflow(&inputs, &settings).expect("analyze");
            let emitted =
                emit_workflow(&dir.path().join("out"), &analysis, &settings.emit).expect("emit");
            assert_eq!(load_analysis(&emitted.json).expect("load"), analysis);
        })
        .expect("spawn")
        .join()
        .expect("ceiling-depth round trip");
}
