//! End-to-end tests for `designtok analyze` and `designtok render`.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/button")
        .join(name)
}

fn designtok_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_designtok"));
    cmd.env_remove("DESIGNTOK_LOG");
    cmd
}

fn analyze_cmd(out: &std::path::Path) -> Command {
    let mut cmd = designtok_cmd();
    cmd.arg("analyze")
        .arg("--node")
        .arg(fixture("node.json"))
        .arg("--tokens")
        .arg(fixture("tokens.json"))
        .arg("--variables")
        .arg(fixture("variables.json"))
        .arg("--extracted-at")
        .arg("2026-01-15T09:30:00Z")
        .arg("--out")
        .arg(out);
    cmd
}

#[test]
fn analyze_writes_both_artifacts_and_prints_their_paths() {
    let dir = tempdir().expect("tempdir");
    analyze_cmd(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("button-analysis.json"))
        .stdout(predicate::str::contains("button-analysis.md"));

    let json: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("button-analysis.json")).expect("json"),
    )
    .expect("valid json");
    assert_eq!(json["component"]["name"], "Button");

    let md = fs::read_to_string(dir.path().join("button-analysis.md")).expect("md");
    assert!(md.starts_with("# Component Analysis: Button"));
}

#[test]
fn analyze_is_byte_identical_across_runs() {
    let first = tempdir().expect("tempdir");
    let second = tempdir().expect("tempdir");
    analyze_cmd(first.path()).assert().success();
    analyze_cmd(second.path()).assert().success();

    for name in ["button-analysis.json", "button-analysis.md"] {
        assert_eq!(
            fs::read(first.path().join(name)).expect("first"),
            fs::read(second.path().join(name)).expect("second"),
            "{name} differs"
        );
    }
}

#[test]
fn indent_flag_overrides_config() {
    let dir = tempdir().expect("tempdir");
    analyze_cmd(dir.path())
        .arg("--config")
        .arg(fixture("designtok.toml"))
        .arg("--indent")
        .arg("0")
        .assert()
        .success();

    let json = fs::read_to_string(dir.path().join("button-analysis.json")).expect("json");
    assert_eq!(json.lines().count(), 1);
}

#[test]
fn no_recommend_drops_the_section() {
    let dir = tempdir().expect("tempdir");
    analyze_cmd(dir.path()).arg("--no-recommend").assert().success();

    let md = fs::read_to_string(dir.path().join("button-analysis.md")).expect("md");
    assert!(!md.contains("## Recommendations"));
}

#[test]
fn missing_node_file_fails_with_hint_and_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let out = dir.path().join("out");
    designtok_cmd()
        .arg("analyze")
        .arg("--node")
        .arg(dir.path().join("absent.json"))
        .arg("--tokens")
        .arg(fixture("tokens.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("io_failure"))
        .stderr(predicate::str::contains("Hints:"));
    assert!(!out.exists());
}

#[test]
fn depth_limit_is_reported_as_malformed_input() {
    let dir = tempdir().expect("tempdir");
    analyze_cmd(dir.path())
        .arg("--max-depth")
        .arg("1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed_input"));
}

#[test]
fn render_reproduces_markdown_from_record() {
    let dir = tempdir().expect("tempdir");
    let rerendered = dir.path().join("again");
    analyze_cmd(dir.path()).assert().success();

    designtok_cmd()
        .arg("render")
        .arg("--input")
        .arg(dir.path().join("button-analysis.json"))
        .arg("--out")
        .arg(&rerendered)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("button-analysis.md")).expect("md"),
        fs::read_to_string(rerendered.join("button-analysis.md")).expect("md again"),
    );
}

#[test]
fn verbose_logs_go_to_stderr_only() {
    let dir = tempdir().expect("tempdir");
    analyze_cmd(dir.path())
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("analysis written").not())
        .stderr(predicate::str::contains("analysis written"));
}
