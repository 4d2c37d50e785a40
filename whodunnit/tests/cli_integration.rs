//! Integration tests for whodunnit CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::{tempdir, TempDir};

const FLAG_VARS: [&str; 4] = [
    "WHODUNNIT_WITH_DOT_FILES",
    "WHODUNNIT_WITH_CONFIG_FILES",
    "WHODUNNIT_WITH_GENERATED_FILES",
    "WHODUNNIT_WITH_VENDOR_FILES",
];

fn command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_whodunnit"));
    cmd.args(args).env_remove("RUST_LOG");
    for var in FLAG_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn run_whodunnit(args: &[&str]) -> (String, String, bool) {
    let output = command(args).output().expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

/// A small tree: Go, Python, an ignored log, a config file and a dotfile.
fn sample_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("a.go"), "package a\n\nfunc A() {}\n").unwrap();
    fs::write(root.join("b.py"), "1\n2\n3\n4\n5\n").unwrap();
    fs::write(root.join(".gitignore"), "*.log\n").unwrap();
    fs::write(root.join("x.log"), "noise\nnoise\n").unwrap();
    fs::write(root.join("settings.json"), "{\n}\n").unwrap();
    dir
}

fn path_arg(dir: &Path) -> String {
    dir.to_string_lossy().to_string()
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_whodunnit(&["--help"]);

    assert!(success);
    assert!(stdout.contains("whodunnit"));
    assert!(stdout.contains("--with-dot-files"));
    assert!(stdout.contains("--with-config-files"));
    assert!(stdout.contains("--no-blame"));
    assert!(stdout.contains("--json"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_whodunnit(&["--version"]);

    assert!(success);
    assert!(stdout.contains("whodunnit"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_table_output() {
    let dir = sample_tree();
    let (stdout, stderr, success) = run_whodunnit(&[&path_arg(dir.path())]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.contains("Filetype"));
    assert!(stdout.contains("Go"));
    assert!(stdout.contains("Python"));
    assert!(stdout.contains("Total (2 types)"));
    assert!(!stdout.contains("JSON"));
    // Not a repository: counts are still shown, with a notice.
    assert!(stderr.contains("no history"));
    assert!(!stdout.contains("Lines by author"));
}

#[test]
fn test_no_blame_skips_notice() {
    let dir = sample_tree();
    let (stdout, stderr, success) = run_whodunnit(&["--no-blame", &path_arg(dir.path())]);

    assert!(success);
    assert!(stdout.contains("Python"));
    assert!(!stderr.contains("no history"));
}

#[test]
fn test_json_output() {
    let dir = sample_tree();
    let (stdout, stderr, success) = run_whodunnit(&["--json", &path_arg(dir.path())]);

    assert!(success, "stderr: {stderr}");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");

    assert_eq!(parsed["total_lines"], 8);
    assert_eq!(parsed["file_counts"]["counts"]["Go"]["count"], 3);
    assert_eq!(parsed["file_counts"]["counts"]["Python"]["count"], 5);
    assert!(parsed["file_counts"]["counts"].get("JSON").is_none());
    assert_eq!(parsed["history"]["status"], "no_history");
    assert_eq!(parsed["included_files"].as_array().unwrap().len(), 2);
}

#[test]
fn test_json_without_blame() {
    let dir = sample_tree();
    let (stdout, _, success) = run_whodunnit(&["--json", "--no-blame", &path_arg(dir.path())]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["history"]["status"], "not_run");
}

#[test]
fn test_with_config_files_flag() {
    let dir = sample_tree();
    let (stdout, _, success) = run_whodunnit(&[
        "--json",
        "--no-blame",
        "--with-config-files",
        &path_arg(dir.path()),
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["file_counts"]["counts"]["JSON"]["count"], 2);
    assert_eq!(parsed["total_lines"], 10);
    assert_eq!(parsed["exclusions"]["config_files"], false);
}

#[test]
fn test_with_flag_from_environment() {
    let dir = sample_tree();
    let output = command(&["--json", "--no-blame", &path_arg(dir.path())])
        .env("WHODUNNIT_WITH_DOT_FILES", "true")
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["exclusions"]["dot_files"], false);
    // The ignore file itself is now counted.
    assert_eq!(parsed["total_lines"], 9);
}

#[test]
fn test_ignored_file_is_not_listed() {
    let dir = sample_tree();
    let (stdout, _, success) = run_whodunnit(&["--json", "--no-blame", &path_arg(dir.path())]);

    assert!(success);
    assert!(!stdout.contains("x.log"));
}

#[test]
fn test_sort_by_name() {
    let dir = sample_tree();
    let (stdout, _, success) =
        run_whodunnit(&["--no-blame", "--sort", "name", &path_arg(dir.path())]);

    assert!(success);
    let go = stdout.find("Go ").unwrap();
    let python = stdout.find("Python").unwrap();
    assert!(go < python);
}

#[test]
fn test_invalid_path() {
    let (_, stderr, success) = run_whodunnit(&["/nonexistent/path/that/does/not/exist"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("does not exist"));
}

#[test]
fn test_file_as_root() {
    let dir = sample_tree();
    let (_, stderr, success) = run_whodunnit(&[&path_arg(&dir.path().join("a.go"))]);

    assert!(!success);
    assert!(stderr.contains("is not a directory"));
}

#[test]
fn test_zero_workers_rejected() {
    let dir = sample_tree();
    let (_, _, success) = run_whodunnit(&["--workers", "0", &path_arg(dir.path())]);

    assert!(!success);
}
