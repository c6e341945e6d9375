//! Integration tests for the `pd` CLI.
//!
//! Each test creates a temp tree plus its own grant file, runs `pd` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the built `pd` binary.
fn pd_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("pd");
    path
}

fn create_test_tree(root: &Path) {
    let pump = root.join("EI/B12/PumpSwap");
    fs::create_dir_all(&pump).unwrap();
    fs::write(
        pump.join("project.json"),
        "{\n\t\"title\": \"Pump Swap\",\n\t\"ecDate\": \"2024-03-04\"\n}\n",
    )
    .unwrap();

    let old = root.join("EI/B12/Completed/OldJob");
    fs::create_dir_all(&old).unwrap();
    fs::write(old.join("project.json"), "{\n\t\"title\": \"Old Job\"\n}\n").unwrap();
}

/// Run `pd` with the given grant file and args, returning (stdout, stderr, success).
fn run_pd(grant_file: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(pd_bin())
        .arg("--grant-file")
        .arg(grant_file)
        .args(args)
        .output()
        .expect("failed to run pd");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.success(),
    )
}

fn setup() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let tree = tmp.path().join("tree");
    create_test_tree(&tree);
    let grant_file = tmp.path().join("grant.toml");
    let (_, stderr, ok) = run_pd(&grant_file, &["root", tree.to_str().unwrap()]);
    assert!(ok, "pd root failed: {}", stderr);
    (tmp, grant_file)
}

#[test]
fn test_scan_reports_count() {
    let (_tmp, grant_file) = setup();
    let (stdout, _, ok) = run_pd(&grant_file, &["scan"]);
    assert!(ok);
    assert_eq!(stdout, "Loaded 2 projects.\n");
}

#[test]
fn test_missing_grant_is_no_folder_selected() {
    let tmp = TempDir::new().unwrap();
    let grant_file = tmp.path().join("grant.toml");
    let (_, stderr, ok) = run_pd(&grant_file, &["scan"]);
    assert!(!ok);
    assert!(stderr.contains("No folder selected."));
}

#[test]
fn test_list_partitions() {
    let (_tmp, grant_file) = setup();

    let (stdout, _, ok) = run_pd(&grant_file, &["list"]);
    assert!(ok);
    assert_eq!(stdout, "[ ] EI/B12/PumpSwap  Pump Swap\n");

    let (stdout, _, ok) = run_pd(&grant_file, &["list", "--completed"]);
    assert!(ok);
    assert_eq!(stdout, "[x] EI/B12/OldJob  Old Job\n");
}

#[test]
fn test_set_writes_through_to_disk() {
    let (tmp, grant_file) = setup();

    let (stdout, _, ok) = run_pd(
        &grant_file,
        &["set", "EI/B12/PumpSwap", "ecDate", "4/5/24"],
    );
    assert!(ok);
    assert_eq!(stdout, "Saved EI/B12/PumpSwap.\n");

    let saved =
        fs::read_to_string(tmp.path().join("tree/EI/B12/PumpSwap/project.json")).unwrap();
    assert_eq!(saved, "{\n\t\"title\": \"Pump Swap\",\n\t\"ecDate\": \"2024-04-05\"\n}\n");
}

#[test]
fn test_set_unknown_field_fails() {
    let (_tmp, grant_file) = setup();
    let (_, stderr, ok) = run_pd(&grant_file, &["set", "EI/B12/PumpSwap", "bogus", "x"]);
    assert!(!ok);
    assert!(stderr.contains("unknown field"));
}

#[test]
fn test_show_json_carries_payload() {
    let (_tmp, grant_file) = setup();
    let (stdout, _, ok) = run_pd(&grant_file, &["--json", "show", "EI/B12/PumpSwap"]);
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["id"], "EI/B12/PumpSwap");
    assert_eq!(json["data"]["ecDate"], "2024-03-04");
}

#[test]
fn test_search_and_calendar() {
    let (_tmp, grant_file) = setup();

    let (stdout, _, ok) = run_pd(&grant_file, &["search", "pump"]);
    assert!(ok);
    assert_eq!(stdout, "[ ] EI/B12/PumpSwap  Pump Swap\n");

    let (stdout, _, ok) = run_pd(&grant_file, &["calendar"]);
    assert!(ok);
    assert_eq!(stdout, "== March 2024 ==\n  2024-03-04  Pump Swap  (EI/B12/PumpSwap)\n");
}

#[test]
fn test_path_uses_backslash_segments() {
    let (_tmp, grant_file) = setup();
    let (stdout, _, ok) = run_pd(&grant_file, &["path", "EI/B12/OldJob"]);
    assert!(ok);
    assert_eq!(stdout, "EI\\B12\\Completed\\OldJob\n");
}
