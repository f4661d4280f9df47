//! Integration tests for headless mode.

use super::common::{run_headless, run_json};
use pretty_assertions::assert_eq;

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&["--events", "key:esc"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("SQL Query Runner"));
    assert!(stdout.contains("Run a query to see results here"));
    assert!(stdout.contains("Events: 1 executed"));
}

#[test]
fn test_predefined_query_paginates() {
    let (code, json) = run_json(&["--events", "key:f1,key:pagedown"]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["query_text"], "SELECT * FROM customers");
    assert_eq!(json["state"]["page"], 2);
    assert_eq!(json["state"]["total_pages"], 3);
    assert_eq!(json["state"]["row_count"], 25);
    assert!(json["screen"]
        .as_str()
        .unwrap()
        .contains("Page 2 of 3 (showing 10 of 25 items)"));
}

#[test]
fn test_typed_query_lands_in_history() {
    let (code, json) = run_json(&[
        "--events",
        "type:SELECT * FROM orders\nkey:enter\nkey:tab\nkey:tab",
    ]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["tab"], "History");
    assert_eq!(json["state"]["history_count"], 1);
    assert!(json["screen"].as_str().unwrap().contains("SELECT * FROM orders"));
}

#[test]
fn test_theme_toggle() {
    let (_, json) = run_json(&["--events", "key:ctrl+t"]);
    assert_eq!(json["state"]["dark_mode"], true);
    assert!(json["screen"].as_str().unwrap().contains("Dark"));
}

#[test]
fn test_assertion_failure_sets_exit_code() {
    let (code, stdout, _) = run_headless(&["--events", "assert:contains:definitely not on screen"]);

    assert_eq!(code, 1);
    assert!(stdout.contains("Assertions: 0 passed, 1 failed"));
}

#[test]
fn test_state_assertions_pass() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "key:f2,assert:state:history_count=1,assert:state:page=1,assert:contains:Page 1 of 3",
    ]);

    assert_eq!(code, 0, "{stdout}");
    assert!(stdout.contains("Assertions: 3 passed, 0 failed"));
}

#[test]
fn test_three_row_screen_renders() {
    let (code, stdout, stderr) = run_headless(&["--size", "120x3", "--events", "key:f1,key:tab"]);

    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("SQL Query Runner"));
    assert!(stdout.contains("Events: 2 executed"));
}

#[test]
fn test_shrinking_screen_keeps_session_alive() {
    let (code, json) = run_json(&[
        "--events",
        "key:f2,resize:120x2,key:tab,resize:40x1,key:tab,resize:120x40,assert:state:tab=History",
    ]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["row_count"], 25);
    assert!(json["screen"].as_str().unwrap().contains("SQL Query Runner"));
}

#[test]
fn test_frames_output() {
    let (code, stdout, _) = run_headless(&["--events", "key:tab,key:tab", "--output", "frames"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 2 (key:tab) ==="));
    assert!(stdout.contains("Total: 3 frames"));
}

#[test]
fn test_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("run.txt");
    std::fs::write(
        &script,
        "# run a sample and move forward\nkey:f6\nkey:enter\nkey:pagedown\nassert:state:page=2\n",
    )
    .unwrap();

    let (code, stdout, _) = run_headless(&["--script", script.to_str().unwrap()]);
    assert_eq!(code, 0, "{stdout}");
}

#[test]
fn test_upload_rejects_non_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let events = format!("key:backtab,type:{}\nkey:enter", path.display());
    let (code, json) = run_json(&["--events", &events]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["tab"], "Upload");
    assert_eq!(json["state"]["upload_error"], "Please upload a CSV file");
}

#[test]
fn test_upload_csv_shows_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.csv");
    std::fs::write(&path, "name,city\nAda,London\nGrace,Arlington\n").unwrap();

    let events = format!("key:backtab,type:{}\nkey:enter", path.display());
    let (code, json) = run_json(&["--events", &events]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["tab"], "Editor");
    assert_eq!(json["state"]["row_count"], 2);
    let screen = json["screen"].as_str().unwrap();
    assert!(screen.contains("Results: people.csv"));
    assert!(screen.contains("Grace"));
}

#[test]
fn test_missing_events_is_an_error() {
    let (code, _, stderr) = run_headless(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("requires --events or --script"));
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.txt");

    let (code, stdout, _) = run_headless(&[
        "--events",
        "key:f3",
        "--output-file",
        out.to_str().unwrap(),
    ]);

    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(std::fs::read_to_string(&out).unwrap().contains("Page 1 of 3"));
}
