//! Saved-query flows in headless mode, with and without a state file.

use super::common::{run_headless, run_json};
use pretty_assertions::assert_eq;

const SAVE_SCRIPT: &str = "type:SELECT * FROM products\n\
                           key:ctrl+s\n\
                           type:All products\n\
                           key:enter";

#[test]
fn test_save_and_search() {
    let events = format!("{SAVE_SCRIPT}\nkey:tab\ntype:ALL PROD");
    let (code, json) = run_json(&["--events", &events]);

    assert_eq!(code, 0);
    assert_eq!(json["state"]["saved_count"], 1);
    assert_eq!(json["state"]["tab"], "Saved");
    assert!(json["screen"].as_str().unwrap().contains("All products"));
}

#[test]
fn test_search_without_match() {
    let events = format!("{SAVE_SCRIPT}\nkey:tab\ntype:zzz");
    let (_, json) = run_json(&["--events", &events]);
    assert!(json["screen"]
        .as_str()
        .unwrap()
        .contains("No saved queries match"));
}

#[test]
fn test_blank_name_does_not_save() {
    let (_, json) = run_json(&["--events", "type:SELECT 1\nkey:ctrl+s\nkey:enter"]);
    assert_eq!(json["state"]["saved_count"], 0);
}

#[test]
fn test_saved_query_persists_with_state_file() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    let state_arg = state.to_str().unwrap();

    let (code, _, _) = run_headless(&["--state-file", state_arg, "--events", SAVE_SCRIPT]);
    assert_eq!(code, 0);
    assert!(state.exists());

    let (code, json) = run_json(&[
        "--state-file",
        state_arg,
        "--events",
        "key:tab,key:enter",
    ]);
    assert_eq!(code, 0);
    assert_eq!(json["state"]["saved_count"], 1);
    assert_eq!(json["state"]["query_text"], "SELECT * FROM products");
}

#[test]
fn test_delete_saved_query() {
    let events = format!("{SAVE_SCRIPT}\nkey:tab\nkey:delete");
    let (_, json) = run_json(&["--events", &events]);
    assert_eq!(json["state"]["saved_count"], 0);
}
