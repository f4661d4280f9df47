//! CSV uploads through the public API.

use pretty_assertions::assert_eq;
use sql_playground::db::Value;
use sql_playground::tui::app::{App, Tab};
use sql_playground::upload::{load_csv, UploadError};
use std::path::Path;

#[test]
fn test_non_csv_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.txt");
    std::fs::write(&path, "a,b\n1,2\n").unwrap();

    let err = load_csv(&path).unwrap_err();
    assert_eq!(err, UploadError::InvalidFileType);
    assert_eq!(err.to_string(), "Please upload a CSV file");
}

#[test]
fn test_empty_path_needs_selection() {
    assert_eq!(load_csv(Path::new("")).unwrap_err(), UploadError::NoFileSelected);
}

#[test]
fn test_header_only_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "id,name\n").unwrap();

    assert_eq!(load_csv(&path).unwrap_err(), UploadError::Empty);
}

#[test]
fn test_upload_replaces_result_and_resets_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inventory.csv");
    let mut content = String::from("sku,qty\n");
    for i in 0..12 {
        content.push_str(&format!("SKU-{i},{i}\n"));
    }
    std::fs::write(&path, content).unwrap();

    let mut app = App::default();
    app.tab = Tab::Upload;
    app.finish_upload(load_csv(&path));

    let view = app.current_view().unwrap();
    assert_eq!(view.current_page, 1);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.columns.to_vec(), vec!["sku".to_string(), "qty".to_string()]);
    assert_eq!(view.rows[0]["sku"], Value::from("SKU-0"));
    assert_eq!(app.tab, Tab::Editor);
    assert_eq!(app.upload.loaded_file.as_deref(), Some("inventory.csv"));
}
