//! CSV upload for local inspection.
//!
//! The file is validated by name, parsed with its first row as the header,
//! and turned into a `QueryResult` whose cells are all text.

use crate::db::{QueryResult, Row, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// User-visible upload failures. The messages are shown verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please upload a CSV file")]
    InvalidFileType,

    #[error("Please select a file first")]
    NoFileSelected,

    #[error("The CSV file is empty or could not be parsed")]
    Empty,

    #[error("Error parsing CSV: {0}")]
    Parse(String),
}

/// A parsed CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvUpload {
    pub result: QueryResult,
    pub file_name: String,
}

/// Media type a file picker would declare for a CSV file, from the extension
/// in any case.
pub fn declared_media_type(path: &Path) -> Option<&'static str> {
    path.extension()?
        .to_str()?
        .eq_ignore_ascii_case("csv")
        .then_some("text/csv")
}

/// Accepts a file whose name ends in `.csv` or whose media type is CSV.
pub fn validate_file_type(path: &Path) -> Result<(), UploadError> {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(".csv"));

    if name_ok || declared_media_type(path) == Some("text/csv") {
        Ok(())
    } else {
        Err(UploadError::InvalidFileType)
    }
}

/// Validates, opens and parses the file at `path`.
pub fn load_csv(path: &Path) -> Result<CsvUpload, UploadError> {
    if path.as_os_str().is_empty() {
        return Err(UploadError::NoFileSelected);
    }
    validate_file_type(path)?;

    let file = File::open(path).map_err(|e| UploadError::Parse(e.to_string()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let upload = parse_csv(file, file_name)?;
    info!(
        "Loaded {} ({} rows, {} columns)",
        upload.file_name,
        upload.result.row_count(),
        upload.result.columns.len()
    );
    Ok(upload)
}

/// Parses CSV text. The header row becomes the column list.
///
/// Short records are padded with empty strings and extra fields are dropped,
/// so every row carries exactly the header columns.
pub fn parse_csv<R: Read>(reader: R, file_name: impl Into<String>) -> Result<CsvUpload, UploadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| UploadError::Parse(e.to_string()))?
        .clone();
    let columns = unique_columns(headers.iter());

    if columns.is_empty() {
        return Err(UploadError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| UploadError::Parse(e.to_string()))?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        let row: Row = columns
            .iter()
            .enumerate()
            .map(|(i, col)| (col.clone(), Value::from(record.get(i).unwrap_or(""))))
            .collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(UploadError::Empty);
    }

    debug!("Parsed CSV with columns {:?}", columns);
    Ok(CsvUpload {
        result: QueryResult::with_data(columns, rows),
        file_name: file_name.into(),
    })
}

/// Renames repeated header names to `name_1`, `name_2`, ...
fn unique_columns<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for header in headers {
        let mut name = header.to_string();
        let mut n = 0;
        while !seen.insert(name.clone()) {
            n += 1;
            name = format!("{header}_{n}");
        }
        columns.push(name);
    }

    // A lone empty header means the file had no header line at all.
    if columns.len() == 1 && columns[0].is_empty() {
        columns.clear();
    }
    columns
}
