//! Uploaded file reader.
//!
//! The upload is shown as-is. It is never merged into the billing table
//! and feeds no aggregation.

use crate::error::{DashError, DashResult};
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadedTable {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// What the upload area of the page shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadPanel {
    #[default]
    None,
    Loaded { table: UploadedTable },
    Rejected { file_name: String, message: String },
}

impl UploadPanel {
    /// Read `path`. A bad file becomes a `Rejected` panel, never an error.
    pub fn from_path(path: &Path) -> Self {
        match read_upload(path) {
            Ok(table) => {
                log::info!(
                    "upload '{}': {} columns, {} rows",
                    table.file_name,
                    table.columns.len(),
                    table.rows.len()
                );
                UploadPanel::Loaded { table }
            }
            Err(e) => {
                log::warn!("upload '{}' rejected: {e}", path.display());
                UploadPanel::Rejected {
                    file_name: file_name(path),
                    message: e.to_string(),
                }
            }
        }
    }
}

pub fn read_upload(path: &Path) -> DashResult<UploadedTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => read_csv(path),
        Some("xlsx" | "xls" | "xlsm" | "xlsb" | "ods") => read_spreadsheet(path),
        _ => Err(DashError::UnsupportedUpload {
            file_name: file_name(path),
        }),
    }
}

fn read_csv(path: &Path) -> DashResult<UploadedTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(DashError::EmptyUpload {
            file_name: file_name(path),
        });
    }

    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    Ok(UploadedTable {
        file_name: file_name(path),
        columns,
        rows,
    })
}

fn read_spreadsheet(path: &Path) -> DashResult<UploadedTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DashError::EmptyUpload {
            file_name: file_name(path),
        })??;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let columns = rows.next().ok_or_else(|| DashError::EmptyUpload {
        file_name: file_name(path),
    })?;

    Ok(UploadedTable {
        file_name: file_name(path),
        columns,
        rows: rows.collect(),
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.clone(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.clone(),
        Data::DurationIso(v) => v.clone(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
