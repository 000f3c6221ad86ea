//! CSV ingestion of dataset rows.
//!
//! Lines are split with a quote toggle: every `"` flips the "inside quotes" state and is
//! dropped from the token, so commas inside a quoted span do not split. Doubled quotes
//! (`""`) are therefore *not* unescaped the RFC 4180 way; they simply toggle twice.
//! Uploaded files from the planning UI rely on this behaviour.

use serde::Serialize;

use crate::Row;

pub mod parser;
pub mod upload_body;

pub use parser::{convert_value, parse, parse_header, split_line};
pub use upload_body::extract_csv;

/// Per-line errors echoed back after an aborted import.
pub const MAX_SAMPLE_ERRORS: usize = 5;

pub const EMPTY_INPUT: &str = "CSV file is empty";
pub const TOO_MANY_ERRORS: &str = "Too many parsing errors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportStatus {
    /// Every usable line was parsed; ragged lines (if any) are listed in `errors`.
    Complete,
    /// No non-blank line in the input.
    Empty,
    /// At least half of the data lines were ragged; no rows are returned.
    Aborted,
}

/// Outcome of parsing one CSV text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvImport {
    pub rows: Vec<Row>,
    pub errors: Vec<String>,
    /// Non-blank lines after the header.
    pub data_lines: usize,
    pub status: ImportStatus,
}

impl CsvImport {
    pub fn is_rejected(&self) -> bool {
        self.status != ImportStatus::Complete
    }
}
