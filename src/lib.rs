//! # Planning input datasets
//!
//! Table-definition driven management of the tabular inputs of a planning scenario:
//! catalog lookup, payload validation, CSV ingestion, selector metadata and a keyed
//! store of per-(scenario, table) snapshots.

use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod csv_import;
pub mod logging;
pub mod scenarios;
pub mod selectors;
pub mod service;
pub mod storage;
pub mod timestamp;
pub mod validation;
pub mod value_conv;

pub use catalog::{Catalog, TableDefinition, TableId, TableRows};
pub use config::Config;
pub use csv_import::{CsvImport, ImportStatus};
pub use scenarios::{ScenarioLookup, ScenarioSet};
pub use selectors::{Selector, Selectors};
pub use service::{InputDataset, InputDatasetService, UploadResult};
pub use storage::{DatasetBackend, DatasetKey, DatasetStore, PageRequest, StoreError, StoredDataset};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid table ID: {0}")]
    InvalidIdentifier(String),
    #[error("Validation error: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("TableId mismatch: URL contains '{route}' but payload contains '{payload}'")]
    IdentityMismatch { route: String, payload: String },
    #[error("CSV import rejected: {}", .0.errors.join("; "))]
    Import(UploadResult),
    #[error("{0}")]
    BadRequest(String),
    #[error("store failure")]
    Store(#[from] StoreError),
}

pub type DatasetResult<T> = Result<T, DatasetError>;

impl DatasetError {
    pub fn scenario_not_found() -> Self {
        DatasetError::NotFound(String::from("Scenario not found"))
    }

    pub fn dataset_not_found() -> Self {
        DatasetError::NotFound(String::from("Dataset not found"))
    }

    /// HTTP status the REST surface answers with for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            DatasetError::NotFound(_) => 404,
            DatasetError::InvalidIdentifier(_) => 400,
            DatasetError::Validation(_) => 422,
            DatasetError::IdentityMismatch { .. } => 400,
            DatasetError::Import(_) => 422,
            DatasetError::BadRequest(_) => 400,
            DatasetError::Store(_) => 500,
        }
    }

    /// Message safe to hand to a client. Store failures are collapsed to a generic
    /// text so file paths and serializer details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            DatasetError::InvalidIdentifier(_) => String::from("Invalid table ID"),
            DatasetError::Store(_) => String::from("Failed to save dataset"),
            other => other.to_string(),
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.public_message(),
        }
    }
}

/// JSON error payload `{ "error": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
}

/// A single cell of a dataset row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Value {
    pub fn get_kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(num) => num.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(st) => Some(st.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(num) => write!(f, "{}", num),
            Value::String(st) => write!(f, "{}", st),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// One dataset row: field name to cell, in display order.
pub type Row = IndexMap<String, Value>;
