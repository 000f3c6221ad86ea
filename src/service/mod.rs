//! Dataset operations as the planning tool's REST surface calls them: get a page,
//! save a full payload, upload CSV, sync from the datalake, issue a download link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TableId};
use crate::config::Config;
use crate::scenarios::ScenarioLookup;
use crate::selectors::Selectors;
use crate::storage::{DatasetBackend, DatasetStore};
use crate::Row;

pub mod input_datasets;
pub mod mock_data;

pub const DATALAKE_SOURCE: &str = "datalake";
pub const DOWNLOAD_FORMAT: &str = "csv";

/// One full snapshot of a table's rows, as sent by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDataset {
    pub table_id: TableId,
    pub title: String,
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectors: Option<Selectors>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPage {
    pub table_id: TableId,
    pub title: String,
    pub rows: Vec<Row>,
    pub selectors: Selectors,
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSaveResponse {
    pub scenario_id: String,
    pub table_id: TableId,
    pub row_count: usize,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetReplaceResult {
    pub table_id: TableId,
    /// Row count of the snapshot that was replaced, 0 if there was none.
    pub replaced: usize,
    pub rows: Vec<Row>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub table_id: TableId,
    /// Non-blank data lines seen in the upload.
    pub processed: usize,
    /// Rows written to the store.
    pub replaced: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub table_id: TableId,
    pub source: String,
    pub replaced: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub url: String,
    pub format: String,
    /// Calendar day (`YYYY-MM-DD`) after which the link is no longer honoured.
    pub expires_at: String,
}

/// Entry point for every dataset operation. Owns the catalog and the store; the
/// scenario lookup is supplied by whoever owns scenarios.
pub struct InputDatasetService<B: DatasetBackend, L: ScenarioLookup> {
    catalog: Catalog,
    store: DatasetStore<B>,
    scenarios: L,
    config: Config,
}
