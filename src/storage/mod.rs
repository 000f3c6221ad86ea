//! Keyed persistence of dataset snapshots, one per (scenario, table) pair.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::TableId;
use crate::selectors::Selectors;
use crate::Row;

pub mod dataset_store;
pub mod file_storage;
pub mod memory;
pub mod pagination;

pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IOError")]
    Io(#[from] io::Error),
    #[error("serialization failed")]
    Serde(#[from] serde_json::Error),
    #[error("store file {path} is unusable: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetKey {
    pub scenario_id: String,
    pub table_id: TableId,
}

impl DatasetKey {
    pub fn new(scenario_id: &str, table_id: TableId) -> Self {
        DatasetKey {
            scenario_id: scenario_id.to_string(),
            table_id,
        }
    }
}

impl Display for DatasetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.scenario_id, self.table_id)
    }
}

/// Durable snapshot of one table's rows within one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDataset {
    pub scenario_id: String,
    pub table_id: TableId,
    pub title: String,
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Selectors::is_empty")]
    pub selectors: Selectors,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl StoredDataset {
    pub fn key(&self) -> DatasetKey {
        DatasetKey::new(&self.scenario_id, self.table_id)
    }
}

/// Key-value seam behind [`DatasetStore`]. Implementations decide where snapshots
/// live; the store owns the timestamp and replace semantics.
pub trait DatasetBackend {
    fn get(&self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError>;
    /// Insert or fully replace the snapshot stored under `dataset.key()`.
    fn put(&mut self, dataset: StoredDataset) -> Result<(), StoreError>;
    /// Remove a snapshot, returning it if one was stored.
    fn remove(&mut self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError>;
    fn keys(&self) -> Vec<DatasetKey>;

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<B: DatasetBackend + ?Sized> DatasetBackend for Box<B> {
    fn get(&self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
        (**self).get(key)
    }

    fn put(&mut self, dataset: StoredDataset) -> Result<(), StoreError> {
        (**self).put(dataset)
    }

    fn remove(&mut self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<DatasetKey> {
        (**self).keys()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    datasets: BTreeMap<DatasetKey, StoredDataset>,
}

/// Whole-file JSON store: read once on open, rewritten on every mutation.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    datasets: BTreeMap<DatasetKey, StoredDataset>,
}

#[derive(Debug)]
pub struct DatasetStore<B: DatasetBackend> {
    backend: B,
}

/// 1-based page window over a dataset's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}
