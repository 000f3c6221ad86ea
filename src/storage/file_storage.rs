use std::{
    collections::BTreeMap,
    fs::{self, create_dir_all, OpenOptions},
    io::{BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::{DatasetBackend, DatasetKey, JsonFileBackend, StoreError, StoredDataset};

impl JsonFileBackend {
    /// Open the store file at `path`, creating its parent directories.
    ///
    /// A missing file is an empty store. A file that is not a JSON object is logged
    /// and treated as empty; the next write replaces it. Entries that do not decode
    /// as datasets are skipped individually.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "store file absent, starting empty");
                return Ok(JsonFileBackend {
                    path,
                    datasets: BTreeMap::new(),
                });
            }
            Err(err) => return Err(err.into()),
        };

        let datasets = match Self::decode(&path, &raw) {
            Ok(datasets) => datasets,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "store file unreadable, starting empty");
                BTreeMap::new()
            }
        };
        debug!(path = %path.display(), datasets = datasets.len(), "store file loaded");

        Ok(JsonFileBackend { path, datasets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(path: &Path, raw: &str) -> Result<BTreeMap<DatasetKey, StoredDataset>, StoreError> {
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        let entries: IndexMap<String, serde_json::Value> =
            serde_json::from_str(raw).map_err(|err| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;

        let mut datasets = BTreeMap::new();
        for (name, entry) in entries {
            match serde_json::from_value::<StoredDataset>(entry) {
                Ok(dataset) => {
                    datasets.insert(dataset.key(), dataset);
                }
                Err(err) => warn!(entry = %name, error = %err, "skipping undecodable dataset"),
            }
        }
        Ok(datasets)
    }

    /// Rewrite the whole file. The new content goes to a uniquely named sibling first
    /// and is renamed over the old file, so readers never observe a partial write.
    fn persist(&self) -> Result<(), StoreError> {
        let snapshot: IndexMap<String, &StoredDataset> = self
            .datasets
            .iter()
            .map(|(key, dataset)| (key.to_string(), dataset))
            .collect();

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("datasets.json"));
        let tmp_path = self
            .path
            .with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

        let written = (|| -> Result<(), StoreError> {
            let mut file = BufWriter::new(
                OpenOptions::new()
                    .create_new(true)
                    .write(true)
                    .open(&tmp_path)?,
            );
            serde_json::to_writer_pretty(&mut file, &snapshot)?;
            file.flush()?;
            fs::rename(&tmp_path, &self.path)?;
            Ok(())
        })();

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }
}

impl DatasetBackend for JsonFileBackend {
    fn get(&self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
        Ok(self.datasets.get(key).cloned())
    }

    fn put(&mut self, dataset: StoredDataset) -> Result<(), StoreError> {
        let key = dataset.key();
        let previous = self.datasets.insert(key.clone(), dataset);

        if let Err(err) = self.persist() {
            // keep memory in step with what is on disk
            match previous {
                Some(previous) => self.datasets.insert(key, previous),
                None => self.datasets.remove(&key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
        let Some(removed) = self.datasets.remove(key) else {
            return Ok(None);
        };

        if let Err(err) = self.persist() {
            self.datasets.insert(key.clone(), removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    fn keys(&self) -> Vec<DatasetKey> {
        self.datasets.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.datasets.len()
    }
}
