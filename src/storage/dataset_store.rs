use chrono::Duration;
use tracing::debug;

use super::{DatasetBackend, DatasetKey, DatasetStore, PageRequest, StoredDataset};
use crate::catalog::TableId;
use crate::selectors;
use crate::service::InputDataset;
use crate::timestamp;
use crate::{DatasetError, DatasetResult, Row};

impl<B: DatasetBackend> DatasetStore<B> {
    pub fn new(backend: B) -> Self {
        DatasetStore { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn find(&self, scenario_id: &str, table: TableId) -> DatasetResult<Option<StoredDataset>> {
        Ok(self.backend.get(&DatasetKey::new(scenario_id, table))?)
    }

    pub fn get(&self, scenario_id: &str, table: TableId) -> DatasetResult<StoredDataset> {
        self.find(scenario_id, table)?
            .ok_or_else(DatasetError::dataset_not_found)
    }

    /// One page of a stored dataset's rows together with the total row count.
    pub fn page(
        &self,
        scenario_id: &str,
        table: TableId,
        request: PageRequest,
    ) -> DatasetResult<(StoredDataset, Vec<Row>, usize)> {
        let dataset = self.get(scenario_id, table)?;
        let total = dataset.rows.len();
        let rows = request.window(&dataset.rows).to_vec();
        Ok((dataset, rows, total))
    }

    pub fn exists(&self, scenario_id: &str, table: TableId) -> DatasetResult<bool> {
        Ok(self.find(scenario_id, table)?.is_some())
    }

    /// Replace the snapshot for (scenario, table) with `dataset`.
    ///
    /// The first save sets `createdAt`; later saves keep it. `updatedAt` is the save
    /// time, nudged forward by a millisecond when the clock has not moved past the
    /// previous save. Missing selectors are generated from the table id.
    pub fn save(
        &mut self,
        scenario_id: &str,
        table: TableId,
        dataset: InputDataset,
    ) -> DatasetResult<StoredDataset> {
        let key = DatasetKey::new(scenario_id, table);
        let previous = self.backend.get(&key)?;
        let now = timestamp::now();

        let (created_at, updated_at) = match &previous {
            Some(prev) if now <= prev.updated_at => {
                (prev.created_at, prev.updated_at + Duration::milliseconds(1))
            }
            Some(prev) => (prev.created_at, now),
            None => (now, now),
        };

        let stored = StoredDataset {
            scenario_id: key.scenario_id.clone(),
            table_id: table,
            title: dataset.title,
            rows: dataset.rows,
            selectors: dataset
                .selectors
                .unwrap_or_else(|| selectors::generate(table)),
            created_at,
            updated_at,
        };

        self.backend.put(stored.clone())?;
        debug!(
            key = %key,
            rows = stored.rows.len(),
            replaced = previous.is_some(),
            "dataset stored"
        );
        Ok(stored)
    }

    /// Remove a snapshot. Returns whether one existed.
    pub fn delete(&mut self, scenario_id: &str, table: TableId) -> DatasetResult<bool> {
        let key = DatasetKey::new(scenario_id, table);
        let removed = self.backend.remove(&key)?;
        debug!(key = %key, removed = removed.is_some(), "dataset delete");
        Ok(removed.is_some())
    }

    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    pub fn keys(&self) -> Vec<DatasetKey> {
        self.backend.keys()
    }
}


#[cfg(test)]
mod private_tests_dataset_store;
