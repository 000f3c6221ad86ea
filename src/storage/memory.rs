use super::{DatasetBackend, DatasetKey, MemoryBackend, StoreError, StoredDataset};

impl MemoryBackend {
    pub fn new() -> Self {
        MemoryBackend::default()
    }
}

impl DatasetBackend for MemoryBackend {
    fn get(&self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
        Ok(self.datasets.get(key).cloned())
    }

    fn put(&mut self, dataset: StoredDataset) -> Result<(), StoreError> {
        self.datasets.insert(dataset.key(), dataset);
        Ok(())
    }

    fn remove(&mut self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
        Ok(self.datasets.remove(key))
    }

    fn keys(&self) -> Vec<DatasetKey> {
        self.datasets.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.datasets.len()
    }
}
