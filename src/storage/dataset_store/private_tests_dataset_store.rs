mod advanced {
    use crate::catalog::TableId;
    use crate::service::InputDataset;
    use crate::storage::{DatasetBackend, DatasetStore, JsonFileBackend, MemoryBackend};
    use crate::{DatasetError, Row, Value};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn random_dataset(rng: &mut StdRng, table: TableId) -> InputDataset {
        let tanks = ["Tank Farm 1", "Tank Farm 2", "Tank Farm 3"];
        let rows = (0..rng.gen_range(0..20))
            .map(|_| {
                let mut row = Row::new();
                row.insert(String::from("location"), Value::from(*tanks.choose(rng).unwrap()));
                row.insert(String::from("product"), Value::from("Diesel"));
                row.insert(String::from("minVolume"), Value::from(rng.gen_range(0..5000i64)));
                row
            })
            .collect();
        InputDataset {
            table_id: table,
            title: format!("{} Dataset", table),
            rows,
            selectors: None,
        }
    }

    /// Saving into random (scenario, table) slots behaves like a map: the last save
    /// for a key wins and keys never bleed into each other.
    #[test]
    fn store_matches_reference_map() -> Result<(), DatasetError> {
        let mut rng = StdRng::seed_from_u64(17);
        let mut store = DatasetStore::new(MemoryBackend::new());
        let mut expected = std::collections::HashMap::new();

        for _ in 0..300 {
            let scenario = rng.gen_range(1..=7).to_string();
            let table = *TableId::ALL.choose(&mut rng).unwrap();
            if rng.gen_bool(0.2) {
                store.delete(&scenario, table)?;
                expected.remove(&(scenario, table));
                continue;
            }
            let dataset = random_dataset(&mut rng, table);
            expected.insert((scenario.clone(), table), dataset.rows.clone());
            store.save(&scenario, table, dataset)?;
        }

        assert_eq!(store.len(), expected.len());
        for ((scenario, table), rows) in &expected {
            assert_eq!(&store.get(scenario, *table)?.rows, rows);
        }
        Ok(())
    }

    /// A file-backed store reopened from disk serves exactly what was saved, with the
    /// same timestamps and row order.
    #[test]
    fn file_store_round_trips_through_disk() -> Result<(), DatasetError> {
        let dir = tempfile::tempdir().map_err(crate::StoreError::from)?;
        let path = dir.path().join("inputDatasets.json");
        let mut rng = StdRng::seed_from_u64(29);

        let mut saved = Vec::new();
        {
            let mut store = DatasetStore::new(JsonFileBackend::open(&path)?);
            for scenario in ["1", "2", "3"] {
                for table in [TableId::InitialStock, TableId::StockCapacities] {
                    saved.push(store.save(scenario, table, random_dataset(&mut rng, table))?);
                }
            }
            // second save of one key must not reset createdAt
            saved[0] = store.save("1", TableId::InitialStock, random_dataset(&mut rng, TableId::InitialStock))?;
        }

        let store = DatasetStore::new(JsonFileBackend::open(&path)?);
        assert_eq!(store.backend().len(), saved.len());
        for dataset in &saved {
            assert_eq!(&store.get(&dataset.scenario_id, dataset.table_id)?, dataset);
        }
        assert!(saved[0].updated_at >= saved[0].created_at);
        Ok(())
    }
}
