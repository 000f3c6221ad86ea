mod advanced {
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::catalog::TableId;
    use crate::config::{Config, StoreKind};
    use crate::scenarios::ScenarioSet;
    use crate::storage::{
        DatasetBackend, DatasetKey, JsonFileBackend, MemoryBackend, PageRequest, StoreError,
        StoredDataset,
    };
    use crate::{DatasetError, InputDatasetService, Value};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::json;

    /// Memory backend that counts every call reaching it.
    #[derive(Default)]
    struct CountingBackend {
        inner: MemoryBackend,
        calls: Rc<Cell<usize>>,
    }

    impl CountingBackend {
        fn touch(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    impl DatasetBackend for CountingBackend {
        fn get(&self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
            self.touch();
            self.inner.get(key)
        }

        fn put(&mut self, dataset: StoredDataset) -> Result<(), StoreError> {
            self.touch();
            self.inner.put(dataset)
        }

        fn remove(&mut self, key: &DatasetKey) -> Result<Option<StoredDataset>, StoreError> {
            self.touch();
            self.inner.remove(key)
        }

        fn keys(&self) -> Vec<DatasetKey> {
            self.touch();
            self.inner.keys()
        }
    }

    fn forecast_payload(rows: usize) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = (0..rows)
            .map(|idx| {
                json!({
                    "period": idx + 1,
                    "location": "Madrid",
                    "product": "Gasoline",
                    "volume": 1000 + idx,
                    "price": 1.45,
                    "minVolume": 500,
                })
            })
            .collect();
        json!({"tableId": "domesticDemandForecast", "title": "Domestic Demand", "rows": rows})
    }

    /// Unknown table ids fail in every operation without a single backend call.
    #[test]
    fn unknown_table_never_reaches_the_store() {
        crate::logging::init_for_tests();
        let calls = Rc::new(Cell::new(0));
        let backend = CountingBackend {
            inner: MemoryBackend::new(),
            calls: Rc::clone(&calls),
        };
        let mut svc = InputDatasetService::new(backend, ScenarioSet::default(), Config::default());

        for bad in ["", "vesselCosts", "InitialStock", "initialStock "] {
            let errors = [
                svc.get_dataset("1", bad, PageRequest::default()).map(|_| ()),
                svc.save_dataset("1", bad, &forecast_payload(1)).map(|_| ()),
                svc.upload_csv("1", bad, "a,b\n1,2").map(|_| ()),
                svc.upload_body("1", bad, "text/csv", "a,b\n1,2").map(|_| ()),
                svc.sync_from_datalake("1", bad).map(|_| ()),
                svc.download_link("1", bad).map(|_| ()),
                svc.typed_rows("1", bad).map(|_| ()),
            ];
            for result in errors {
                match result {
                    Err(DatasetError::InvalidIdentifier(id)) => assert_eq!(id, bad),
                    other => panic!("expected invalid identifier for {:?}, got {:?}", bad, other),
                }
            }
        }
        assert_eq!(calls.get(), 0);
    }

    /// A mismatched payload is refused and the stored snapshot is left exactly as it was.
    #[test]
    fn identity_mismatch_changes_nothing() -> Result<(), DatasetError> {
        let mut svc = InputDatasetService::new(MemoryBackend::new(), ScenarioSet::default(), Config::default());
        svc.save_dataset("1", "domesticDemandForecast", &forecast_payload(3))?;
        let before = svc.store().get("1", TableId::DomesticDemandForecast)?;

        let mut payload = forecast_payload(9);
        payload["tableId"] = json!("productionPlan");
        let err = svc
            .save_dataset("1", "domesticDemandForecast", &payload)
            .unwrap_err();
        assert!(matches!(err, DatasetError::IdentityMismatch { .. }));

        assert_eq!(svc.store().get("1", TableId::DomesticDemandForecast)?, before);
        assert!(!svc.store().exists("1", TableId::ProductionPlan)?);
        assert_eq!(svc.store().len(), 1);
        Ok(())
    }

    /// Saving the same payload twice keeps createdAt and moves updatedAt forward.
    #[test]
    fn resave_advances_updated_at() -> Result<(), DatasetError> {
        let mut svc = InputDatasetService::new(MemoryBackend::new(), ScenarioSet::default(), Config::default());
        let payload = forecast_payload(2);

        let first = svc.save_dataset("6", "domesticDemandForecast", &payload)?;
        let created = svc.store().get("6", TableId::DomesticDemandForecast)?.created_at;
        let second = svc.save_dataset("6", "domesticDemandForecast", &payload)?;

        assert!(second.updated_at > first.updated_at);
        let stored = svc.store().get("6", TableId::DomesticDemandForecast)?;
        assert_eq!(stored.created_at, created);
        assert_eq!(stored.updated_at, second.updated_at);
        Ok(())
    }

    /// Walking every page of a random-sized dataset yields each row exactly once, in order.
    #[test]
    fn pages_cover_the_dataset() -> Result<(), DatasetError> {
        let mut rng = StdRng::seed_from_u64(3);
        let mut svc = InputDatasetService::new(MemoryBackend::new(), ScenarioSet::default(), Config::default());

        for _ in 0..10 {
            let total = rng.gen_range(0..60usize);
            let page_size = rng.gen_range(1..15usize);
            svc.save_dataset("2", "domesticDemandForecast", &forecast_payload(total))?;

            let mut seen = Vec::new();
            let mut page = 1;
            loop {
                let served = svc.get_dataset("2", "domesticDemandForecast", PageRequest::new(page, page_size))?;
                assert_eq!(served.total_rows, total);
                assert!(served.rows.len() <= page_size);
                if served.rows.is_empty() {
                    break;
                }
                seen.extend(served.rows.into_iter().map(|row| row["period"].clone()));
                page += 1;
            }

            let expected: Vec<Value> = (1..=total as i64).map(Value::from).collect();
            assert_eq!(seen, expected);
        }
        Ok(())
    }

    #[test]
    fn missing_scenario_and_dataset_are_not_found() {
        let svc = InputDatasetService::new(MemoryBackend::new(), |id: &str| id == "only", Config::default());

        let err = svc
            .get_dataset("1", "initialStock", PageRequest::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Scenario not found");

        let err = svc
            .get_dataset("only", "initialStock", PageRequest::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Dataset not found");
        assert_eq!(err.status_code(), 404);
    }

    /// When the store file can no longer be written, saves and syncs answer 500 with the
    /// generic message and the service keeps serving what it had.
    #[test]
    fn failed_writes_leave_the_store_unchanged() -> Result<(), DatasetError> {
        crate::logging::init_for_tests();
        let dir = tempfile::tempdir().map_err(StoreError::from)?;
        let store_dir = dir.path().join("store");
        let backend = JsonFileBackend::open(store_dir.join("inputDatasets.json"))?;
        let mut svc = InputDatasetService::new(backend, ScenarioSet::default(), Config::default());
        svc.save_dataset("1", "domesticDemandForecast", &forecast_payload(3))?;

        std::fs::remove_dir_all(&store_dir).map_err(StoreError::from)?;
        std::fs::write(&store_dir, "not a directory").map_err(StoreError::from)?;

        let err = svc
            .save_dataset("2", "domesticDemandForecast", &forecast_payload(1))
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "Failed to save dataset");
        assert!(!svc.store().exists("2", TableId::DomesticDemandForecast)?);

        let err = svc
            .save_dataset("1", "domesticDemandForecast", &forecast_payload(8))
            .unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(svc.store().get("1", TableId::DomesticDemandForecast)?.rows.len(), 3);

        // sync deletes first, so this is the remove path
        let err = svc.sync_from_datalake("1", "domesticDemandForecast").unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "Failed to save dataset");
        let page = svc.get_dataset("1", "domesticDemandForecast", PageRequest::default())?;
        assert_eq!(page.total_rows, 3);
        assert_eq!(page.rows[0]["location"], Value::from("Madrid"));
        Ok(())
    }

    /// A file-backed service built from configuration keeps datasets across restarts.
    #[test]
    fn file_backed_service_survives_restart() -> Result<(), DatasetError> {
        let dir = tempfile::tempdir().map_err(StoreError::from)?;
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            store: StoreKind::JsonFile,
            log_filter: String::from("planning_inputs=debug"),
            ..Config::default()
        };

        {
            let mut svc = InputDatasetService::from_config(config.clone())
                .map_err(|err| DatasetError::BadRequest(err.to_string()))?;
            svc.sync_from_datalake("7", "logisticsCosts")?;
            svc.upload_csv("7", "initialStock", "location,product,minVolume\nTank Farm 1,Diesel,10")?;
        }

        let svc = InputDatasetService::from_config(config)
            .map_err(|err| DatasetError::BadRequest(err.to_string()))?;
        assert_eq!(svc.config().log_filter, "planning_inputs=debug");
        let page = svc.get_dataset("7", "logisticsCosts", PageRequest::default())?;
        assert_eq!(page.total_rows, 2);
        assert_eq!(page.rows[1]["vessel"], Value::from("Tanker Beta"));
        assert_eq!(
            svc.get_dataset("7", "initialStock", PageRequest::default())?.rows[0]["minVolume"],
            Value::from(10)
        );
        Ok(())
    }
}
