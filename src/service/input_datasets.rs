use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::mock_data::datalake_rows;
use super::{
    DatasetPage, DatasetReplaceResult, DatasetSaveResponse, DownloadLink, InputDataset,
    InputDatasetService, SyncResult, UploadResult, DATALAKE_SOURCE, DOWNLOAD_FORMAT,
};
use crate::catalog::{Catalog, TableDefinition, TableId, TableRows};
use crate::config::{Config, ConfigError};
use crate::csv_import::{self, ImportStatus, MAX_SAMPLE_ERRORS};
use crate::scenarios::{ScenarioLookup, ScenarioSet};
use crate::selectors;
use crate::storage::{DatasetBackend, DatasetStore, PageRequest, StoredDataset};
use crate::validation::{validate_identity_match, validate_payload_shape};
use crate::{DatasetError, DatasetResult, Row};

impl<B: DatasetBackend, L: ScenarioLookup> InputDatasetService<B, L> {
    pub fn new(backend: B, scenarios: L, config: Config) -> Self {
        InputDatasetService {
            catalog: Catalog::standard(),
            store: DatasetStore::new(backend),
            scenarios,
            config,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &DatasetStore<B> {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table_definitions(&self) -> &[TableDefinition] {
        self.catalog.definitions()
    }

    /// First gate of every operation: the route's table id must be in the catalog.
    fn resolve_table(&self, table_id: &str) -> DatasetResult<TableId> {
        self.catalog.resolve(table_id).inspect_err(|_| {
            warn!(table_id, "rejected unknown table id");
        })
    }

    fn require_scenario(&self, scenario_id: &str) -> DatasetResult<()> {
        if self.scenarios.scenario_exists(scenario_id) {
            Ok(())
        } else {
            warn!(scenario_id, "scenario not found");
            Err(DatasetError::scenario_not_found())
        }
    }

    /// Schema problems of `rows`, prefixed with the row index. At most
    /// `MAX_SAMPLE_ERRORS` are listed, followed by a count of the rest.
    fn schema_warnings(&self, table: TableId, rows: &[Row]) -> Vec<String> {
        let Some(definition) = self.catalog.definition(table) else {
            return Vec::new();
        };

        let mut problems = rows.iter().enumerate().flat_map(|(idx, row)| {
            definition
                .check_row(row)
                .into_iter()
                .map(move |problem| format!("rows[{}]: {}", idx, problem))
        });

        let mut warnings: Vec<String> = problems.by_ref().take(MAX_SAMPLE_ERRORS).collect();
        let rest = problems.count();
        if rest > 0 {
            warnings.push(format!("{} more schema warnings not shown", rest));
        }
        warnings
    }

    fn store_dataset(
        &mut self,
        scenario_id: &str,
        table: TableId,
        dataset: InputDataset,
    ) -> DatasetResult<StoredDataset> {
        self.store
            .save(scenario_id, table, dataset)
            .inspect_err(|err| error!(scenario_id, table_id = %table, error = ?err, "dataset write failed"))
    }

    /// One page of a stored dataset with freshly generated selectors.
    pub fn get_dataset(
        &self,
        scenario_id: &str,
        table_id: &str,
        request: PageRequest,
    ) -> DatasetResult<DatasetPage> {
        let table = self.resolve_table(table_id)?;
        self.require_scenario(scenario_id)?;

        let (dataset, rows, total_rows) = self.store.page(scenario_id, table, request)?;
        info!(
            scenario_id,
            table_id = %table,
            page = request.page,
            page_size = request.page_size,
            rows = rows.len(),
            total_rows,
            "dataset page served"
        );

        Ok(DatasetPage {
            table_id: dataset.table_id,
            title: dataset.title,
            rows,
            selectors: selectors::generate(table),
            page: request.page,
            page_size: request.page_size,
            total_rows,
        })
    }

    /// Store a full dataset payload under (scenario, table).
    ///
    /// Checks run in a fixed order, each with its own failure: scenario existence,
    /// payload shape, route vs payload table id, then decoding of the rows. Nothing is
    /// written unless all of them pass.
    pub fn save_dataset(
        &mut self,
        scenario_id: &str,
        table_id: &str,
        payload: &serde_json::Value,
    ) -> DatasetResult<DatasetSaveResponse> {
        let table = self.resolve_table(table_id)?;
        self.require_scenario(scenario_id)?;

        validate_payload_shape(payload)
            .into_result(DatasetError::Validation)
            .inspect_err(|err| warn!(scenario_id, table_id, error = %err, "payload rejected"))?;

        let payload_table_id = payload
            .get("tableId")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        validate_identity_match(table_id, payload_table_id).into_result(|_| {
            warn!(scenario_id, table_id, payload_table_id, "table id mismatch");
            DatasetError::IdentityMismatch {
                route: table_id.to_string(),
                payload: payload_table_id.to_string(),
            }
        })?;

        let dataset: InputDataset = serde_json::from_value(payload.clone())
            .map_err(|err| DatasetError::Validation(vec![format!("Invalid payload: {}", err)]))?;

        let stored = self.store_dataset(scenario_id, table, dataset)?;
        info!(scenario_id, table_id = %table, rows = stored.rows.len(), "dataset saved");

        Ok(DatasetSaveResponse {
            scenario_id: stored.scenario_id,
            table_id: stored.table_id,
            row_count: stored.rows.len(),
            updated_at: stored.updated_at,
        })
    }

    /// Replace the snapshot with an already decoded dataset. Rows that do not fit the
    /// table schema are stored anyway and reported as warnings.
    pub fn replace_dataset(
        &mut self,
        scenario_id: &str,
        table_id: &str,
        dataset: InputDataset,
    ) -> DatasetResult<DatasetReplaceResult> {
        let table = self.resolve_table(table_id)?;
        self.require_scenario(scenario_id)?;
        if dataset.table_id != table {
            return Err(DatasetError::IdentityMismatch {
                route: table.to_string(),
                payload: dataset.table_id.to_string(),
            });
        }

        let replaced = self
            .store
            .find(scenario_id, table)?
            .map_or(0, |previous| previous.rows.len());
        let warnings = self.schema_warnings(table, &dataset.rows);
        let stored = self.store_dataset(scenario_id, table, dataset)?;
        info!(
            scenario_id,
            table_id = %table,
            replaced,
            rows = stored.rows.len(),
            warnings = warnings.len(),
            "dataset replaced"
        );

        Ok(DatasetReplaceResult {
            table_id: table,
            replaced,
            rows: stored.rows,
            warnings,
        })
    }

    /// Import CSV text as the new snapshot of (scenario, table).
    ///
    /// An empty upload or one where at least half of the data lines are ragged is
    /// rejected with [`DatasetError::Import`] and leaves the store untouched.
    pub fn upload_csv(
        &mut self,
        scenario_id: &str,
        table_id: &str,
        csv: &str,
    ) -> DatasetResult<UploadResult> {
        let table = self.resolve_table(table_id)?;
        self.require_scenario(scenario_id)?;

        let import = csv_import::parse(csv);
        if import.is_rejected() {
            warn!(
                scenario_id,
                table_id = %table,
                status = ?import.status,
                lines = import.data_lines,
                errors = import.errors.len(),
                "csv import rejected"
            );
            let processed = match import.status {
                ImportStatus::Empty => 0,
                _ => import.data_lines,
            };
            return Err(DatasetError::Import(UploadResult {
                table_id: table,
                processed,
                replaced: 0,
                errors: import.errors,
                warnings: Vec::new(),
            }));
        }

        let mut warnings = Vec::new();
        if !import.errors.is_empty() {
            warnings.push(format!("{} rows had parsing errors", import.errors.len()));
        }
        warnings.extend(self.schema_warnings(table, &import.rows));

        let replaced = import.rows.len();
        let dataset = InputDataset {
            table_id: table,
            title: format!("{} Dataset (Uploaded from CSV)", table),
            rows: import.rows,
            selectors: Some(selectors::generate(table)),
        };
        self.store_dataset(scenario_id, table, dataset)?;
        info!(
            scenario_id,
            table_id = %table,
            processed = import.data_lines,
            replaced,
            skipped = import.errors.len(),
            "csv imported"
        );

        Ok(UploadResult {
            table_id: table,
            processed: import.data_lines,
            replaced,
            errors: import.errors,
            warnings,
        })
    }

    /// [`upload_csv`](Self::upload_csv) for a raw request body, accepting the JSON
    /// `csvData` wrapper or plain CSV text.
    pub fn upload_body(
        &mut self,
        scenario_id: &str,
        table_id: &str,
        content_type: &str,
        body: &str,
    ) -> DatasetResult<UploadResult> {
        self.resolve_table(table_id)?;
        let csv = csv_import::extract_csv(content_type, body)?;
        self.upload_csv(scenario_id, table_id, &csv)
    }

    /// Drop the current snapshot and store the fixed datalake sample in its place.
    pub fn sync_from_datalake(&mut self, scenario_id: &str, table_id: &str) -> DatasetResult<SyncResult> {
        let table = self.resolve_table(table_id)?;
        self.require_scenario(scenario_id)?;

        let existed = self.store.delete(scenario_id, table)?;
        let rows = datalake_rows(table).to_rows();
        let replaced = rows.len();
        let dataset = InputDataset {
            table_id: table,
            title: format!("{} Dataset (Synced from Datalake)", table),
            rows,
            selectors: Some(selectors::generate(table)),
        };
        self.store_dataset(scenario_id, table, dataset)?;
        info!(scenario_id, table_id = %table, existed, replaced, "dataset synced from datalake");

        Ok(SyncResult {
            table_id: table,
            source: String::from(DATALAKE_SOURCE),
            replaced,
            warnings: Vec::new(),
        })
    }

    /// Mock download descriptor. No file is produced; the token is random and the
    /// link expires `download_link_ttl_hours` from now.
    pub fn download_link(&self, scenario_id: &str, table_id: &str) -> DatasetResult<DownloadLink> {
        let table = self.resolve_table(table_id)?;

        let token = Uuid::new_v4();
        let url = format!(
            "{}/api/scenarios/{}/inputs/{}/dataset/download-csv?token={}",
            self.config.public_base_url.trim_end_matches('/'),
            scenario_id,
            table,
            token
        );
        let expires = Utc::now() + Duration::hours(i64::from(self.config.download_link_ttl_hours));
        info!(scenario_id, table_id = %table, "download link issued");

        Ok(DownloadLink {
            url,
            format: String::from(DOWNLOAD_FORMAT),
            expires_at: expires.format("%Y-%m-%d").to_string(),
        })
    }

    /// The stored rows decoded into the typed variant of their table.
    pub fn typed_rows(&self, scenario_id: &str, table_id: &str) -> DatasetResult<TableRows> {
        let table = self.resolve_table(table_id)?;
        self.require_scenario(scenario_id)?;
        let dataset = self.store.get(scenario_id, table)?;
        TableRows::from_rows(table, &dataset.rows)
    }
}

impl InputDatasetService<Box<dyn DatasetBackend + Send>, ScenarioSet> {
    /// Service over the configured backend and the default scenario set. Installs the
    /// global subscriber with `log_filter` unless one is already in place.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        crate::logging::init(&config.log_filter);
        let backend = config.open_backend()?;
        Ok(InputDatasetService::new(backend, ScenarioSet::default(), config))
    }
}


#[cfg(test)]
mod private_tests_input_datasets;
