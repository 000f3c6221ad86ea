//! Runtime configuration loaded from `PLANNING_*` environment variables.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::storage::{DatasetBackend, JsonFileBackend, MemoryBackend, StoreError, DEFAULT_PAGE_SIZE};

pub const ENV_PREFIX: &str = "PLANNING_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got '{value}'")]
    InvalidNumber { key: String, value: String },
    #[error("{key} must be one of: memory, json-file, got '{value}'")]
    InvalidStore { key: String, value: String },
    #[error("failed to open dataset store")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    JsonFile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub store: StoreKind,
    /// Store file name, relative to `data_dir` unless absolute.
    pub datasets_file: PathBuf,
    pub public_base_url: String,
    pub default_page_size: usize,
    pub download_link_ttl_hours: u32,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            store: StoreKind::JsonFile,
            datasets_file: PathBuf::from("inputDatasets.json"),
            public_base_url: String::from("http://localhost:3003"),
            default_page_size: DEFAULT_PAGE_SIZE,
            download_link_ttl_hours: 24,
            log_filter: String::from("info"),
        }
    }
}

impl Config {
    /// Create a configuration snapshot from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        Self::from_vars(&vars)
    }

    /// Overlay `PLANNING_*` entries from `vars` on the defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |name: &str| {
            vars.get(&format!("{}{}", ENV_PREFIX, name))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };
        let number = |name: &str, raw: &str| {
            raw.parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                key: format!("{}{}", ENV_PREFIX, name),
                value: raw.to_string(),
            })
        };

        let mut cfg = Config::default();
        if let Some(dir) = var("DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(store) = var("STORE") {
            cfg.store = match store {
                "memory" => StoreKind::Memory,
                "json-file" | "json" | "file" => StoreKind::JsonFile,
                other => {
                    return Err(ConfigError::InvalidStore {
                        key: format!("{}STORE", ENV_PREFIX),
                        value: other.to_string(),
                    })
                }
            };
        }
        if let Some(file) = var("DATASETS_FILE") {
            cfg.datasets_file = PathBuf::from(file);
        }
        if let Some(url) = var("PUBLIC_BASE_URL") {
            cfg.public_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = var("DEFAULT_PAGE_SIZE") {
            cfg.default_page_size = number("DEFAULT_PAGE_SIZE", raw)? as usize;
        }
        if let Some(raw) = var("DOWNLOAD_LINK_TTL_HOURS") {
            let hours = number("DOWNLOAD_LINK_TTL_HOURS", raw)?;
            cfg.download_link_ttl_hours =
                u32::try_from(hours).map_err(|_| ConfigError::InvalidNumber {
                    key: format!("{}DOWNLOAD_LINK_TTL_HOURS", ENV_PREFIX),
                    value: raw.to_string(),
                })?;
        }
        if let Some(filter) = var("LOG_FILTER") {
            cfg.log_filter = filter.to_string();
        }

        Ok(cfg)
    }

    pub fn datasets_path(&self) -> PathBuf {
        self.data_dir.join(&self.datasets_file)
    }

    /// Construct the dataset backend this configuration selects.
    pub fn open_backend(&self) -> Result<Box<dyn DatasetBackend + Send>, ConfigError> {
        let backend: Box<dyn DatasetBackend + Send> = match self.store {
            StoreKind::Memory => Box::new(MemoryBackend::new()),
            StoreKind::JsonFile => Box::new(JsonFileBackend::open(self.datasets_path())?),
        };
        Ok(backend)
    }
}
