use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stock_storage::{validate_key, FileStorage};

use crate::error::{CoreError, CoreResult};
use crate::persist::PersistenceAdapter;
use crate::store::StockStore;

/// Storage slot name used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "leatherStock";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    /// Directory holding the stock document.
    pub data_dir: PathBuf,
    /// Slot name; the document is written to `<data_dir>/<storage_key>.json`.
    pub storage_key: String,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".stock"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl StockConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> CoreResult<()> {
        validate_key(&self.storage_key).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Open a file-backed store as configured, loading any saved stock.
    pub fn open_store(&self) -> CoreResult<StockStore> {
        self.validate()?;
        let storage = FileStorage::open(&self.data_dir)?;
        let adapter = PersistenceAdapter::new(Arc::new(storage), &self.storage_key);
        Ok(StockStore::open(adapter))
    }
}
