//! Mirrors the stock to a single key-value slot.
//!
//! [`PersistenceAdapter::load`] and [`PersistenceAdapter::save`] never fail:
//! storage or decoding problems are logged and the in-memory stock stays
//! authoritative. The `try_*` forms return the underlying error for tools
//! that need it.

use std::sync::Arc;

use stock_storage::{InMemoryStorage, KeyValueStorage};
use stock_types::{codec, DecodeReport, Decoded, Stock};
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::CoreResult;

/// What happened when the slot was read at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The slot was empty; the stock starts empty.
    Empty,
    /// A document was decoded, possibly with repairs.
    Loaded(DecodeReport),
    /// The slot could not be read or decoded; the stock starts empty.
    Reset(String),
}

impl LoadOutcome {
    pub fn is_reset(&self) -> bool {
        matches!(self, LoadOutcome::Reset(_))
    }
}

pub struct PersistenceAdapter {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl PersistenceAdapter {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// An adapter over fresh in-memory storage under the default key.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStorage::new()), DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStorage> {
        &self.storage
    }

    /// Read and decode the slot. `Ok(None)` if the slot is empty.
    pub fn try_load(&self) -> CoreResult<Option<Decoded>> {
        let Some(text) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(codec::decode(&text)?))
    }

    /// Load the stored stock, falling back to an empty one on any failure.
    pub fn load(&self) -> (Stock, LoadOutcome) {
        match self.try_load() {
            Ok(None) => {
                info!(key = %self.key, "no saved stock, starting empty");
                (Stock::new(), LoadOutcome::Empty)
            }
            Ok(Some(Decoded { stock, report })) => {
                if report.is_clean() {
                    info!(
                        key = %self.key,
                        brands = stock.brand_count(),
                        barcodes = stock.barcode_count(),
                        "stock loaded"
                    );
                } else {
                    warn!(
                        key = %self.key,
                        repairs = report.repairs(),
                        ?report,
                        "stock loaded with repairs"
                    );
                }
                (stock, LoadOutcome::Loaded(report))
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to load stock, starting empty");
                (Stock::new(), LoadOutcome::Reset(e.to_string()))
            }
        }
    }

    /// Serialize the whole stock and overwrite the slot.
    pub fn try_save(&self, stock: &Stock) -> CoreResult<()> {
        let text = codec::encode(stock)?;
        self.storage.set(&self.key, &text)?;
        Ok(())
    }

    /// Save, logging instead of returning failures. Returns `true` on success.
    pub fn save(&self, stock: &Stock) -> bool {
        match self.try_save(stock) {
            Ok(()) => {
                debug!(key = %self.key, barcodes = stock.barcode_count(), "stock saved");
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to save stock");
                false
            }
        }
    }
}

impl std::fmt::Debug for PersistenceAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceAdapter")
            .field("key", &self.key)
            .finish()
    }
}
