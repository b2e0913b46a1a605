//! Stock store for the leather-goods inventory.
//!
//! [`StockStore`] is the single source of truth for the brand → model →
//! barcode hierarchy. Every mutation is applied to a fresh copy of the
//! stock, published atomically, mirrored to storage by the
//! [`PersistenceAdapter`], and finally announced to registered
//! [`StockObserver`]s.
//!
//! # Lifecycle
//!
//! A store is `Uninitialized → Loading → Ready`. [`StockStore::open`] runs
//! the single load before returning, so a caller can only ever hold a ready
//! store and no mutation can race the initial load.
//!
//! # Modules
//!
//! - [`store`] -- [`StockStore`] and its six mutation operations
//! - [`persist`] -- [`PersistenceAdapter`], load/save with swallowed failures
//! - [`observer`] -- [`StockObserver`] change notifications
//! - [`entry`] -- validation of manual entry and image-edit forms
//! - [`config`] -- [`StockConfig`], TOML-loadable settings
//! - [`error`] -- [`CoreError`]

pub mod config;
pub mod entry;
pub mod error;
pub mod observer;
pub mod persist;
pub mod store;

pub use config::{StockConfig, DEFAULT_STORAGE_KEY};
pub use entry::{Field, FormError, ImageUpdate, NewStockItem, ValidImageUpdate, ValidStockItem};
pub use error::{CoreError, CoreResult};
pub use observer::{NoOpObserver, StockChange, StockObserver};
pub use persist::{LoadOutcome, PersistenceAdapter};
pub use store::StockStore;

// Re-export the data model so callers need a single dependency.
pub use stock_types::{AddOutcome, BarcodeId, BarcodeItem, Brand, Model, Removal, Stock};
