use std::sync::{Arc, Mutex, PoisonError, RwLock};

use stock_types::{AddOutcome, BarcodeId, Removal, Stock};
use tracing::debug;

use crate::observer::{StockChange, StockObserver};
use crate::persist::{LoadOutcome, PersistenceAdapter};

/// The single source of truth for the stock hierarchy.
///
/// Readers take cheap [`Arc`] snapshots. Each mutation runs under one
/// write lock covering "read state, compute new state, publish, persist,
/// notify", so a snapshot is always a complete before- or after-state and
/// mutations are applied one at a time.
///
/// Operations are total: not-found paths are no-ops, input strings are not
/// validated (see [`crate::entry`] for form validation), and persistence
/// failures are logged but never returned.
pub struct StockStore {
    current: RwLock<Arc<Stock>>,
    write_lock: Mutex<()>,
    adapter: PersistenceAdapter,
    observers: RwLock<Vec<Arc<dyn StockObserver>>>,
    load_outcome: LoadOutcome,
}

impl StockStore {
    /// Load the saved stock through `adapter` and return a ready store.
    pub fn open(adapter: PersistenceAdapter) -> Self {
        let (stock, load_outcome) = adapter.load();
        Self {
            current: RwLock::new(Arc::new(stock)),
            write_lock: Mutex::new(()),
            adapter,
            observers: RwLock::new(Vec::new()),
            load_outcome,
        }
    }

    /// A store over fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::open(PersistenceAdapter::in_memory())
    }

    /// The current stock.
    pub fn snapshot(&self) -> Arc<Stock> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// How the initial load went.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn adapter(&self) -> &PersistenceAdapter {
        &self.adapter
    }

    /// Register an observer for all subsequent mutations.
    ///
    /// Safe to call from inside [`StockObserver::on_change`]; the new observer
    /// first hears about the next mutation.
    pub fn subscribe(&self, observer: Arc<dyn StockObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Record a barcode under `brand`/`model`, creating either as needed.
    ///
    /// Image URLs only fill entities that have none. A value already held by
    /// the model is ignored and reported as [`AddOutcome::Duplicate`].
    pub fn add_stock_item(
        &self,
        brand: &str,
        model: &str,
        barcode: &str,
        brand_image_url: Option<&str>,
        model_image_url: Option<&str>,
    ) -> AddOutcome {
        self.mutate(
            |stock| stock.add_item(brand, model, barcode, brand_image_url, model_image_url),
            |outcome| StockChange::ItemAdded {
                brand: brand.to_string(),
                model: model.to_string(),
                outcome: outcome.clone(),
            },
        )
    }

    /// Remove one barcode; empty parents are removed with it.
    pub fn delete_barcode(&self, brand: &str, model: &str, id: &BarcodeId) -> Removal {
        self.mutate(
            |stock| stock.delete_barcode(brand, model, id),
            |removal| StockChange::BarcodeDeleted {
                brand: brand.to_string(),
                model: model.to_string(),
                id: id.clone(),
                removal: *removal,
            },
        )
    }

    /// Remove a model; its brand is removed too if left empty.
    pub fn delete_model(&self, brand: &str, model: &str) -> Removal {
        self.mutate(
            |stock| stock.delete_model(brand, model),
            |removal| StockChange::ModelDeleted {
                brand: brand.to_string(),
                model: model.to_string(),
                removal: *removal,
            },
        )
    }

    pub fn delete_brand(&self, brand: &str) -> Removal {
        self.mutate(
            |stock| stock.delete_brand(brand),
            |removal| StockChange::BrandDeleted {
                brand: brand.to_string(),
                removal: *removal,
            },
        )
    }

    /// Overwrite a brand's image. Returns `false` if the brand is absent.
    pub fn update_brand_image(&self, brand: &str, image_url: &str) -> bool {
        self.mutate(
            |stock| stock.update_brand_image(brand, image_url),
            |applied| StockChange::BrandImageUpdated {
                brand: brand.to_string(),
                applied: *applied,
            },
        )
    }

    /// Overwrite a model's image. Returns `false` if the model is absent.
    pub fn update_model_image(&self, brand: &str, model: &str, image_url: &str) -> bool {
        self.mutate(
            |stock| stock.update_model_image(brand, model, image_url),
            |applied| StockChange::ModelImageUpdated {
                brand: brand.to_string(),
                model: model.to_string(),
                applied: *applied,
            },
        )
    }

    fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Stock) -> T,
        describe: impl FnOnce(&T) -> StockChange,
    ) -> T {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next = Stock::clone(&self.snapshot());
        let result = apply(&mut next);
        let next = Arc::new(next);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);

        let change = describe(&result);
        debug!(?change, "stock mutated");
        self.adapter.save(&next);

        let observers = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in &observers {
            observer.on_change(&change, &next);
        }
        result
    }
}

impl std::fmt::Debug for StockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stock = self.snapshot();
        f.debug_struct("StockStore")
            .field("adapter", &self.adapter)
            .field("brands", &stock.brand_count())
            .field("barcodes", &stock.barcode_count())
            .finish()
    }
}
