use stock_types::{AddOutcome, BarcodeId, Removal, Stock};

/// A mutation applied to the store, as reported to observers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StockChange {
    ItemAdded {
        brand: String,
        model: String,
        outcome: AddOutcome,
    },
    BarcodeDeleted {
        brand: String,
        model: String,
        id: BarcodeId,
        removal: Removal,
    },
    ModelDeleted {
        brand: String,
        model: String,
        removal: Removal,
    },
    BrandDeleted {
        brand: String,
        removal: Removal,
    },
    BrandImageUpdated {
        brand: String,
        applied: bool,
    },
    ModelImageUpdated {
        brand: String,
        model: String,
        applied: bool,
    },
}

impl StockChange {
    /// Returns `true` if the stock content actually changed.
    pub fn is_effective(&self) -> bool {
        match self {
            StockChange::ItemAdded { outcome, .. } => outcome.is_added(),
            StockChange::BarcodeDeleted { removal, .. }
            | StockChange::ModelDeleted { removal, .. }
            | StockChange::BrandDeleted { removal, .. } => !removal.is_noop(),
            StockChange::BrandImageUpdated { applied, .. }
            | StockChange::ModelImageUpdated { applied, .. } => *applied,
        }
    }
}

/// Receives every mutation after it has been published and persisted.
///
/// Observers run on the mutating thread while the store's write lock is
/// held. They may read [`crate::StockStore::snapshot`] and call
/// [`crate::StockStore::subscribe`], but a mutation operation called from
/// `on_change` deadlocks.
pub trait StockObserver: Send + Sync {
    fn on_change(&self, change: &StockChange, stock: &Stock);
}

pub struct NoOpObserver;

impl StockObserver for NoOpObserver {
    fn on_change(&self, _change: &StockChange, _stock: &Stock) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_observer_accepts_changes() {
        let change = StockChange::BrandDeleted {
            brand: "A".into(),
            removal: Removal::default(),
        };
        NoOpObserver.on_change(&change, &Stock::new());
        assert!(!change.is_effective());
    }

    #[test]
    fn effectiveness_follows_outcome() {
        let added = StockChange::ItemAdded {
            brand: "A".into(),
            model: "M".into(),
            outcome: AddOutcome::Added(BarcodeId::from("1")),
        };
        let duplicate = StockChange::ItemAdded {
            brand: "A".into(),
            model: "M".into(),
            outcome: AddOutcome::Duplicate(BarcodeId::from("1")),
        };
        assert!(added.is_effective());
        assert!(!duplicate.is_effective());
        assert!(StockChange::BrandImageUpdated { brand: "A".into(), applied: true }.is_effective());
    }
}
