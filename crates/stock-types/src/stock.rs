//! The brand → model → barcode hierarchy and its mutation rules.
//!
//! Maps are `BTreeMap`s so iteration yields names in sorted order, which is
//! the order listings present them in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::barcode::{BarcodeId, BarcodeItem};

/// A product line owned by exactly one [`Brand`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Insertion-ordered, unique by `value`.
    pub barcodes: Vec<BarcodeItem>,
}

impl Model {
    pub fn new(name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            image_url,
            barcodes: Vec::new(),
        }
    }

    /// Find a barcode entry by its scanned value.
    pub fn barcode_by_value(&self, value: &str) -> Option<&BarcodeItem> {
        self.barcodes.iter().find(|item| item.value == value)
    }

    /// Find a barcode entry by id.
    pub fn barcode(&self, id: &BarcodeId) -> Option<&BarcodeItem> {
        self.barcodes.iter().find(|item| &item.id == id)
    }

    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }
}

/// Top-level grouping entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub models: BTreeMap<String, Model>,
}

impl Brand {
    pub fn new(name: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            name: name.into(),
            image_url,
            models: BTreeMap::new(),
        }
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    /// Total number of barcodes across all models of this brand.
    pub fn barcode_count(&self) -> usize {
        self.models.values().map(Model::len).sum()
    }
}

/// Result of [`Stock::add_item`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new barcode entry was appended.
    Added(BarcodeId),
    /// The model already held this value; nothing was appended.
    Duplicate(BarcodeId),
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added(_))
    }

    /// Id of the entry holding the value, new or pre-existing.
    pub fn id(&self) -> &BarcodeId {
        match self {
            AddOutcome::Added(id) | AddOutcome::Duplicate(id) => id,
        }
    }
}

/// What a delete operation removed, cascaded parents included.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Removal {
    pub barcodes: usize,
    pub models: usize,
    pub brand: bool,
}

impl Removal {
    /// Returns `true` if nothing was removed.
    pub fn is_noop(&self) -> bool {
        self.barcodes == 0 && self.models == 0 && !self.brand
    }
}

/// The root aggregate: brand name to [`Brand`].
///
/// This is the unit of persistence; it serializes as a single JSON object
/// keyed by brand name. There is no `Deserialize` impl: stored documents
/// come back through [`crate::decode`], which checks the layout and
/// restores the no-empty-parents invariant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Stock {
    brands: BTreeMap<String, Brand>,
}

impl Stock {
    /// Create an empty stock.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_brands(brands: BTreeMap<String, Brand>) -> Self {
        Self { brands }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    pub fn brand(&self, name: &str) -> Option<&Brand> {
        self.brands.get(name)
    }

    pub fn model(&self, brand: &str, model: &str) -> Option<&Model> {
        self.brands.get(brand)?.models.get(model)
    }

    /// Brands in name order.
    pub fn brands(&self) -> impl Iterator<Item = &Brand> {
        self.brands.values()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    pub fn model_count(&self) -> usize {
        self.brands.values().map(|b| b.models.len()).sum()
    }

    pub fn barcode_count(&self) -> usize {
        self.brands.values().map(Brand::barcode_count).sum()
    }

    /// Every `(brand, model, item)` holding `value`, in listing order.
    pub fn find_barcode<'a>(
        &'a self,
        value: &'a str,
    ) -> impl Iterator<Item = (&'a Brand, &'a Model, &'a BarcodeItem)> + 'a {
        self.brands.values().flat_map(move |brand| {
            brand.models.values().filter_map(move |model| {
                model.barcode_by_value(value).map(|item| (brand, model, item))
            })
        })
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Record a barcode under `brand`/`model`, creating either as needed.
    ///
    /// Image URLs are applied only to entities that have none yet; an empty
    /// string counts as "not supplied". Inputs are not validated. A value
    /// already present in the model is silently ignored.
    pub fn add_item(
        &mut self,
        brand_name: &str,
        model_name: &str,
        value: &str,
        brand_image_url: Option<&str>,
        model_image_url: Option<&str>,
    ) -> AddOutcome {
        let brand_image_url = non_empty(brand_image_url);
        let model_image_url = non_empty(model_image_url);

        let brand = self
            .brands
            .entry(brand_name.to_string())
            .or_insert_with(|| Brand::new(brand_name, None));
        fill_image(&mut brand.image_url, brand_image_url);

        let model = brand
            .models
            .entry(model_name.to_string())
            .or_insert_with(|| Model::new(model_name, None));
        fill_image(&mut model.image_url, model_image_url);

        if let Some(existing) = model.barcode_by_value(value) {
            return AddOutcome::Duplicate(existing.id.clone());
        }
        let item = BarcodeItem::new(value);
        let id = item.id.clone();
        model.barcodes.push(item);
        AddOutcome::Added(id)
    }

    /// Remove one barcode entry by id, then drop the model and brand if they
    /// were left empty.
    pub fn delete_barcode(
        &mut self,
        brand_name: &str,
        model_name: &str,
        id: &BarcodeId,
    ) -> Removal {
        let Some(brand) = self.brands.get_mut(brand_name) else {
            return Removal::default();
        };
        let Some(model) = brand.models.get_mut(model_name) else {
            return Removal::default();
        };

        let before = model.barcodes.len();
        model.barcodes.retain(|item| &item.id != id);
        let mut removal = Removal {
            barcodes: before - model.barcodes.len(),
            ..Removal::default()
        };

        if model.barcodes.is_empty() {
            brand.models.remove(model_name);
            removal.models = 1;
        }
        removal.brand = self.prune_brand(brand_name);
        removal
    }

    /// Remove a model and all its barcodes; drops the brand if it was the
    /// last model.
    pub fn delete_model(&mut self, brand_name: &str, model_name: &str) -> Removal {
        let Some(brand) = self.brands.get_mut(brand_name) else {
            return Removal::default();
        };
        let Some(model) = brand.models.remove(model_name) else {
            return Removal::default();
        };
        Removal {
            barcodes: model.len(),
            models: 1,
            brand: self.prune_brand(brand_name),
        }
    }

    /// Remove a brand with everything under it. Absent brands are a no-op.
    pub fn delete_brand(&mut self, brand_name: &str) -> Removal {
        match self.brands.remove(brand_name) {
            Some(brand) => Removal {
                barcodes: brand.barcode_count(),
                models: brand.models.len(),
                brand: true,
            },
            None => Removal::default(),
        }
    }

    /// Overwrite a brand's image URL; an empty URL clears it. Returns `false`
    /// if the brand is absent.
    pub fn update_brand_image(&mut self, brand_name: &str, image_url: &str) -> bool {
        match self.brands.get_mut(brand_name) {
            Some(brand) => {
                brand.image_url = non_empty(Some(image_url)).map(str::to_string);
                true
            }
            None => false,
        }
    }

    /// Overwrite a model's image URL; an empty URL clears it. Returns `false`
    /// if the path is absent.
    pub fn update_model_image(
        &mut self,
        brand_name: &str,
        model_name: &str,
        image_url: &str,
    ) -> bool {
        match self
            .brands
            .get_mut(brand_name)
            .and_then(|brand| brand.models.get_mut(model_name))
        {
            Some(model) => {
                model.image_url = non_empty(Some(image_url)).map(str::to_string);
                true
            }
            None => false,
        }
    }

    /// Drop `brand_name` if it has no models left.
    fn prune_brand(&mut self, brand_name: &str) -> bool {
        let empty = self
            .brands
            .get(brand_name)
            .is_some_and(|brand| brand.models.is_empty());
        if empty {
            self.brands.remove(brand_name);
        }
        empty
    }
}

fn non_empty(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.is_empty())
}

fn fill_image(slot: &mut Option<String>, url: Option<&str>) {
    let unset = slot.as_deref().map_or(true, str::is_empty);
    if let (true, Some(url)) = (unset, url) {
        *slot = Some(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Stock {
        let mut stock = Stock::new();
        stock.add_item("Deri Sanat", "Klasik Cüzdan", "111", None, None);
        stock.add_item("Deri Sanat", "Klasik Cüzdan", "222", None, None);
        stock.add_item("Deri Sanat", "Kartlık", "333", None, None);
        stock.add_item("Anatolia", "Kemer", "444", None, None);
        stock
    }

    // -----------------------------------------------------------------------
    // add_item
    // -----------------------------------------------------------------------

    #[test]
    fn add_creates_brand_model_and_barcode() {
        let mut stock = Stock::new();
        let outcome = stock.add_item("Deri Sanat", "Klasik Cüzdan", "1234567890123", None, None);
        assert!(outcome.is_added());

        assert_eq!(stock.brand_count(), 1);
        let brand = stock.brand("Deri Sanat").expect("brand exists");
        assert_eq!(brand.name, "Deri Sanat");
        assert_eq!(brand.models.len(), 1);
        let model = brand.model("Klasik Cüzdan").expect("model exists");
        assert_eq!(model.name, "Klasik Cüzdan");
        assert_eq!(model.barcodes.len(), 1);
        assert_eq!(model.barcodes[0].value, "1234567890123");
        assert_eq!(&model.barcodes[0].id, outcome.id());
    }

    #[test]
    fn duplicate_value_is_ignored() {
        let mut stock = Stock::new();
        let first = stock.add_item("A", "M", "V", None, None);
        let second = stock.add_item("A", "M", "V", None, None);
        assert_eq!(second, AddOutcome::Duplicate(first.id().clone()));
        assert_eq!(stock.model("A", "M").unwrap().len(), 1);
    }

    #[test]
    fn dedup_is_case_sensitive_and_per_model() {
        let mut stock = Stock::new();
        stock.add_item("A", "M", "abc", None, None);
        stock.add_item("A", "M", "ABC", None, None);
        stock.add_item("A", "N", "abc", None, None);
        assert_eq!(stock.model("A", "M").unwrap().len(), 2);
        assert_eq!(stock.model("A", "N").unwrap().len(), 1);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut stock = Stock::new();
        for value in ["9", "1", "5"] {
            stock.add_item("A", "M", value, None, None);
        }
        let values: Vec<&str> = stock
            .model("A", "M")
            .unwrap()
            .barcodes
            .iter()
            .map(|b| b.value.as_str())
            .collect();
        assert_eq!(values, ["9", "1", "5"]);
    }

    #[test]
    fn brand_image_is_set_once() {
        let mut stock = Stock::new();
        stock.add_item("A", "M1", "111", Some("imgA"), None);
        stock.add_item("A", "M2", "222", Some("imgB"), None);
        assert_eq!(stock.brand("A").unwrap().image_url.as_deref(), Some("imgA"));
    }

    #[test]
    fn missing_images_are_filled_later() {
        let mut stock = Stock::new();
        stock.add_item("A", "M", "1", None, None);
        stock.add_item("A", "M", "2", Some("brand.png"), Some("model.png"));
        assert_eq!(stock.brand("A").unwrap().image_url.as_deref(), Some("brand.png"));
        assert_eq!(stock.model("A", "M").unwrap().image_url.as_deref(), Some("model.png"));
    }

    #[test]
    fn model_image_is_set_once() {
        let mut stock = Stock::new();
        stock.add_item("A", "M", "1", None, Some("first.png"));
        stock.add_item("A", "M", "2", None, Some("second.png"));
        assert_eq!(stock.model("A", "M").unwrap().image_url.as_deref(), Some("first.png"));
    }

    #[test]
    fn empty_image_url_counts_as_absent() {
        let mut stock = Stock::new();
        stock.add_item("A", "M", "1", Some(""), Some(""));
        assert_eq!(stock.brand("A").unwrap().image_url, None);
        assert_eq!(stock.model("A", "M").unwrap().image_url, None);

        stock.add_item("A", "M", "2", Some("b.png"), None);
        assert_eq!(stock.brand("A").unwrap().image_url.as_deref(), Some("b.png"));
    }

    #[test]
    fn whitespace_input_is_accepted_verbatim() {
        let mut stock = Stock::new();
        stock.add_item(" ", " ", " ", None, None);
        assert_eq!(stock.model(" ", " ").unwrap().barcodes[0].value, " ");
    }

    // -----------------------------------------------------------------------
    // Deletes and cascade
    // -----------------------------------------------------------------------

    #[test]
    fn deleting_last_barcode_cascades_to_brand() {
        let mut stock = Stock::new();
        let id = stock.add_item("A", "M", "1", None, None).id().clone();

        let removal = stock.delete_barcode("A", "M", &id);
        assert_eq!(removal, Removal { barcodes: 1, models: 1, brand: true });
        assert!(stock.is_empty());
    }

    #[test]
    fn deleting_one_of_many_barcodes_keeps_model() {
        let mut stock = sample();
        let id = stock.model("Deri Sanat", "Klasik Cüzdan").unwrap().barcodes[0].id.clone();

        let removal = stock.delete_barcode("Deri Sanat", "Klasik Cüzdan", &id);
        assert_eq!(removal, Removal { barcodes: 1, models: 0, brand: false });
        let model = stock.model("Deri Sanat", "Klasik Cüzdan").unwrap();
        assert_eq!(model.len(), 1);
        assert_eq!(model.barcodes[0].value, "222");
    }

    #[test]
    fn emptied_model_is_removed_but_brand_with_other_models_stays() {
        let mut stock = sample();
        let id = stock.model("Deri Sanat", "Kartlık").unwrap().barcodes[0].id.clone();

        let removal = stock.delete_barcode("Deri Sanat", "Kartlık", &id);
        assert_eq!(removal, Removal { barcodes: 1, models: 1, brand: false });
        assert!(stock.model("Deri Sanat", "Kartlık").is_none());
        assert!(stock.brand("Deri Sanat").is_some());
    }

    #[test]
    fn delete_barcode_on_missing_path_is_noop() {
        let mut stock = sample();
        let before = stock.clone();
        let id = BarcodeId::from("nope");
        assert!(stock.delete_barcode("Nope", "M", &id).is_noop());
        assert!(stock.delete_barcode("Deri Sanat", "Nope", &id).is_noop());
        assert!(stock.delete_barcode("Deri Sanat", "Kartlık", &id).is_noop());
        assert_eq!(stock, before);
    }

    #[test]
    fn delete_model_cascades_when_last() {
        let mut stock = sample();
        let removal = stock.delete_model("Anatolia", "Kemer");
        assert_eq!(removal, Removal { barcodes: 1, models: 1, brand: true });
        assert!(stock.brand("Anatolia").is_none());

        let removal = stock.delete_model("Deri Sanat", "Klasik Cüzdan");
        assert_eq!(removal, Removal { barcodes: 2, models: 1, brand: false });
        assert!(stock.brand("Deri Sanat").is_some());
    }

    #[test]
    fn delete_model_missing_is_noop() {
        let mut stock = sample();
        let before = stock.clone();
        assert!(stock.delete_model("Deri Sanat", "Nope").is_noop());
        assert!(stock.delete_model("Nope", "Kemer").is_noop());
        assert_eq!(stock, before);
    }

    #[test]
    fn delete_brand_is_idempotent() {
        let mut stock = sample();
        let first = stock.delete_brand("Deri Sanat");
        assert_eq!(first, Removal { barcodes: 3, models: 2, brand: true });
        let after_once = stock.clone();

        assert!(stock.delete_brand("Deri Sanat").is_noop());
        assert_eq!(stock, after_once);
    }

    // -----------------------------------------------------------------------
    // Image updates
    // -----------------------------------------------------------------------

    #[test]
    fn explicit_update_overrides_brand_image() {
        let mut stock = Stock::new();
        stock.add_item("A", "M1", "111", Some("imgA"), None);
        stock.add_item("A", "M2", "222", Some("imgB"), None);
        assert!(stock.update_brand_image("A", "imgC"));
        assert_eq!(stock.brand("A").unwrap().image_url.as_deref(), Some("imgC"));
    }

    #[test]
    fn explicit_update_overrides_model_image() {
        let mut stock = Stock::new();
        stock.add_item("A", "M", "1", None, Some("old.png"));
        assert!(stock.update_model_image("A", "M", "new.png"));
        assert_eq!(stock.model("A", "M").unwrap().image_url.as_deref(), Some("new.png"));
    }

    #[test]
    fn empty_url_update_clears_image() {
        let mut stock = Stock::new();
        stock.add_item("A", "M", "1", Some("a.png"), Some("m.png"));
        assert!(stock.update_brand_image("A", ""));
        assert!(stock.update_model_image("A", "M", ""));
        assert_eq!(stock.brand("A").unwrap().image_url, None);
        assert_eq!(stock.model("A", "M").unwrap().image_url, None);

        stock.add_item("A", "M", "2", Some("b.png"), None);
        assert_eq!(stock.brand("A").unwrap().image_url.as_deref(), Some("b.png"));
    }

    #[test]
    fn image_update_on_missing_entity_is_noop() {
        let mut stock = sample();
        let before = stock.clone();
        assert!(!stock.update_brand_image("Nope", "x.png"));
        assert!(!stock.update_model_image("Deri Sanat", "Nope", "x.png"));
        assert!(!stock.update_model_image("Nope", "Kemer", "x.png"));
        assert_eq!(stock, before);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[test]
    fn counts_and_sorted_listing() {
        let stock = sample();
        assert_eq!(stock.brand_count(), 2);
        assert_eq!(stock.model_count(), 3);
        assert_eq!(stock.barcode_count(), 4);

        let names: Vec<&str> = stock.brands().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Anatolia", "Deri Sanat"]);
        let models: Vec<&str> = stock
            .brand("Deri Sanat")
            .unwrap()
            .models
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(models, ["Kartlık", "Klasik Cüzdan"]);
    }

    #[test]
    fn find_barcode_across_models() {
        let mut stock = sample();
        stock.add_item("Anatolia", "Çanta", "111", None, None);

        let hits: Vec<(String, String)> = stock
            .find_barcode("111")
            .map(|(b, m, _)| (b.name.clone(), m.name.clone()))
            .collect();
        assert_eq!(
            hits,
            [
                ("Anatolia".to_string(), "Çanta".to_string()),
                ("Deri Sanat".to_string(), "Klasik Cüzdan".to_string()),
            ]
        );
        assert_eq!(stock.find_barcode("missing").count(), 0);
    }

    proptest! {
        #[test]
        fn repeated_value_is_stored_once(
            values in proptest::collection::vec("[0-9]{1,4}", 1..40),
        ) {
            let mut stock = Stock::new();
            for value in &values {
                stock.add_item("B", "M", value, None, None);
            }
            let model = stock.model("B", "M").unwrap();
            for value in &values {
                prop_assert_eq!(model.barcodes.iter().filter(|b| &b.value == value).count(), 1);
            }
        }
    }
}
