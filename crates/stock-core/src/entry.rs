//! Validation of the manual-entry and image-edit forms.
//!
//! The store accepts any string; rejecting blank input is the form's job.
//! A submission is validated into a `Valid*` value, which is the only thing
//! that can be applied to a [`StockStore`].

use std::fmt;

use thiserror::Error;

use crate::store::StockStore;
use stock_types::AddOutcome;

/// A form field that must be filled in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Brand,
    Model,
    Barcode,
    ImageUrl,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Brand => "brand",
            Field::Model => "model",
            Field::Barcode => "barcode",
            Field::ImageUrl => "image URL",
        };
        f.write_str(name)
    }
}

/// Required fields left blank.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("missing required fields: {}", list(.missing))]
pub struct FormError {
    pub missing: Vec<Field>,
}

fn list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A manual entry (or a scan completed with brand/model) as submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewStockItem {
    pub brand: String,
    pub model: String,
    pub barcode: String,
    pub brand_image_url: String,
    pub model_image_url: String,
}

impl NewStockItem {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        barcode: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            barcode: barcode.into(),
            ..Self::default()
        }
    }

    pub fn with_brand_image(mut self, url: impl Into<String>) -> Self {
        self.brand_image_url = url.into();
        self
    }

    pub fn with_model_image(mut self, url: impl Into<String>) -> Self {
        self.model_image_url = url.into();
        self
    }

    /// Require brand, model and barcode to be non-blank.
    ///
    /// Values are passed through untrimmed; blank image URLs become `None`.
    pub fn validate(self) -> Result<ValidStockItem, FormError> {
        let missing: Vec<Field> = [
            (Field::Brand, &self.brand),
            (Field::Model, &self.model),
            (Field::Barcode, &self.barcode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(FormError { missing });
        }

        Ok(ValidStockItem {
            brand: self.brand,
            model: self.model,
            barcode: self.barcode,
            brand_image_url: optional(self.brand_image_url),
            model_image_url: optional(self.model_image_url),
        })
    }
}

/// An entry that passed [`NewStockItem::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidStockItem {
    brand: String,
    model: String,
    barcode: String,
    brand_image_url: Option<String>,
    model_image_url: Option<String>,
}

impl ValidStockItem {
    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    pub fn apply(&self, store: &StockStore) -> AddOutcome {
        store.add_stock_item(
            &self.brand,
            &self.model,
            &self.barcode,
            self.brand_image_url.as_deref(),
            self.model_image_url.as_deref(),
        )
    }
}

/// An image-edit submission for a brand, or for a model when `model` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageUpdate {
    pub brand: String,
    pub model: Option<String>,
    pub image_url: String,
}

impl ImageUpdate {
    pub fn brand(brand: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            model: None,
            image_url: image_url.into(),
        }
    }

    pub fn model(
        brand: impl Into<String>,
        model: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: Some(model.into()),
            image_url: image_url.into(),
        }
    }

    pub fn validate(self) -> Result<ValidImageUpdate, FormError> {
        let mut missing = Vec::new();
        if self.brand.trim().is_empty() {
            missing.push(Field::Brand);
        }
        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            missing.push(Field::Model);
        }
        if self.image_url.trim().is_empty() {
            missing.push(Field::ImageUrl);
        }
        if !missing.is_empty() {
            return Err(FormError { missing });
        }
        Ok(ValidImageUpdate(self))
    }
}

/// An image edit that passed [`ImageUpdate::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidImageUpdate(ImageUpdate);

impl ValidImageUpdate {
    /// Apply the edit. Returns `false` if the target does not exist.
    pub fn apply(&self, store: &StockStore) -> bool {
        let update = &self.0;
        match &update.model {
            Some(model) => store.update_model_image(&update.brand, model, &update.image_url),
            None => store.update_brand_image(&update.brand, &update.image_url),
        }
    }
}

fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
