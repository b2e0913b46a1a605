//! JSON encoding of the stock document.
//!
//! Encoding is plain serde. Decoding walks the untyped JSON tree and keeps
//! whatever can be salvaged: the document is rejected only when its root is
//! not an object. Every repair is counted in the returned [`DecodeReport`].
//!
//! Repair rules:
//! - brand/model entries that are not objects are dropped;
//! - a missing or mismatched `name` is replaced by the map key;
//! - a missing `models` object or `barcodes` array leaves the entity empty,
//!   and empty entities are dropped;
//! - barcodes without a string `value` are dropped;
//! - a missing or repeated `id` is regenerated;
//! - a missing or unparseable `addedAt` becomes the decode time;
//! - repeated values inside one model keep the first occurrence;
//! - empty or non-string image URLs become absent.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::warn;

use crate::barcode::{now_millis, BarcodeId, BarcodeItem};
use crate::error::{Result, TypeError};
use crate::stock::{Brand, Model, Stock};

/// Counts of repairs applied while decoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub brands_dropped: usize,
    pub models_dropped: usize,
    pub barcodes_dropped: usize,
    pub duplicates_dropped: usize,
    pub names_repaired: usize,
    pub ids_regenerated: usize,
    pub timestamps_replaced: usize,
}

impl DecodeReport {
    /// Returns `true` if the document decoded without any repair.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }

    /// Total number of individual repairs.
    pub fn repairs(&self) -> usize {
        self.brands_dropped
            + self.models_dropped
            + self.barcodes_dropped
            + self.duplicates_dropped
            + self.names_repaired
            + self.ids_regenerated
            + self.timestamps_replaced
    }
}

/// A decoded stock together with the repairs that were needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub stock: Stock,
    pub report: DecodeReport,
}

/// Serialize a stock to compact JSON.
pub fn encode(stock: &Stock) -> Result<String> {
    Ok(serde_json::to_string(stock)?)
}

/// Serialize a stock to indented JSON, for export and inspection.
pub fn encode_pretty(stock: &Stock) -> Result<String> {
    Ok(serde_json::to_string_pretty(stock)?)
}

/// Parse and repair a stock document.
///
/// Fails only on invalid JSON or a non-object root.
pub fn decode(input: &str) -> Result<Decoded> {
    let value: Value = serde_json::from_str(input)?;
    decode_value(value)
}

/// Repair an already-parsed stock document.
pub fn decode_value(value: Value) -> Result<Decoded> {
    let root = match value {
        Value::Object(map) => map,
        other => {
            return Err(TypeError::InvalidRoot {
                found: json_kind(&other),
            })
        }
    };

    let mut report = DecodeReport::default();
    let mut brands = BTreeMap::new();
    for (key, value) in root {
        if let Some(brand) = decode_brand(&key, value, &mut report) {
            brands.insert(key, brand);
        }
    }

    Ok(Decoded {
        stock: Stock::from_brands(brands),
        report,
    })
}

fn decode_brand(key: &str, value: Value, report: &mut DecodeReport) -> Option<Brand> {
    let Some(mut obj) = into_object(value) else {
        warn!(brand = key, "dropping brand entry that is not an object");
        report.brands_dropped += 1;
        return None;
    };
    check_name(&obj, key, report);

    let mut brand = Brand::new(key, take_image(&mut obj));
    match obj.remove("models") {
        Some(Value::Object(models)) => {
            for (model_key, model_value) in models {
                if let Some(model) = decode_model(key, &model_key, model_value, report) {
                    brand.models.insert(model_key, model);
                }
            }
        }
        _ => warn!(brand = key, "brand has no models object"),
    }

    if brand.models.is_empty() {
        warn!(brand = key, "dropping empty brand");
        report.brands_dropped += 1;
        return None;
    }
    Some(brand)
}

fn decode_model(brand: &str, key: &str, value: Value, report: &mut DecodeReport) -> Option<Model> {
    let Some(mut obj) = into_object(value) else {
        warn!(brand, model = key, "dropping model entry that is not an object");
        report.models_dropped += 1;
        return None;
    };
    check_name(&obj, key, report);

    let mut model = Model::new(key, take_image(&mut obj));
    match obj.remove("barcodes") {
        Some(Value::Array(items)) => {
            for item in items {
                decode_barcode(brand, &mut model, item, report);
            }
        }
        _ => warn!(brand, model = key, "model has no barcodes array"),
    }

    if model.barcodes.is_empty() {
        warn!(brand, model = key, "dropping empty model");
        report.models_dropped += 1;
        return None;
    }
    Some(model)
}

fn decode_barcode(brand: &str, model: &mut Model, value: Value, report: &mut DecodeReport) {
    let Some(mut obj) = into_object(value) else {
        report.barcodes_dropped += 1;
        return;
    };
    let Some(Value::String(code)) = obj.remove("value") else {
        warn!(brand, model = %model.name, "dropping barcode without a value");
        report.barcodes_dropped += 1;
        return;
    };
    if model.barcode_by_value(&code).is_some() {
        warn!(brand, model = %model.name, value = %code, "dropping repeated barcode value");
        report.duplicates_dropped += 1;
        return;
    }

    let id = match obj.remove("id") {
        Some(Value::String(id))
            if !id.is_empty() && model.barcode(&BarcodeId::from(id.as_str())).is_none() =>
        {
            BarcodeId::from_string(id)
        }
        _ => {
            report.ids_regenerated += 1;
            BarcodeId::generate()
        }
    };

    let added_at = match obj.get("addedAt").and_then(Value::as_str).map(parse_timestamp) {
        Some(Some(ts)) => ts,
        _ => {
            report.timestamps_replaced += 1;
            now_millis()
        }
    };

    model.barcodes.push(BarcodeItem::from_parts(id, code, added_at));
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn into_object(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn check_name(obj: &Map<String, Value>, key: &str, report: &mut DecodeReport) {
    if obj.get("name").and_then(Value::as_str) != Some(key) {
        report.names_repaired += 1;
    }
}

fn take_image(obj: &mut Map<String, Value>) -> Option<String> {
    match obj.remove("imageUrl") {
        Some(Value::String(url)) if !url.is_empty() => Some(url),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
