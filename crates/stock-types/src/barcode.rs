use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier of a single barcode entry.
///
/// Freshly generated ids are time-ordered UUIDs (v7), but any string read
/// back from storage is accepted as-is so that ids written by older clients
/// survive a load/save cycle unchanged.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarcodeId(String);

impl BarcodeId {
    /// Generate a new unique id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an existing id string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Debug for BarcodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BarcodeId({})", self.short_id())
    }
}

impl fmt::Display for BarcodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BarcodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One physical unit's scanned or typed code.
///
/// Immutable once created; removed only by explicit deletion or by the
/// cascade that drops an emptied model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeItem {
    pub id: BarcodeId,
    pub value: String,
    /// Insertion time, millisecond precision.
    pub added_at: DateTime<Utc>,
}

impl BarcodeItem {
    /// Create an item with a fresh id stamped with the current time.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: BarcodeId::generate(),
            value: value.into(),
            added_at: now_millis(),
        }
    }

    /// Reassemble an item from stored parts.
    pub fn from_parts(id: BarcodeId, value: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            id,
            value: value.into(),
            added_at,
        }
    }
}

/// Current UTC time truncated to milliseconds, the precision of the wire format.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
