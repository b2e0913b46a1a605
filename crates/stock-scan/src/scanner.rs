use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::Result;

/// One successful decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanEvent {
    pub value: String,
    pub scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    /// An event stamped with the current time.
    pub fn now(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scanned_at: Utc::now(),
        }
    }
}

/// A source of decoded barcode text.
///
/// Events are produced lazily; `Ok(None)` means the source is exhausted.
/// After [`Scanner::close`] every call to `next_scan` fails with
/// [`crate::ScanError::Closed`]. To scan again, open a new scanner.
pub trait Scanner {
    fn next_scan(&mut self) -> Result<Option<ScanEvent>>;

    /// Release the underlying device. Closing twice is a no-op.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// Read the first decoded value and close the scanner.
///
/// Events with an empty value are skipped. The scanner is closed even when
/// the source runs dry or fails.
pub fn scan_once<S: Scanner + ?Sized>(scanner: &mut S) -> Result<Option<ScanEvent>> {
    let result = first_non_empty(scanner);
    scanner.close();
    if let Ok(Some(event)) = &result {
        debug!(value = %event.value, "scan complete, scanner closed");
    }
    result
}

fn first_non_empty<S: Scanner + ?Sized>(scanner: &mut S) -> Result<Option<ScanEvent>> {
    while let Some(event) = scanner.next_scan()? {
        if !event.value.is_empty() {
            return Ok(Some(event));
        }
    }
    Ok(None)
}
