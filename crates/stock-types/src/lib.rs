//! Stock data model for the leather-goods inventory.
//!
//! The stock is a three-level hierarchy owned top-down:
//!
//! - [`Stock`] -- root aggregate, brand name to [`Brand`]
//! - [`Brand`] -- model name to [`Model`], optional image URL
//! - [`Model`] -- ordered [`BarcodeItem`] sequence, optional image URL
//!
//! All mutation rules live on [`Stock`] and are pure: no I/O, no logging of
//! persistence concerns. The store crate wraps them with locking and
//! persistence.
//!
//! # Invariants
//!
//! 1. Brand names are unique in a stock; model names are unique in a brand.
//! 2. A barcode value appears at most once per model (exact match).
//! 3. A model with no barcodes is removed; a brand with no models is removed.
//! 4. Adding items never replaces an image URL that is already set.
//!
//! # Wire Format
//!
//! [`codec`] reads and writes the persisted JSON document. Decoding is
//! schema-checked and repairs what it can (see [`codec::decode`]).

pub mod barcode;
pub mod codec;
pub mod error;
pub mod stock;

pub use barcode::{BarcodeId, BarcodeItem};
pub use codec::{decode, encode, encode_pretty, DecodeReport, Decoded};
pub use error::{Result, TypeError};
pub use stock::{AddOutcome, Brand, Model, Removal, Stock};
