//! Key-value storage for the serialized stock document.
//!
//! The stock store needs exactly one thing from its storage medium: get and
//! set a string blob under a fixed key. This crate defines that contract and
//! the backends that satisfy it.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStorage`] trait:
//!
//! - [`InMemoryStorage`] -- `HashMap`-based store for tests and embedding
//! - [`FileStorage`] -- one JSON file per key inside a data directory
//!
//! # Design Rules
//!
//! 1. `set` replaces the whole value; there are no partial writes.
//! 2. File writes go through a temporary file and an atomic rename, so a
//!    crash leaves either the old or the new document, never a torn one.
//! 3. Backends never interpret the stored text.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use traits::{validate_key, KeyValueStorage};
