//! Barcode scanner capability.
//!
//! The stock core does not decode images. It consumes decoded text through
//! the [`Scanner`] trait, whatever engine sits behind it: a camera decoder,
//! a keyboard-wedge scanner typing into a terminal, or a scripted list.
//!
//! - [`ScanEvent`] -- one decoded value and when it was read
//! - [`Scanner`] -- a lazy, finite source of events that can be closed
//! - [`scan_once`] -- take the first decode, then close the scanner
//! - [`LineScanner`] -- one event per non-blank input line
//! - [`ScriptedScanner`] -- replays a fixed list of values

pub mod error;
pub mod scanner;
pub mod sources;

pub use error::{Result, ScanError};
pub use scanner::{scan_once, ScanEvent, Scanner};
pub use sources::{LineScanner, ScriptedScanner};
