//! Data model for hardware inventory.
//!
//! A [`MachineRecord`] holds everything extracted from one archive of
//! captured diagnostic output. Extractors produce [`Fragment`]s that are
//! merged into the record, and a finished record is reduced to a
//! [`SummaryRow`] for the tabular report.

pub mod summary;
pub mod system;

pub use summary::{SummaryRow, COLUMNS};
pub use system::*;

/// Placeholder used when an identifying fact could not be determined.
pub const UNKNOWN: &str = "Unknown";
