//! Hardware inventory extraction from captured diagnostic output.
//!
//! Each archive collected from a machine holds the output of commands such
//! as `dmidecode`, `cat /proc/cpuinfo` and `lshw -xml`. This crate turns the
//! members of one archive into a [`MachineRecord`](model::MachineRecord) and
//! reduces the record to a [`SummaryRow`](model::SummaryRow).
//!
//! # Example
//!
//! ```no_run
//! use hwinv_extract::{report::render_csv, Inventory};
//!
//! let mut inventory = Inventory::default();
//! let mut builder = inventory.builder("host1.tgz");
//! builder.visit("host1/cpuinfo", b"physical id : 0\n").unwrap();
//! let record = builder.finish();
//! inventory.add_record("host1.tgz", record);
//!
//! println!("{}", render_csv(inventory.summaries()));
//! ```

pub mod builder;
pub mod error;
pub mod extractors;
pub mod inventory;
pub mod report;
pub mod summary;
pub mod xml;

pub use builder::RecordBuilder;
pub use error::{Error, Result};
pub use extractors::{Extractor, Registry, KNOWN_FILES};
pub use inventory::{ArchiveFailure, FailureStage, Inventory};
pub use report::OutputFormat;
