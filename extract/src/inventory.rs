//! Batch state across archives.

use model::{MachineRecord, SummaryRow};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{error, warn};

use crate::builder::RecordBuilder;
use crate::error::Error;
use crate::extractors::Registry;
use crate::summary::summarize;

/// Pipeline step at which an archive failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// The archive could not be read or its record could not be built
    Extraction,
    /// The record was built but lacks facts the summary needs
    Summary,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Extraction => f.write_str("extraction"),
            FailureStage::Summary => f.write_str("summary"),
        }
    }
}

/// An archive that did not produce a summary row.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveFailure {
    pub archive: String,
    pub stage: FailureStage,
    pub reason: String,
}

/// Records, summary rows and failures for every processed archive.
pub struct Inventory {
    registry: Registry,
    records: BTreeMap<String, MachineRecord>,
    summaries: BTreeMap<String, SummaryRow>,
    failures: Vec<ArchiveFailure>,
}

impl Inventory {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            records: BTreeMap::new(),
            summaries: BTreeMap::new(),
            failures: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Start a fresh record for an archive
    pub fn builder(&self, archive: &str) -> RecordBuilder<'_> {
        RecordBuilder::new(&self.registry, archive)
    }

    /// Store a finished record and summarize it.
    ///
    /// A summarization failure drops the row but keeps the record.
    pub fn add_record(&mut self, archive: &str, record: MachineRecord) {
        if self.records.contains_key(archive) {
            warn!("{}: archive name seen twice, replacing earlier record", archive);
            self.summaries.remove(archive);
        }

        match summarize(archive, &record) {
            Ok(row) => {
                self.summaries.insert(archive.to_string(), row);
            }
            Err(e) => {
                error!("Failed to summarize {}: {}", archive, e);
                self.failures.push(ArchiveFailure {
                    archive: archive.to_string(),
                    stage: FailureStage::Summary,
                    reason: e.to_string(),
                });
            }
        }

        self.records.insert(archive.to_string(), record);
    }

    /// Record an archive whose extraction failed; it contributes no row.
    ///
    /// An earlier archive with the same name is dropped as well.
    pub fn add_failure(&mut self, archive: &str, err: &Error) {
        error!("Failed to process {}: {}", archive, err);
        if self.records.remove(archive).is_some() {
            warn!("{}: archive name seen twice, dropping earlier record", archive);
            self.summaries.remove(archive);
        }
        self.failures.push(ArchiveFailure {
            archive: archive.to_string(),
            stage: FailureStage::Extraction,
            reason: err.to_string(),
        });
    }

    pub fn records(&self) -> &BTreeMap<String, MachineRecord> {
        &self.records
    }

    pub fn summaries(&self) -> &BTreeMap<String, SummaryRow> {
        &self.summaries
    }

    pub fn failures(&self) -> &[ArchiveFailure] {
        &self.failures
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}
