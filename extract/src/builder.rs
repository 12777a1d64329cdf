//! Per-archive record assembly.

use model::MachineRecord;
use std::path::Path;
use tracing::{info, trace, warn};

use crate::error::Result;
use crate::extractors::{is_known, normalize_name, Registry};

/// Builds the [`MachineRecord`] for one archive from its members.
///
/// Members may arrive in any order. Each call to [`RecordBuilder::visit`]
/// handles one member; failures are contained to that member unless the
/// extractor reports a structural error, which fails the whole archive.
pub struct RecordBuilder<'a> {
    registry: &'a Registry,
    archive: String,
    record: MachineRecord,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(registry: &'a Registry, archive: impl Into<String>) -> Self {
        Self {
            registry,
            archive: archive.into(),
            record: MachineRecord::default(),
        }
    }

    pub fn archive(&self) -> &str {
        &self.archive
    }

    /// Whether a member at this path would be dispatched.
    ///
    /// Callers use this to avoid reading members that will be ignored.
    pub fn wants(&self, member_path: &str) -> bool {
        member_name(member_path).is_some_and(|name| is_known(&name))
    }

    /// Dispatch one member to its extractor and merge the result.
    pub fn visit(&mut self, member_path: &str, content: &[u8]) -> Result<()> {
        let Some(name) = member_name(member_path).filter(|name| is_known(name)) else {
            trace!("{}: ignoring member {}", self.archive, member_path);
            return Ok(());
        };

        let Some(extractor) = self.registry.get(&name) else {
            warn!("{}: no extractor for {}, skipping", self.archive, name);
            return Ok(());
        };

        info!("Parsing {} on {}", name, self.archive);
        match extractor.extract(content) {
            Ok(fragment) => self.record.merge(fragment),
            Err(e) if e.is_structural() => return Err(e),
            Err(e) => warn!("{}: dropping {}: {}", self.archive, name, e),
        }

        Ok(())
    }

    /// Finalize the record, applying sentinels for unknown identifiers.
    pub fn finish(self) -> MachineRecord {
        let mut record = self.record;
        record.finalize();
        record
    }
}

/// Normalized base name of a member path
fn member_name(member_path: &str) -> Option<String> {
    Path::new(member_path)
        .file_name()
        .map(|name| normalize_name(&name.to_string_lossy()))
}
