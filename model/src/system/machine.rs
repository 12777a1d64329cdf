use super::{CpuInfo, HardwareValue};
use crate::UNKNOWN;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Disk information.
///
/// Nothing populates disks yet; `lsblk` and `smart_data` are recognized
/// member names without an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Everything extracted from one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Chassis serial number from dmidecode
    pub chassis_serial: Option<String>,
    /// System UUID from dmidecode
    pub uuid: Option<String>,
    /// Processors keyed by physical id
    pub cpus: BTreeMap<String, CpuInfo>,
    /// Disks (not populated yet)
    pub disks: Vec<DiskInfo>,
    /// Facts from the lshw XML document
    pub hardware: BTreeMap<String, HardwareValue>,
}

/// Partial result of running one extractor over one member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub chassis_serial: Option<String>,
    pub uuid: Option<String>,
    /// Processor blocks in file order, one per logical processor
    pub cpus: Vec<CpuInfo>,
    pub hardware: BTreeMap<String, HardwareValue>,
}

impl MachineRecord {
    /// Merge an extractor fragment into this record.
    ///
    /// Values already present are never overwritten: the first extractor to
    /// set a field owns it, and the first processor block seen for a physical
    /// id wins.
    pub fn merge(&mut self, fragment: Fragment) {
        if self.chassis_serial.is_none() {
            self.chassis_serial = fragment.chassis_serial;
        }
        if self.uuid.is_none() {
            self.uuid = fragment.uuid;
        }

        for cpu in fragment.cpus {
            let Some(id) = cpu.physical_id().map(str::to_string) else {
                warn!(
                    "Skipping processor block without a physical id: {:?}",
                    cpu.get("model name")
                );
                continue;
            };
            self.cpus.entry(id).or_insert(cpu);
        }

        for (key, value) in fragment.hardware {
            self.hardware.entry(key).or_insert(value);
        }
    }

    /// Replace absent or empty identifiers with the [`UNKNOWN`] sentinel.
    pub fn finalize(&mut self) {
        for field in [&mut self.chassis_serial, &mut self.uuid] {
            if field.as_deref().map_or(true, str::is_empty) {
                *field = Some(UNKNOWN.to_string());
            }
        }
    }

    pub fn hardware_value(&self, key: &str) -> Option<&HardwareValue> {
        self.hardware.get(key)
    }
}
