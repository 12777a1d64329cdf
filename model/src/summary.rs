//! One-line-per-machine summary.

use serde::{Deserialize, Serialize};

/// Column names of a [`SummaryRow`], in report order.
pub const COLUMNS: &[&str] = &[
    "chassis_serial",
    "vendor",
    "product",
    "uuid",
    "total_ram",
    "ram_slots",
    "ram_empty_slots",
    "nics",
    "disks",
    "cpus",
];

/// Flattened, report-ready view of a machine record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub chassis_serial: String,
    pub vendor: String,
    pub product: String,
    pub uuid: String,
    /// Human-readable total RAM (e.g. "64.0GB")
    pub total_ram: String,
    pub ram_slots: i64,
    pub ram_empty_slots: i64,
    pub nics: i64,
    pub disks: usize,
    pub cpus: usize,
}

impl SummaryRow {
    /// Values in [`COLUMNS`] order.
    pub fn values(&self) -> Vec<String> {
        vec![
            self.chassis_serial.clone(),
            self.vendor.clone(),
            self.product.clone(),
            self.uuid.clone(),
            self.total_ram.clone(),
            self.ram_slots.to_string(),
            self.ram_empty_slots.to_string(),
            self.nics.to_string(),
            self.disks.to_string(),
            self.cpus.to_string(),
        ]
    }
}
