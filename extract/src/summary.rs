//! Reduce a machine record to a summary row.

use model::{keys, HardwareValue, MachineRecord, SummaryRow, UNKNOWN};
use tracing::info;

use crate::error::{Error, Result};

/// Summarize a finalized record.
///
/// Every hardware fact the row needs must be present: a row filled with
/// made-up defaults is worse than no row.
pub fn summarize(archive: &str, record: &MachineRecord) -> Result<SummaryRow> {
    info!("Summarizing {}", archive);

    let lookup = |key: &str| -> Result<&HardwareValue> {
        record
            .hardware_value(key)
            .ok_or_else(|| Error::MissingHardwareField {
                archive: archive.to_string(),
                field: key.to_string(),
            })
    };
    let invalid = |key: &str, value: &HardwareValue| Error::InvalidHardwareField {
        archive: archive.to_string(),
        field: key.to_string(),
        value: value.to_string(),
    };
    let count = |key: &str| -> Result<i64> {
        let value = lookup(key)?;
        value.as_count().ok_or_else(|| invalid(key, value))
    };

    let total_ram = {
        let value = lookup(keys::RAM_TOTAL_SIZE)?;
        let bytes = match value {
            HardwareValue::Count(n) => Some(*n as f64),
            HardwareValue::Text(s) => s.trim().parse::<f64>().ok(),
            HardwareValue::List(_) => None,
        };
        format_size(bytes.ok_or_else(|| invalid(keys::RAM_TOTAL_SIZE, value))?)
    };

    Ok(SummaryRow {
        chassis_serial: identifier(&record.chassis_serial),
        vendor: lookup(keys::VENDOR)?.to_string(),
        product: lookup(keys::PRODUCT)?.to_string(),
        uuid: identifier(&record.uuid),
        total_ram,
        ram_slots: count(keys::RAM_SLOTS)?,
        ram_empty_slots: count(keys::RAM_EMPTY)?,
        nics: count(keys::NICS)?,
        disks: record.disks.len(),
        cpus: record.cpus.len(),
    })
}

fn identifier(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

/// Format a byte count using binary units and one decimal place.
///
/// ```
/// use hwinv_extract::summary::format_size;
///
/// assert_eq!(format_size(1536.0), "1.5KB");
/// ```
pub fn format_size(bytes: f64) -> String {
    let mut num = bytes;
    for unit in ["bytes", "KB", "MB", "GB"] {
        if num > -1024.0 && num < 1024.0 {
            return format!("{:.1}{}", num, unit);
        }
        num /= 1024.0;
    }
    format!("{:.1}TB", num)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{CpuInfo, Fragment};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn record() -> MachineRecord {
        let mut hardware = BTreeMap::new();
        hardware.insert(keys::VENDOR.to_string(), HardwareValue::from("Dell Inc."));
        hardware.insert(keys::PRODUCT.to_string(), HardwareValue::from("PowerEdge R640"));
        hardware.insert(
            keys::RAM_TOTAL_SIZE.to_string(),
            HardwareValue::from("68719476736"),
        );
        hardware.insert(keys::RAM_SLOTS.to_string(), HardwareValue::Count(24));
        hardware.insert(keys::RAM_EMPTY.to_string(), HardwareValue::Count(22));
        hardware.insert(keys::NICS.to_string(), HardwareValue::Count(4));

        let mut cpu = CpuInfo::default();
        cpu.fields.insert("physical id".into(), "0".into());

        let mut record = MachineRecord::default();
        record.merge(Fragment {
            chassis_serial: Some("ABC123".into()),
            cpus: vec![cpu],
            hardware,
            ..Default::default()
        });
        record.finalize();
        record
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0.0), "0.0bytes");
        assert_eq!(format_size(1023.0), "1023.0bytes");
        assert_eq!(format_size(1536.0), "1.5KB");
        assert_eq!(format_size(1073741824.0), "1.0GB");
        assert_eq!(format_size(68719476736.0), "64.0GB");
        assert_eq!(format_size(1099511627776.0), "1.0TB");
        assert_eq!(format_size(1024.0f64.powi(6)), "1048576.0TB");
    }

    #[test]
    fn test_format_size_negative() {
        assert_eq!(format_size(-1536.0), "-1.5KB");
        assert_eq!(format_size(-1023.0), "-1023.0bytes");
    }

    #[test]
    fn test_summarize() {
        let row = summarize("host1.tgz", &record()).unwrap();
        assert_eq!(
            row,
            SummaryRow {
                chassis_serial: "ABC123".into(),
                vendor: "Dell Inc.".into(),
                product: "PowerEdge R640".into(),
                uuid: "Unknown".into(),
                total_ram: "64.0GB".into(),
                ram_slots: 24,
                ram_empty_slots: 22,
                nics: 4,
                disks: 0,
                cpus: 1,
            }
        );
    }

    #[test]
    fn test_missing_field_names_archive() {
        let mut record = record();
        record.hardware.remove(keys::NICS);
        let err = summarize("host1.tgz", &record).unwrap_err();
        assert!(matches!(
            &err,
            Error::MissingHardwareField { archive, field } if archive == "host1.tgz" && field == "NICs"
        ));
        assert!(err.to_string().contains("host1.tgz"));
    }

    #[test]
    fn test_non_numeric_ram_rejected() {
        let mut record = record();
        record.hardware.insert(
            keys::RAM_TOTAL_SIZE.to_string(),
            HardwareValue::List(vec!["1".into(), "2".into()]),
        );
        assert!(matches!(
            summarize("host1.tgz", &record),
            Err(Error::InvalidHardwareField { .. })
        ));
    }

    #[test]
    fn test_record_without_hardware_fails() {
        let mut record = MachineRecord::default();
        record.finalize();
        assert!(matches!(
            summarize("bare.tgz", &record),
            Err(Error::MissingHardwareField { .. })
        ));
    }
}
