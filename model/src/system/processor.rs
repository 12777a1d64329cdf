use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field names kept from a `cpuinfo` block.
pub const CPU_FIELDS: &[&str] = &[
    "vendor_id",
    "cpu family",
    "model",
    "model name",
    "stepping",
    "cpu MHz",
    "cache size",
    "physical id",
    "siblings",
    "cpu cores",
    "flags",
];

/// CPU flags worth reporting (virtualization and ISA extensions).
pub const CPU_FLAGS: &[&str] = &[
    "nx", "hvm", "ept", "npt", "svm", "vmx", "vnmi", "sep", "smep", "smap", "sse4_1", "sse4_2",
    "sse3", "sse4", "ssse3",
];

/// One physical processor as described by a `cpuinfo` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Raw `cpuinfo` fields, restricted to [`CPU_FIELDS`]
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    /// Whether siblings is exactly twice the core count
    pub has_hyperthreading: bool,
}

impl CpuInfo {
    /// Look up a raw field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Socket identifier this block belongs to
    pub fn physical_id(&self) -> Option<&str> {
        self.get("physical id")
    }

    /// Check if the (filtered) flag list contains a flag
    pub fn has_flag(&self, flag: &str) -> bool {
        self.get("flags")
            .map(|flags| flags.split_whitespace().any(|f| f.eq_ignore_ascii_case(flag)))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Recompute `has_hyperthreading` from `siblings` and `cpu cores`.
    ///
    /// Missing or non-integer values count as no hyperthreading.
    pub fn refresh_hyperthreading(&mut self) {
        let parse = |key: &str| self.get(key).and_then(|v| v.trim().parse::<i64>().ok());

        let has_hyperthreading = match (parse("siblings"), parse("cpu cores")) {
            (Some(siblings), Some(cores)) => cores
                .checked_mul(2)
                .map(|doubled| doubled == siblings)
                .unwrap_or(false),
            _ => false,
        };
        self.has_hyperthreading = has_hyperthreading;
    }
}

/// Check whether a flag token is one of [`CPU_FLAGS`], ignoring case
pub fn is_reported_flag(token: &str) -> bool {
    CPU_FLAGS.iter().any(|f| f.eq_ignore_ascii_case(token))
}
