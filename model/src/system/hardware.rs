use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known keys of [`MachineRecord::hardware`](super::MachineRecord).
pub mod keys {
    pub const VENDOR: &str = "vendor";
    pub const PRODUCT: &str = "product";
    pub const SERIAL: &str = "serial";
    pub const RAM_TOTAL_SIZE: &str = "RAM total size";
    pub const RAM_TYPE: &str = "RAM type";
    pub const RAM_BANK_SIZE: &str = "RAM bank size";
    pub const RAM_SLOTS: &str = "RAM slots";
    pub const RAM_EMPTY: &str = "RAM empty";
    pub const L1_CACHE: &str = "L1 cache";
    pub const L2_CACHE: &str = "L2 cache";
    pub const L3_CACHE: &str = "L3 cache";
    pub const NIC_SPEEDS: &str = "NIC speeds";
    pub const NIC_MODELS: &str = "NIC models";
    pub const NICS: &str = "NICs";
}

/// A hardware fact: a single value, one value per device, or a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HardwareValue {
    Count(i64),
    Text(String),
    List(Vec<String>),
}

impl HardwareValue {
    /// Wrap query results: a single result is unwrapped, anything else stays a list.
    pub fn from_results(mut results: Vec<String>) -> Self {
        if results.len() == 1 {
            HardwareValue::Text(results.remove(0))
        } else {
            HardwareValue::List(results)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            HardwareValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<i64> {
        match self {
            HardwareValue::Count(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for HardwareValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareValue::Count(n) => write!(f, "{}", n),
            HardwareValue::Text(s) => f.write_str(s),
            HardwareValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<i64> for HardwareValue {
    fn from(n: i64) -> Self {
        HardwareValue::Count(n)
    }
}

impl From<&str> for HardwareValue {
    fn from(s: &str) -> Self {
        HardwareValue::Text(s.to_string())
    }
}
