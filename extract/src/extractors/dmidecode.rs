//! `dmidecode` extractor.

use model::Fragment;
use regex::Regex;
use tracing::warn;

use super::{decode, Extractor};
use crate::error::Result;

/// Extracts the chassis serial number and system UUID.
///
/// Absent and empty values both leave the field unset; the record falls back
/// to the "Unknown" sentinel when finalized.
pub struct DmidecodeExtractor {
    chassis_serial: Regex,
    uuid: Regex,
}

impl DmidecodeExtractor {
    pub fn new() -> Self {
        let chassis_serial = Regex::new(r"(?s)Chassis Information.*?Serial Number: ([^\n]*)")
            .expect("Invalid chassis serial regex");
        let uuid = Regex::new(r"(?s)System Information.*?UUID: ([^\n]*)")
            .expect("Invalid UUID regex");

        Self {
            chassis_serial,
            uuid,
        }
    }

    fn capture(pattern: &Regex, text: &str) -> Option<String> {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn chassis_serial(&self, text: &str) -> Option<String> {
        let serial = Self::capture(&self.chassis_serial, text);
        if serial.is_none() {
            warn!("No chassis serial number detected");
        }
        serial
    }

    pub fn uuid(&self, text: &str) -> Option<String> {
        let uuid = Self::capture(&self.uuid, text);
        if uuid.is_none() {
            warn!("No UUID detected");
        }
        uuid
    }
}

impl Default for DmidecodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for DmidecodeExtractor {
    fn name(&self) -> &'static str {
        "dmidecode"
    }

    fn extract(&self, content: &[u8]) -> Result<Fragment> {
        let text = decode(content);
        Ok(Fragment {
            chassis_serial: self.chassis_serial(&text),
            uuid: self.uuid(&text),
            ..Default::default()
        })
    }
}
