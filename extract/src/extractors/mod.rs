//! Per-format extractors for captured diagnostic output.

pub mod cpuinfo;
pub mod dmidecode;
pub mod lshw;

pub use cpuinfo::CpuinfoExtractor;
pub use dmidecode::DmidecodeExtractor;
pub use lshw::LshwXmlExtractor;

use model::Fragment;
use std::collections::HashMap;

use crate::error::Result;

/// Diagnostic outputs expected inside an archive, by normalized member name.
pub const KNOWN_FILES: &[&str] = &[
    "smart_data",
    "sensors",
    "meminfo",
    "lsusb",
    "lspci",
    "lsmod",
    "lshw_xml",
    "lshw_txt",
    "lsblk",
    "ipmitool_sensor",
    "ipmitool_sel",
    "ipmitool_sdr",
    "ipmitool_mc_info",
    "ipmitool_fru",
    "ipmitool_chassis_status",
    "ip_link",
    "dmidecode",
    "dmesg",
    "cpuinfo",
];

/// Normalize a member base name to the identifier used by [`KNOWN_FILES`].
pub fn normalize_name(base_name: &str) -> String {
    base_name.replace('-', "_")
}

/// Whether a normalized name is one of [`KNOWN_FILES`]
pub fn is_known(name: &str) -> bool {
    KNOWN_FILES.contains(&name)
}

/// Turns the raw content of one diagnostic output into a [`Fragment`].
pub trait Extractor {
    /// Normalized member name this extractor handles
    fn name(&self) -> &'static str;

    /// Extract facts from the member content.
    fn extract(&self, content: &[u8]) -> Result<Fragment>;
}

/// Explicit mapping from normalized member name to extractor.
pub struct Registry {
    extractors: HashMap<&'static str, Box<dyn Extractor>>,
}

impl Registry {
    /// Registry with no extractors
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with every built-in extractor
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(CpuinfoExtractor));
        registry.register(Box::new(DmidecodeExtractor::new()));
        registry.register(Box::new(LshwXmlExtractor));
        registry
    }

    /// Add an extractor, replacing any previous one for the same name.
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.insert(extractor.name(), extractor);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Extractor> {
        self.extractors.get(name).map(|e| e.as_ref())
    }

    /// Names with a registered extractor, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.extractors.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Decode member content as text, replacing invalid UTF-8.
pub(crate) fn decode(content: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(content)
}
