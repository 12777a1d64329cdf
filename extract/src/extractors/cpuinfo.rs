//! `/proc/cpuinfo` extractor.

use model::{is_reported_flag, CpuInfo, Fragment, CPU_FIELDS};
use tracing::debug;

use super::{decode, Extractor};
use crate::error::Result;

/// Extracts one [`CpuInfo`] per logical-processor block.
pub struct CpuinfoExtractor;

impl Extractor for CpuinfoExtractor {
    fn name(&self) -> &'static str {
        "cpuinfo"
    }

    fn extract(&self, content: &[u8]) -> Result<Fragment> {
        Ok(Fragment {
            cpus: parse_blocks(&decode(content)),
            ..Default::default()
        })
    }
}

/// Parse blank-line separated processor blocks, in file order.
///
/// Blocks without any kept field are dropped. Lines without a colon are
/// skipped.
pub fn parse_blocks(text: &str) -> Vec<CpuInfo> {
    let mut blocks = Vec::new();
    let mut current = CpuInfo::default();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            finish_block(&mut blocks, std::mem::take(&mut current));
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            debug!("cpuinfo line {}: no key/value separator, skipping", lineno + 1);
            continue;
        };

        let key = key.trim();
        if !CPU_FIELDS.contains(&key) {
            continue;
        }

        let value = if key == "flags" {
            filter_flags(value)
        } else {
            value.trim().to_string()
        };
        current.fields.insert(key.to_string(), value);
    }
    finish_block(&mut blocks, current);

    blocks
}

fn finish_block(blocks: &mut Vec<CpuInfo>, mut block: CpuInfo) {
    if block.is_empty() {
        return;
    }
    block.refresh_hyperthreading();
    blocks.push(block);
}

/// Keep only the reported flags, preserving their order and spelling.
pub fn filter_flags(flags: &str) -> String {
    flags
        .split_whitespace()
        .filter(|f| is_reported_flag(f))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TWO_THREADS: &str = "\
processor\t: 0
vendor_id\t: GenuineIntel
cpu family\t: 6
model\t\t: 85
model name\t: Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz
stepping\t: 4
cpu MHz\t\t: 2100.000
cache size\t: 22528 KB
physical id\t: 0
siblings\t: 32
core id\t\t: 0
cpu cores\t: 16
flags\t\t: fpu vme de pse tsc msr pae mce cx8 apic sep mtrr pge ssse3 sse4_1 sse4_2 vmx smx nx avx2 smep smap
bogomips\t: 4200.00

processor\t: 1
vendor_id\t: GenuineIntel
physical id\t: 1
siblings\t: 16
cpu cores\t: 16
flags\t\t: fpu vme
";

    #[test]
    fn test_parse_blocks() {
        let blocks = parse_blocks(TWO_THREADS);
        assert_eq!(blocks.len(), 2);

        let first = &blocks[0];
        assert_eq!(
            first.get("model name"),
            Some("Intel(R) Xeon(R) Gold 6130 CPU @ 2.10GHz")
        );
        assert_eq!(first.get("model"), Some("85"));
        assert_eq!(first.get("cache size"), Some("22528 KB"));
        assert_eq!(first.physical_id(), Some("0"));
        assert!(first.has_hyperthreading);
        // Not in the kept field list
        assert_eq!(first.get("processor"), None);
        assert_eq!(first.get("bogomips"), None);

        assert!(!blocks[1].has_hyperthreading);
        assert_eq!(blocks[1].get("flags"), Some(""));
    }

    #[test]
    fn test_flags_filtered_in_order() {
        let blocks = parse_blocks(TWO_THREADS);
        assert_eq!(
            blocks[0].get("flags"),
            Some("sep ssse3 sse4_1 sse4_2 vmx nx smep smap")
        );
    }

    #[test]
    fn test_flags_case_insensitive() {
        assert_eq!(filter_flags(" NX avx VMX  sse3 "), "NX VMX sse3");
    }

    #[test]
    fn test_value_split_on_first_colon() {
        let blocks = parse_blocks("model name : Weird: CPU\nphysical id : 0\n");
        assert_eq!(blocks[0].get("model name"), Some("Weird: CPU"));
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let blocks = parse_blocks("physical id : 3\ngarbage line\nsiblings : 4\ncpu cores : 2\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].physical_id(), Some("3"));
        assert!(blocks[0].has_hyperthreading);
    }

    #[test]
    fn test_missing_counts_mean_no_hyperthreading() {
        let blocks = parse_blocks("physical id : 0\nsiblings : 2\n\nphysical id : 1\ncpu cores : x\nsiblings : 2\n");
        assert_eq!(blocks.len(), 2);
        assert!(!blocks[0].has_hyperthreading);
        assert!(!blocks[1].has_hyperthreading);
    }

    #[test]
    fn test_blank_runs_and_empty_input() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("\n\n   \n").is_empty());
        assert_eq!(parse_blocks("\n\nphysical id: 0\n\n\n\nphysical id: 1").len(), 2);
    }

    #[test]
    fn test_extract_keeps_every_block() {
        let fragment = CpuinfoExtractor
            .extract(b"physical id : 0\ncpu MHz : 1\n\nphysical id : 0\ncpu MHz : 2\n")
            .unwrap();
        assert_eq!(fragment.cpus.len(), 2);
        assert!(fragment.hardware.is_empty());
        assert!(fragment.chassis_serial.is_none());
    }
}
