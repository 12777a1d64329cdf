//! `lshw -xml` extractor.
//!
//! Facts are pulled out of the document with a fixed table of queries. Each
//! query runs against the top-level system node: the root element itself for
//! old lshw releases, or each `node` child of the `<list>` wrapper that newer
//! releases emit.

use model::keys;
use model::{Fragment, HardwareValue};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::Extractor;
use crate::error::Result;
use crate::xml::{self, Element};

/// Extracts vendor, product, memory, cache and NIC facts.
pub struct LshwXmlExtractor;

type Query = fn(&Element) -> Vec<String>;

/// One query per hardware fact.
const QUERIES: &[(&str, Query)] = &[
    (keys::PRODUCT, product),
    (keys::VENDOR, vendor),
    (keys::SERIAL, serial),
    (keys::RAM_TOTAL_SIZE, ram_total_size),
    (keys::RAM_TYPE, ram_type),
    (keys::RAM_BANK_SIZE, ram_bank_size),
    (keys::L1_CACHE, l1_cache),
    (keys::L2_CACHE, l2_cache),
    (keys::L3_CACHE, l3_cache),
    (keys::NIC_SPEEDS, nic_speeds),
    (keys::NIC_MODELS, nic_models),
];

fn product(system: &Element) -> Vec<String> {
    texts(&[system], "product")
}

fn vendor(system: &Element) -> Vec<String> {
    texts(&[system], "vendor")
}

fn serial(system: &Element) -> Vec<String> {
    texts(&[system], "serial")
}

fn ram_total_size(system: &Element) -> Vec<String> {
    let memory: Vec<_> = system
        .descendants_named("node")
        .filter(|n| n.attr("id") == Some("memory"))
        .collect();
    texts(&memory, "size")
}

fn ram_type(system: &Element) -> Vec<String> {
    texts(&memory_banks(system), "description")
}

fn ram_bank_size(system: &Element) -> Vec<String> {
    texts(&memory_banks(system), "size")
}

fn l1_cache(system: &Element) -> Vec<String> {
    cache_sizes(system, "L1 cache")
}

fn l2_cache(system: &Element) -> Vec<String> {
    cache_sizes(system, "L2 cache")
}

fn l3_cache(system: &Element) -> Vec<String> {
    cache_sizes(system, "L3 cache")
}

fn nic_speeds(system: &Element) -> Vec<String> {
    texts(&ethernet_nics(system), "capacity")
}

fn nic_models(system: &Element) -> Vec<String> {
    texts(&ethernet_nics(system), "product")
}

/// Non-empty text of the named child of each node
fn texts(nodes: &[&Element], child: &str) -> Vec<String> {
    nodes
        .iter()
        .flat_map(|n| n.child_texts(child))
        .map(str::to_string)
        .collect()
}

/// Bank nodes directly under any memory-class node
fn memory_banks(system: &Element) -> Vec<&Element> {
    system
        .descendants_named("node")
        .filter(|n| n.attr("class") == Some("memory"))
        .flat_map(|memory| memory.children_named("node"))
        .filter(|bank| bank.attr("id").is_some_and(|id| id.contains("bank")))
        .collect()
}

fn cache_sizes(system: &Element, description: &str) -> Vec<String> {
    let caches: Vec<_> = system
        .descendants_named("node")
        .filter(|n| n.has_child_text("description", description))
        .collect();
    texts(&caches, "size")
}

/// Network-class nodes advertising the ethernet capability
fn ethernet_nics(system: &Element) -> Vec<&Element> {
    system
        .descendants_named("node")
        .filter(|n| n.attr("class") == Some("network"))
        .filter(|n| {
            n.children_named("capabilities")
                .flat_map(|caps| caps.children_named("capability"))
                .any(|cap| cap.attr("id") == Some("ethernet"))
        })
        .collect()
}

/// Top-level system nodes of an lshw document
fn system_nodes(root: &Element) -> Vec<&Element> {
    if root.name == "node" {
        vec![root]
    } else {
        root.children_named("node").collect()
    }
}

/// Run every query against a parsed document.
pub fn extract_hardware(root: &Element) -> BTreeMap<String, HardwareValue> {
    let systems = system_nodes(root);
    if systems.is_empty() {
        warn!("lshw document <{}> has no system node", root.name);
    }

    let mut hardware = BTreeMap::new();
    let mut counts = BTreeMap::new();

    for (key, query) in QUERIES {
        let results: Vec<String> = systems.iter().flat_map(|s| query(s)).collect();
        debug!("lshw {}: {} result(s)", key, results.len());
        counts.insert(*key, results.len() as i64);
        hardware.insert(key.to_string(), HardwareValue::from_results(results));
    }

    let nics = counts[keys::NIC_MODELS];
    let ram_slots = counts[keys::RAM_TYPE];
    let ram_empty = ram_slots - counts[keys::RAM_BANK_SIZE];
    if ram_empty < 0 {
        warn!(
            "lshw reports more populated memory banks than slots ({} slots, {} sizes)",
            ram_slots,
            counts[keys::RAM_BANK_SIZE]
        );
    }

    hardware.insert(keys::NICS.to_string(), nics.into());
    hardware.insert(keys::RAM_SLOTS.to_string(), ram_slots.into());
    hardware.insert(keys::RAM_EMPTY.to_string(), ram_empty.into());

    hardware
}

impl Extractor for LshwXmlExtractor {
    fn name(&self) -> &'static str {
        "lshw_xml"
    }

    fn extract(&self, content: &[u8]) -> Result<Fragment> {
        let root = xml::parse(content)?;
        Ok(Fragment {
            hardware: extract_hardware(&root),
            ..Default::default()
        })
    }
}
