//! Report rendering.

use model::{MachineRecord, SummaryRow, COLUMNS};
use std::collections::BTreeMap;

use crate::error::Result;

/// Output format for the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Quoted comma-separated values with a commented header line.
    Csv,
    /// JSON object keyed by archive name.
    Json,
    /// Pretty-printed JSON.
    JsonPretty,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Ok(OutputFormat::JsonPretty),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render the summary table in the given format.
pub fn render(summaries: &BTreeMap<String, SummaryRow>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(render_csv(summaries)),
        OutputFormat::Json => Ok(serde_json::to_string(summaries)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(summaries)?),
    }
}

/// Header line followed by one quoted line per archive.
pub fn render_csv(summaries: &BTreeMap<String, SummaryRow>) -> String {
    let mut output = format!("# \"file\", {}\n", COLUMNS.join(", "));

    for (archive, row) in summaries {
        let mut fields = vec![quote(archive)];
        fields.extend(row.values().iter().map(|v| quote(v)));
        output.push_str(&fields.join(", "));
        output.push('\n');
    }

    output
}

/// Full records as pretty JSON keyed by archive name
pub fn render_records(records: &BTreeMap<String, MachineRecord>) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
