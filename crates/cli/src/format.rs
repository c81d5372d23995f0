//! Report structs and their human/JSON rendering.
//!
//! Two modes:
//! - **Human** (default): one summary line per record, plus scan totals
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of the report

use gazetteer_core::Place;
use serde::Serialize;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// One record, reduced to the fields worth printing.
#[derive(Debug, Serialize)]
pub struct PlaceSummary {
    pub id: String,
    pub title: String,
    pub uri: Option<String>,
}

impl PlaceSummary {
    pub fn from_place(place: &Place) -> Self {
        PlaceSummary {
            id: place.id().unwrap_or("(no id)").to_string(),
            title: place.title().to_string(),
            uri: place.uri().map(str::to_string),
        }
    }
}

/// What `scan` reports about a walked tree.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub files: usize,
    pub records: usize,
    pub watermark: Option<String>,
    pub latest: Vec<PlaceSummary>,
}

/// What a single index query reports.
#[derive(Debug, Serialize)]
pub struct QueryReport {
    pub index: &'static str,
    pub value: Option<String>,
    pub hits: usize,
    pub places: Vec<PlaceSummary>,
}

/// Format a scan report.
pub fn format_scan(report: &ScanReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(report).unwrap(),
        OutputMode::Human => {
            let mut lines = Vec::new();
            lines.push(format!(
                "Scanned {} files under {}",
                report.files, report.root
            ));
            lines.push(format!("{} records indexed", report.records));
            match &report.watermark {
                Some(day) => lines.push(format!("Freshest day: {}", day)),
                None => lines.push("Freshest day: (none)".to_string()),
            }
            for place in &report.latest {
                lines.push(summary_line(place));
            }
            lines.join("\n")
        }
    }
}

/// Format a query report.
pub fn format_query(report: &QueryReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(report).unwrap(),
        OutputMode::Human => {
            if report.places.is_empty() {
                return "(none)".to_string();
            }
            report
                .places
                .iter()
                .map(summary_line)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

/// Format an error.
pub fn format_error(err: &impl std::fmt::Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": format!("{}", err)
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

fn summary_line(place: &PlaceSummary) -> String {
    match &place.uri {
        Some(uri) => format!("{}  {}  <{}>", place.id, place.title, uri),
        None => format!("{}  {}", place.id, place.title),
    }
}
