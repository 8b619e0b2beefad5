#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Sinkhole incident dataset loading and normalization.
//!
//! Reads the raw Seoul open-data JSON export, normalizes each record into an
//! [`Incident`], and serves the result as an immutable in-memory
//! [`IncidentDataset`]. All tolerance for the feed's messiness lives in
//! [`parsing`] and [`normalize`]; everything downstream sees clean records.

pub mod manifest;
pub mod normalize;
pub mod parsing;

use std::collections::BTreeMap;
use std::path::Path;

use sinkhole_map_incident_models::Incident;

/// Errors that can occur while loading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML manifest parsing failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document did not have the expected record-array shape.
    #[error("Unexpected document shape: {message}")]
    Shape {
        /// Description of what was expected.
        message: String,
    },
}

/// The full normalized incident dataset, loaded once at startup.
///
/// Records keep feed order; the incident-number index points back into that
/// order. Duplicate incident numbers keep the first occurrence.
#[derive(Debug, Clone)]
pub struct IncidentDataset {
    records: Vec<Incident>,
    by_sago_no: BTreeMap<String, usize>,
    depth_bounds: (f64, f64),
    area_bounds: (f64, f64),
}

impl IncidentDataset {
    /// Builds a dataset from normalized records.
    #[must_use]
    pub fn new(records: Vec<Incident>) -> Self {
        let mut by_sago_no: BTreeMap<String, usize> = BTreeMap::new();
        for (index, incident) in records.iter().enumerate() {
            if by_sago_no.contains_key(&incident.sago_no) {
                log::warn!("Duplicate incident number {} in feed", incident.sago_no);
            } else {
                by_sago_no.insert(incident.sago_no.clone(), index);
            }
        }

        let depth_bounds = value_bounds(records.iter().filter_map(|i| i.depth));
        let area_bounds = value_bounds(records.iter().filter_map(|i| i.area));

        Self {
            records,
            by_sago_no,
            depth_bounds,
            area_bounds,
        }
    }

    /// All records in feed order.
    #[must_use]
    pub fn records(&self) -> &[Incident] {
        &self.records
    }

    /// Looks up an incident by its incident number.
    #[must_use]
    pub fn get(&self, sago_no: &str) -> Option<&Incident> {
        self.by_sago_no
            .get(sago_no)
            .and_then(|&index| self.records.get(index))
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Full depth extent as `(0.0, ceil(max))`, the default depth-range
    /// filter. `(0.0, 0.0)` when no record has a parsed depth.
    #[must_use]
    pub const fn depth_bounds(&self) -> (f64, f64) {
        self.depth_bounds
    }

    /// Full area extent as `(0.0, ceil(max))`, the default area-range
    /// filter. `(0.0, 0.0)` when no record has a parsed area.
    #[must_use]
    pub const fn area_bounds(&self) -> (f64, f64) {
        self.area_bounds
    }

    /// Earliest and latest 8-digit occurrence dates in the dataset.
    #[must_use]
    pub fn date_span(&self) -> Option<(&str, &str)> {
        let mut dates = self.records.iter().filter_map(|i| i.date.as_deref());
        let first = dates.next()?;
        let (min, max) = dates.fold((first, first), |(min, max), date| {
            (min.min(date), max.max(date))
        });
        Some((min, max))
    }
}

fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let max = values.fold(None, |acc: Option<f64>, v| {
        Some(acc.map_or(v, |m| m.max(v)))
    });
    (0.0, max.map_or(0.0, f64::ceil))
}

/// Walks a dot-separated path into a JSON document.
fn resolve_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a serde_json::Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(current)
}

/// Extracts the record array from a feed document, following the optional
/// dot-separated `records_path` for wrapped exports.
///
/// # Errors
///
/// Returns [`DatasetError::Shape`] when the path is missing or the value at
/// it is not an array.
pub fn extract_records(
    document: &serde_json::Value,
    records_path: Option<&str>,
) -> Result<Vec<serde_json::Value>, DatasetError> {
    let array_value = match records_path {
        Some(path) => resolve_path(document, path).ok_or_else(|| DatasetError::Shape {
            message: format!("document does not contain path '{path}'"),
        })?,
        None => document,
    };

    array_value
        .as_array()
        .cloned()
        .ok_or_else(|| DatasetError::Shape {
            message: "expected a JSON array of incident records".to_string(),
        })
}

/// Loads the raw record array from an incident feed file.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read, is not valid JSON,
/// or does not contain a record array at `records_path`.
pub fn load_raw_records(
    path: &Path,
    records_path: Option<&str>,
) -> Result<Vec<serde_json::Value>, DatasetError> {
    let text = std::fs::read_to_string(path)?;
    let document: serde_json::Value = serde_json::from_str(&text)?;
    extract_records(&document, records_path)
}

/// Loads and normalizes an incident feed file in one step.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_incidents(
    path: &Path,
    records_path: Option<&str>,
) -> Result<IncidentDataset, DatasetError> {
    let raw = load_raw_records(path, records_path)?;
    let incidents = normalize::normalize_records(&raw);
    log::info!(
        "Loaded {} incidents from {} raw records ({})",
        incidents.len(),
        raw.len(),
        path.display()
    );
    Ok(IncidentDataset::new(incidents))
}
