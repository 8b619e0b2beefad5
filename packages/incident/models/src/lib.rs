#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Normalized sinkhole incident record types.
//!
//! This crate defines the canonical incident record shared across the entire
//! sinkhole-map system. The raw Seoul open-data feed is messy (numbers as
//! strings, pseudo-JSON cause lists, blank cells); `sinkhole_map_dataset`
//! normalizes each raw object into exactly one [`Incident`] at load time and
//! every other package consumes that shape.

use serde::{Deserialize, Serialize};

/// Marker substring present in the repair-status text once restoration work
/// has finished.
pub const REPAIR_COMPLETE_MARKER: &str = "완료";

/// A single normalized sinkhole incident.
///
/// Identity is the incident number (`sago_no`); all other fields are
/// best-effort extractions and may be absent when the source cell was blank
/// or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Unique incident number from the source feed.
    pub sago_no: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Administrative district (구) name, e.g. `서대문구`.
    pub district: String,
    /// Street address text from the source feed, when present.
    pub address: Option<String>,
    /// Occurrence date as the raw 8-digit `YYYYMMDD` string.
    pub date: Option<String>,
    /// Two-digit occurrence month derived from `date`. Not calendar
    /// validated; a malformed date keeps whatever sits in positions 5-6.
    pub month: Option<String>,
    /// Collapse width in meters.
    pub width: Option<f64>,
    /// Collapse length in meters.
    pub length: Option<f64>,
    /// Collapse depth in meters.
    pub depth: Option<f64>,
    /// Collapse area in square meters.
    pub area: Option<f64>,
    /// Normalized cause labels: trimmed, non-empty, first-seen order.
    pub causes: Vec<String>,
    /// Number of deaths.
    pub death_cnt: u32,
    /// Number of injuries.
    pub injury_cnt: u32,
    /// Number of damaged vehicles.
    pub vehicle_cnt: u32,
    /// Free-text repair status from the source feed.
    pub repair_status: String,
    /// Daily rainfall on the occurrence date, in millimeters.
    pub rainfall_mm: Option<f64>,
}

impl Incident {
    /// Whether restoration work on this incident has finished.
    #[must_use]
    pub fn is_repaired(&self) -> bool {
        self.repair_status.contains(REPAIR_COMPLETE_MARKER)
    }

    /// Whether measurable rain fell on the occurrence date.
    ///
    /// Zero and missing rainfall both count as "no rain".
    #[must_use]
    pub fn has_rain(&self) -> bool {
        self.rainfall_mm.is_some_and(|mm| mm > 0.0)
    }

    /// Total casualty and vehicle damage count.
    #[must_use]
    pub const fn total_damage(&self) -> u32 {
        self.death_cnt + self.injury_cnt + self.vehicle_cnt
    }

    /// Whether the incident caused any death, injury, or vehicle damage.
    #[must_use]
    pub const fn has_damage(&self) -> bool {
        self.total_damage() > 0
    }
}
