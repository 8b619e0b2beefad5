#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared dashboard filter state, reconciler, and derivations.
//!
//! Every view of the dashboard (map, chart panel, info panel) renders from
//! one [`FilterState`]. User intents arrive as [`command::Command`]s and go
//! through [`reconcile::apply`], the only writer of the state; the views
//! then re-derive their visible and emphasized subsets through the pure
//! functions in [`visible`] and [`charts`]. Nothing here performs I/O.

pub mod charts;
pub mod command;
pub mod reconcile;
pub mod visible;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sinkhole_map_dataset::IncidentDataset;
use strum_macros::{AsRefStr, Display, EnumString};

/// Which view produced the current incident selection.
///
/// A map-originated click is a pure "show info" action and must not touch
/// the cause/month filters; this tag breaks that circular-update ambiguity.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OriginSource {
    /// Selection came from a map marker click.
    Map,
    /// Selection came from a chart element click.
    Chart,
    /// No in-flight selection origin.
    #[default]
    None,
}

/// The district scope of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistrictSelection {
    /// No district chosen yet.
    #[default]
    None,
    /// The explicit "every district" choice.
    All,
    /// One named district.
    Named {
        /// District (구) name.
        name: String,
    },
}

impl DistrictSelection {
    /// Whether an incident in the given district falls inside this scope.
    ///
    /// A named district hides out-of-district incidents from the map; the
    /// chart panel is where everything stays visible (dimmed).
    #[must_use]
    pub fn covers(&self, district: &str) -> bool {
        match self {
            Self::None | Self::All => true,
            Self::Named { name } => name == district,
        }
    }
}

/// The three map checkbox toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewToggles {
    /// Show only incidents with measurable rain on the occurrence date.
    pub show_rain_only: bool,
    /// Show only incidents whose restoration is not finished.
    pub show_unrepaired_only: bool,
    /// Show only incidents with deaths, injuries, or vehicle damage.
    pub show_damaged_only: bool,
}

/// The shared filter state, the dashboard's single source of truth.
///
/// Mutated only through [`reconcile::apply`]; serialized as the session
/// wire shape (`GET /api/session`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Incident number of the single selected incident, if any.
    pub selected_incident: Option<String>,
    /// Multi-selected cause labels. An incident must match all of them.
    pub selected_causes: BTreeSet<String>,
    /// Multi-selected 2-digit months.
    pub selected_months: BTreeSet<String>,
    /// Inclusive depth filter in meters.
    pub depth_range: (f64, f64),
    /// Inclusive area filter in square meters.
    pub area_range: (f64, f64),
    /// Inclusive 8-digit date filter, or no date filtering.
    pub date_range: Option<(String, String)>,
    /// District scope.
    pub selected_district: DistrictSelection,
    /// Checkbox toggles.
    pub toggles: ViewToggles,
    /// Which view produced the current selection.
    pub origin_source: OriginSource,
    /// True only immediately after an explicit reset; keeps the map empty
    /// until the user acts again.
    pub is_reset: bool,
}

impl FilterState {
    /// The startup state for a dataset: nothing selected, ranges spanning
    /// the full dataset extent, and the map held empty by `is_reset`.
    #[must_use]
    pub fn initial(dataset: &IncidentDataset) -> Self {
        Self {
            selected_incident: None,
            selected_causes: BTreeSet::new(),
            selected_months: BTreeSet::new(),
            depth_range: dataset.depth_bounds(),
            area_range: dataset.area_bounds(),
            date_range: None,
            selected_district: DistrictSelection::None,
            toggles: ViewToggles::default(),
            origin_source: OriginSource::None,
            is_reset: true,
        }
    }
}
