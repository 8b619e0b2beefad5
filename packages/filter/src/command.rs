//! User intents as an explicit command enum.
//!
//! Every interaction the dashboard can produce is one [`Command`] variant,
//! so all state transitions are enumerable and testable away from any
//! rendering. The serde shape is the `POST /api/session/commands` body.

use serde::{Deserialize, Serialize};

use crate::DistrictSelection;

/// Which numeric range a `SetRange` command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// The depth filter, in meters.
    Depth,
    /// The area filter, in square meters.
    Area,
}

/// Which checkbox a `SetToggle` command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewToggle {
    /// Only incidents with rain on the occurrence date.
    RainOnly,
    /// Only incidents whose restoration is not finished.
    UnrepairedOnly,
    /// Only incidents with casualties or vehicle damage.
    DamagedOnly,
}

/// A user intent to be applied by the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Select an incident (or clear the selection with `null`), deriving
    /// cause/month filters from it on a chart-originated selection.
    SelectIncident {
        /// Incident number, or `null` to clear.
        sago_no: Option<String>,
    },
    /// Toggle one cause label in the multi-select.
    ToggleCause {
        /// Cause label as produced by the normalizer.
        cause: String,
    },
    /// Toggle one 2-digit month in the multi-select.
    ToggleMonth {
        /// Two-digit month string (`"01"`-`"12"`).
        month: String,
    },
    /// Overwrite the depth or area range.
    SetRange {
        /// Which range to overwrite.
        kind: RangeKind,
        /// Inclusive lower bound.
        lo: f64,
        /// Inclusive upper bound.
        hi: f64,
    },
    /// Overwrite one checkbox toggle.
    SetToggle {
        /// Which checkbox to overwrite.
        toggle: ViewToggle,
        /// New checkbox value.
        value: bool,
    },
    /// Overwrite the district scope.
    PickDistrict {
        /// New district scope.
        district: DistrictSelection,
    },
    /// Overwrite the date filter. `null` clears it.
    SetDateRange {
        /// Inclusive `[start, end]` pair of 8-digit dates, or `null`.
        range: Option<(String, String)>,
    },
    /// Restore the startup state.
    Reset,
    /// A map marker click: display-only selection, filter-inert.
    MapMarkerClicked {
        /// Incident number under the marker.
        sago_no: String,
    },
    /// A scatter-plot point click: same display-only semantics as a map
    /// marker click, issued from the chart panel.
    ScatterPointClicked {
        /// Incident number behind the point.
        sago_no: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_select_incident() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "select_incident",
            "sago_no": "20230042"
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::SelectIncident {
                sago_no: Some("20230042".to_string())
            }
        );
    }

    #[test]
    fn deserializes_clear_selection() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "select_incident",
            "sago_no": null
        }))
        .unwrap();
        assert_eq!(command, Command::SelectIncident { sago_no: None });
    }

    #[test]
    fn deserializes_set_range() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "set_range",
            "kind": "depth",
            "lo": 0.0,
            "hi": 5.0
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::SetRange {
                kind: RangeKind::Depth,
                lo: 0.0,
                hi: 5.0
            }
        );
    }

    #[test]
    fn deserializes_pick_district() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "pick_district",
            "district": {"type": "named", "name": "서대문구"}
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::PickDistrict {
                district: DistrictSelection::Named {
                    name: "서대문구".to_string()
                }
            }
        );
    }

    #[test]
    fn deserializes_date_range_and_reset() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "set_date_range",
            "range": ["20210101", "20211231"]
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::SetDateRange {
                range: Some(("20210101".to_string(), "20211231".to_string()))
            }
        );

        let command: Command =
            serde_json::from_value(serde_json::json!({"type": "reset"})).unwrap();
        assert_eq!(command, Command::Reset);
    }

    #[test]
    fn deserializes_toggle_commands() {
        let command: Command = serde_json::from_value(serde_json::json!({
            "type": "set_toggle",
            "toggle": "rain_only",
            "value": true
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::SetToggle {
                toggle: ViewToggle::RainOnly,
                value: true
            }
        );
    }
}
