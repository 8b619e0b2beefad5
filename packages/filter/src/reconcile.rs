//! The selection reconciler: the only writer of [`FilterState`].
//!
//! Each public function is one named transition; [`apply`] dispatches a
//! [`Command`] to the matching transition. Precedence between single-incident
//! selection and the free multi-filters lives entirely here, so the views
//! never have to agree on anything but the derived subsets.

use sinkhole_map_dataset::IncidentDataset;

use crate::command::{Command, RangeKind, ViewToggle};
use crate::{DistrictSelection, FilterState, OriginSource};

/// Applies one command to the state.
pub fn apply(state: &mut FilterState, dataset: &IncidentDataset, command: &Command) {
    match command {
        Command::SelectIncident { sago_no } => {
            select_incident(state, dataset, sago_no.as_deref());
        }
        Command::ToggleCause { cause } => toggle_cause(state, cause),
        Command::ToggleMonth { month } => toggle_month(state, month),
        Command::SetRange { kind, lo, hi } => set_range(state, *kind, *lo, *hi),
        Command::SetToggle { toggle, value } => set_toggle(state, *toggle, *value),
        Command::PickDistrict { district } => pick_district(state, district.clone()),
        Command::SetDateRange { range } => set_date_range(state, range.clone()),
        Command::Reset => reset(state, dataset),
        Command::MapMarkerClicked { sago_no } => map_marker_clicked(state, dataset, sago_no),
        Command::ScatterPointClicked { sago_no } => {
            scatter_point_clicked(state, dataset, sago_no);
        }
    }
}

/// Selects an incident, clears the selection, or toggles it off.
///
/// With no incident number the selection and both incident-derived filters
/// are cleared. While `origin_source` is `Map` the call is a pure "show
/// info" action: the selection is set and the cause/month filters stay
/// untouched. Re-selecting the already-selected incident toggles it off.
/// Otherwise the selection is set and the cause/month filters are derived
/// from the incident. Unknown incident numbers are logged and ignored.
pub fn select_incident(state: &mut FilterState, dataset: &IncidentDataset, sago_no: Option<&str>) {
    let Some(sago_no) = sago_no else {
        state.selected_incident = None;
        state.selected_causes.clear();
        state.selected_months.clear();
        return;
    };

    if state.origin_source == OriginSource::Map {
        if dataset.get(sago_no).is_some() {
            state.selected_incident = Some(sago_no.to_string());
        } else {
            log::warn!("Ignoring selection of unknown incident {sago_no}");
        }
        return;
    }

    if state.selected_incident.as_deref() == Some(sago_no) {
        state.selected_incident = None;
        return;
    }

    let Some(incident) = dataset.get(sago_no) else {
        log::warn!("Ignoring selection of unknown incident {sago_no}");
        return;
    };

    state.selected_incident = Some(incident.sago_no.clone());
    state.selected_causes = incident.causes.iter().cloned().collect();
    state.selected_months = incident.month.iter().cloned().collect();
    state.origin_source = OriginSource::None;
}

/// Toggles one cause in the multi-select. Dismisses any single-incident
/// view: free filtering and single selection are exclusive modes.
pub fn toggle_cause(state: &mut FilterState, cause: &str) {
    state.selected_incident = None;
    state.origin_source = OriginSource::Chart;
    if !state.selected_causes.remove(cause) {
        state.selected_causes.insert(cause.to_string());
    }
}

/// Toggles one month in the multi-select. Same exclusivity as
/// [`toggle_cause`].
pub fn toggle_month(state: &mut FilterState, month: &str) {
    state.selected_incident = None;
    state.origin_source = OriginSource::Chart;
    if !state.selected_months.remove(month) {
        state.selected_months.insert(month.to_string());
    }
}

/// Overwrites the depth or area range. No other side effect.
pub const fn set_range(state: &mut FilterState, kind: RangeKind, lo: f64, hi: f64) {
    match kind {
        RangeKind::Depth => state.depth_range = (lo, hi),
        RangeKind::Area => state.area_range = (lo, hi),
    }
}

/// Overwrites one checkbox toggle. Toggles are multi-filter operations, so
/// any single-incident view is dismissed, matching [`toggle_cause`].
pub fn set_toggle(state: &mut FilterState, toggle: ViewToggle, value: bool) {
    match toggle {
        ViewToggle::RainOnly => state.toggles.show_rain_only = value,
        ViewToggle::UnrepairedOnly => state.toggles.show_unrepaired_only = value,
        ViewToggle::DamagedOnly => state.toggles.show_damaged_only = value,
    }
    state.selected_incident = None;
    state.origin_source = OriginSource::Chart;
}

/// Overwrites the district scope. The first district (or date) choice ends
/// the post-reset empty-map phase.
pub fn pick_district(state: &mut FilterState, district: DistrictSelection) {
    state.selected_district = district;
    state.is_reset = false;
}

/// Overwrites the date filter. Ends the post-reset empty-map phase.
pub fn set_date_range(state: &mut FilterState, range: Option<(String, String)>) {
    state.date_range = range;
    state.is_reset = false;
}

/// Restores the startup state.
pub fn reset(state: &mut FilterState, dataset: &IncidentDataset) {
    *state = FilterState::initial(dataset);
}

/// A map marker click: display-only selection that never mutates the
/// cause/month filters.
pub fn map_marker_clicked(state: &mut FilterState, dataset: &IncidentDataset, sago_no: &str) {
    display_only_select(state, dataset, sago_no);
}

/// A scatter-plot point click: identical display-only semantics, issued
/// from the chart panel so the map highlights the single point.
pub fn scatter_point_clicked(state: &mut FilterState, dataset: &IncidentDataset, sago_no: &str) {
    display_only_select(state, dataset, sago_no);
}

/// Runs the selection through the map-origin short circuit, then clears
/// the origin tag again.
fn display_only_select(state: &mut FilterState, dataset: &IncidentDataset, sago_no: &str) {
    state.origin_source = OriginSource::Map;
    select_incident(state, dataset, Some(sago_no));
    state.origin_source = OriginSource::None;
}
