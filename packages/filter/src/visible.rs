//! Pure visibility derivation.
//!
//! The map consumes [`map_visible`]; the charts render the whole dataset and
//! consume [`chart_emphasis`] to decide which bars and points stay at full
//! opacity. Both are recomputed from scratch on every read, so no view holds
//! derived state.

use std::collections::BTreeSet;

use sinkhole_map_dataset::IncidentDataset;
use sinkhole_map_incident_models::Incident;

use crate::FilterState;

/// The plain filter predicate, before selection and reset overrides.
///
/// Records with missing or unparseable depth or area are excluded from
/// range-filtered views rather than treated as matching.
#[must_use]
pub fn passes_filters(incident: &Incident, state: &FilterState) -> bool {
    let Some(depth) = incident.depth else {
        return false;
    };
    if depth < state.depth_range.0 || depth > state.depth_range.1 {
        return false;
    }

    let Some(area) = incident.area else {
        return false;
    };
    if area < state.area_range.0 || area > state.area_range.1 {
        return false;
    }

    // Cause selection is conjunctive: the incident must carry every one.
    if !state.selected_causes.is_empty()
        && !state
            .selected_causes
            .iter()
            .all(|cause| incident.causes.iter().any(|c| c == cause))
    {
        return false;
    }

    if !state.selected_months.is_empty() {
        let Some(month) = &incident.month else {
            return false;
        };
        if !state.selected_months.contains(month) {
            return false;
        }
    }

    if let Some((start, end)) = &state.date_range {
        let Some(date) = &incident.date else {
            return false;
        };
        if date < start || date > end {
            return false;
        }
    }

    if state.toggles.show_rain_only && !incident.has_rain() {
        return false;
    }
    if state.toggles.show_unrepaired_only && incident.is_repaired() {
        return false;
    }
    if state.toggles.show_damaged_only && !incident.has_damage() {
        return false;
    }

    true
}

/// Incidents passing the predicate within the current district scope.
#[must_use]
pub fn visible_incidents<'a>(
    dataset: &'a IncidentDataset,
    state: &FilterState,
) -> Vec<&'a Incident> {
    dataset
        .records()
        .iter()
        .filter(|incident| {
            passes_filters(incident, state) && state.selected_district.covers(&incident.district)
        })
        .collect()
}

/// What the map renders. A single selection trumps every filter; a fresh
/// reset keeps the map empty until the user acts; out-of-scope districts
/// are hidden, not dimmed.
#[must_use]
pub fn map_visible<'a>(dataset: &'a IncidentDataset, state: &FilterState) -> Vec<&'a Incident> {
    if let Some(sago_no) = &state.selected_incident {
        return dataset.get(sago_no).into_iter().collect();
    }
    if state.is_reset {
        return Vec::new();
    }
    visible_incidents(dataset, state)
}

/// Incident numbers rendered at full opacity on the charts. Charts always
/// draw the whole dataset; everything outside this set is dimmed.
#[must_use]
pub fn chart_emphasis<'a>(dataset: &'a IncidentDataset, state: &FilterState) -> BTreeSet<&'a str> {
    if let Some(sago_no) = &state.selected_incident {
        return dataset
            .get(sago_no)
            .map(|incident| incident.sago_no.as_str())
            .into_iter()
            .collect();
    }
    if state.is_reset {
        return dataset
            .records()
            .iter()
            .map(|incident| incident.sago_no.as_str())
            .collect();
    }
    visible_incidents(dataset, state)
        .into_iter()
        .map(|incident| incident.sago_no.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::DistrictSelection;

    use super::*;

    fn incident(sago_no: &str, district: &str, depth: f64, area: f64) -> Incident {
        Incident {
            sago_no: sago_no.to_string(),
            latitude: 37.55,
            longitude: 126.97,
            district: district.to_string(),
            address: None,
            date: Some("20210305".to_string()),
            month: Some("03".to_string()),
            width: Some(2.0),
            length: Some(3.0),
            depth: Some(depth),
            area: Some(area),
            causes: vec!["강관 손상".to_string()],
            death_cnt: 0,
            injury_cnt: 0,
            vehicle_cnt: 0,
            repair_status: "복구완료".to_string(),
            rainfall_mm: None,
        }
    }

    fn active_state(dataset: &IncidentDataset) -> FilterState {
        let mut state = FilterState::initial(dataset);
        state.is_reset = false;
        state
    }

    #[test]
    fn range_filters_are_inclusive_and_exclude_missing() {
        let dataset = IncidentDataset::new(vec![
            incident("A", "서대문구", 3.5, 12.0),
            Incident {
                depth: None,
                ..incident("B", "서대문구", 0.0, 12.0)
            },
        ]);
        let mut state = active_state(&dataset);
        state.depth_range = (0.0, 5.0);
        state.area_range = (0.0, 20.0);

        let visible = visible_incidents(&dataset, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sago_no, "A");

        state.depth_range = (4.0, 5.0);
        assert!(visible_incidents(&dataset, &state).is_empty());

        state.depth_range = (3.5, 5.0);
        assert_eq!(visible_incidents(&dataset, &state).len(), 1);
    }

    #[test]
    fn visible_incidents_is_idempotent() {
        let dataset = IncidentDataset::new(vec![
            incident("A", "서대문구", 3.5, 12.0),
            incident("B", "강남구", 1.0, 4.0),
        ]);
        let mut state = active_state(&dataset);
        state.selected_causes.insert("강관 손상".to_string());

        let first: Vec<String> = visible_incidents(&dataset, &state)
            .iter()
            .map(|i| i.sago_no.clone())
            .collect();
        let second: Vec<String> = visible_incidents(&dataset, &state)
            .iter()
            .map(|i| i.sago_no.clone())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, vec!["A", "B"]);
    }

    #[test]
    fn cause_selection_requires_every_cause() {
        let mut both = incident("A", "서대문구", 3.5, 12.0);
        both.causes.push("하수관 손상".to_string());
        let dataset = IncidentDataset::new(vec![both, incident("B", "강남구", 1.0, 4.0)]);
        let mut state = active_state(&dataset);
        state.selected_causes.insert("강관 손상".to_string());
        state.selected_causes.insert("하수관 손상".to_string());

        let visible = visible_incidents(&dataset, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sago_no, "A");
    }

    #[test]
    fn month_selection_excludes_undated_incidents() {
        let mut undated = incident("B", "서대문구", 1.0, 4.0);
        undated.date = None;
        undated.month = None;
        let dataset = IncidentDataset::new(vec![incident("A", "서대문구", 3.5, 12.0), undated]);
        let mut state = active_state(&dataset);
        state.selected_months.insert("03".to_string());

        let visible = visible_incidents(&dataset, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sago_no, "A");
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let dataset = IncidentDataset::new(vec![incident("A", "서대문구", 3.5, 12.0)]);
        let mut state = active_state(&dataset);

        state.date_range = Some(("20210305".to_string(), "20210305".to_string()));
        assert_eq!(visible_incidents(&dataset, &state).len(), 1);

        state.date_range = Some(("20210306".to_string(), "20211231".to_string()));
        assert!(visible_incidents(&dataset, &state).is_empty());
    }

    #[test]
    fn damage_toggle_needs_a_nonzero_count() {
        let mut damaged = incident("B", "강남구", 1.0, 4.0);
        damaged.injury_cnt = 1;
        let dataset = IncidentDataset::new(vec![incident("A", "서대문구", 3.5, 12.0), damaged]);
        let mut state = active_state(&dataset);
        state.toggles.show_damaged_only = true;

        let visible = visible_incidents(&dataset, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sago_no, "B");
    }

    #[test]
    fn rain_and_repair_toggles_filter() {
        let mut rained = incident("A", "서대문구", 3.5, 12.0);
        rained.rainfall_mm = Some(4.5);
        let mut dry_unrepaired = incident("B", "강남구", 1.0, 4.0);
        dry_unrepaired.rainfall_mm = Some(0.0);
        dry_unrepaired.repair_status = "복구중".to_string();
        let dataset = IncidentDataset::new(vec![rained, dry_unrepaired]);

        let mut state = active_state(&dataset);
        state.toggles.show_rain_only = true;
        let visible = visible_incidents(&dataset, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sago_no, "A");

        let mut state = active_state(&dataset);
        state.toggles.show_unrepaired_only = true;
        let visible = visible_incidents(&dataset, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].sago_no, "B");
    }

    #[test]
    fn district_scope_hides_on_map_and_dims_on_charts() {
        let dataset = IncidentDataset::new(vec![
            incident("A", "서대문구", 3.5, 12.0),
            incident("B", "강남구", 1.0, 4.0),
        ]);
        let mut state = active_state(&dataset);
        state.selected_district = DistrictSelection::Named {
            name: "서대문구".to_string(),
        };

        let on_map = map_visible(&dataset, &state);
        assert_eq!(on_map.len(), 1);
        assert_eq!(on_map[0].sago_no, "A");

        let emphasized = chart_emphasis(&dataset, &state);
        assert!(emphasized.contains("A"));
        assert!(!emphasized.contains("B"));
    }

    #[test]
    fn selection_overrides_every_filter() {
        let dataset = IncidentDataset::new(vec![
            incident("A", "서대문구", 3.5, 12.0),
            incident("B", "강남구", 1.0, 4.0),
        ]);
        let mut state = active_state(&dataset);
        state.depth_range = (0.0, 0.5);
        state.selected_incident = Some("A".to_string());

        let on_map = map_visible(&dataset, &state);
        assert_eq!(on_map.len(), 1);
        assert_eq!(on_map[0].sago_no, "A");

        let emphasized = chart_emphasis(&dataset, &state);
        assert_eq!(emphasized.iter().copied().collect::<Vec<_>>(), vec!["A"]);
    }

    #[test]
    fn reset_empties_the_map_but_emphasizes_every_chart_mark() {
        let dataset = IncidentDataset::new(vec![
            incident("A", "서대문구", 3.5, 12.0),
            incident("B", "강남구", 1.0, 4.0),
        ]);
        let state = FilterState::initial(&dataset);

        assert!(map_visible(&dataset, &state).is_empty());
        assert_eq!(chart_emphasis(&dataset, &state).len(), 2);
    }
}
