//! Chart aggregates.
//!
//! Charts draw the entire dataset no matter what is filtered; emphasis flags
//! carry the dim/highlight split instead. Each builder takes the emphasis set
//! from [`crate::visible::chart_emphasis`] indirectly through the state.

use std::collections::BTreeMap;

use serde::Serialize;
use sinkhole_map_dataset::IncidentDataset;

use crate::FilterState;
use crate::visible::chart_emphasis;

/// One bar of the cause-frequency chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CauseBar {
    pub cause: String,
    pub count: usize,
    pub emphasized: bool,
}

/// One bar of the monthly-incident chart. Always twelve, "01" through "12".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBar {
    pub month: String,
    pub count: usize,
    pub emphasized: bool,
}

/// One point of the width-versus-depth scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub sago_no: String,
    pub width: f64,
    pub depth: f64,
    pub emphasized: bool,
}

/// One district of the choropleth, with intensity scaled to the busiest
/// district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictCount {
    pub district: String,
    pub count: usize,
    pub intensity: f64,
}

/// Counts incidents per cause over the whole dataset, busiest first, ties
/// broken by label. A bar is emphasized when any emphasized incident
/// carries its cause.
#[must_use]
pub fn cause_frequencies(dataset: &IncidentDataset, state: &FilterState) -> Vec<CauseBar> {
    let emphasis = chart_emphasis(dataset, state);
    let mut counts: BTreeMap<&str, (usize, bool)> = BTreeMap::new();

    for incident in dataset.records() {
        let emphasized = emphasis.contains(incident.sago_no.as_str());
        for cause in &incident.causes {
            let entry = counts.entry(cause.as_str()).or_insert((0, false));
            entry.0 += 1;
            entry.1 |= emphasized;
        }
    }

    let mut bars: Vec<CauseBar> = counts
        .into_iter()
        .map(|(cause, (count, emphasized))| CauseBar {
            cause: cause.to_string(),
            count,
            emphasized,
        })
        .collect();
    bars.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.cause.cmp(&b.cause)));
    bars
}

/// Counts incidents per calendar month over the whole dataset. Months with
/// no incidents still get a zero bar so the axis stays stable.
#[must_use]
pub fn month_frequencies(dataset: &IncidentDataset, state: &FilterState) -> Vec<MonthBar> {
    let emphasis = chart_emphasis(dataset, state);
    let mut bars: Vec<MonthBar> = (1..=12)
        .map(|m| MonthBar {
            month: format!("{m:02}"),
            count: 0,
            emphasized: false,
        })
        .collect();

    for incident in dataset.records() {
        let Some(month) = &incident.month else {
            continue;
        };
        let Some(bar) = bars.iter_mut().find(|bar| &bar.month == month) else {
            continue;
        };
        bar.count += 1;
        bar.emphasized |= emphasis.contains(incident.sago_no.as_str());
    }

    bars
}

/// Width-versus-depth points for every incident carrying both dimensions.
#[must_use]
pub fn scatter_points(dataset: &IncidentDataset, state: &FilterState) -> Vec<ScatterPoint> {
    let emphasis = chart_emphasis(dataset, state);
    dataset
        .records()
        .iter()
        .filter_map(|incident| {
            let width = incident.width?;
            let depth = incident.depth?;
            Some(ScatterPoint {
                sago_no: incident.sago_no.clone(),
                width,
                depth,
                emphasized: emphasis.contains(incident.sago_no.as_str()),
            })
        })
        .collect()
}

/// Incident counts per district with choropleth intensity in `0.0..=1.0`,
/// scaled so the busiest district is 1. Districts are unknown to this crate
/// beyond the names the dataset carries.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn district_counts(dataset: &IncidentDataset) -> Vec<DistrictCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for incident in dataset.records() {
        if incident.district.is_empty() {
            continue;
        }
        *counts.entry(incident.district.as_str()).or_insert(0) += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    counts
        .into_iter()
        .map(|(district, count)| DistrictCount {
            district: district.to_string(),
            count,
            intensity: if max == 0 {
                0.0
            } else {
                count as f64 / max as f64
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use sinkhole_map_incident_models::Incident;

    use crate::DistrictSelection;

    use super::*;

    fn incident(sago_no: &str, district: &str, month: &str, causes: &[&str]) -> Incident {
        Incident {
            sago_no: sago_no.to_string(),
            latitude: 37.55,
            longitude: 126.97,
            district: district.to_string(),
            address: None,
            date: Some(format!("2021{month}15")),
            month: Some(month.to_string()),
            width: Some(2.0),
            length: None,
            depth: Some(1.5),
            area: Some(6.0),
            causes: causes.iter().map(ToString::to_string).collect(),
            death_cnt: 0,
            injury_cnt: 0,
            vehicle_cnt: 0,
            repair_status: String::new(),
            rainfall_mm: None,
        }
    }

    fn dataset() -> IncidentDataset {
        IncidentDataset::new(vec![
            incident("A", "서대문구", "03", &["강관 손상"]),
            incident("B", "서대문구", "03", &["강관 손상", "하수관 손상"]),
            incident("C", "강남구", "07", &["하수관 손상"]),
        ])
    }

    fn active_state(dataset: &IncidentDataset) -> FilterState {
        let mut state = FilterState::initial(dataset);
        state.is_reset = false;
        state
    }

    #[test]
    fn cause_bars_count_whole_dataset_busiest_first() {
        let dataset = dataset();
        let bars = cause_frequencies(&dataset, &active_state(&dataset));

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].cause, "강관 손상");
        assert_eq!(bars[0].count, 2);
        assert_eq!(bars[1].cause, "하수관 손상");
        assert_eq!(bars[1].count, 2);
        assert!(bars.iter().all(|bar| bar.emphasized));
    }

    #[test]
    fn district_scope_dims_bars_without_changing_counts() {
        let dataset = dataset();
        let mut state = active_state(&dataset);
        state.selected_district = DistrictSelection::Named {
            name: "강남구".to_string(),
        };

        let bars = cause_frequencies(&dataset, &state);
        let steel = bars.iter().find(|bar| bar.cause == "강관 손상").unwrap();
        let sewer = bars.iter().find(|bar| bar.cause == "하수관 손상").unwrap();

        assert_eq!(steel.count, 2);
        assert!(!steel.emphasized);
        assert_eq!(sewer.count, 2);
        assert!(sewer.emphasized);
    }

    #[test]
    fn month_bars_span_the_calendar() {
        let dataset = dataset();
        let bars = month_frequencies(&dataset, &active_state(&dataset));

        assert_eq!(bars.len(), 12);
        assert_eq!(bars[0].month, "01");
        assert_eq!(bars[11].month, "12");
        assert_eq!(bars[2].count, 2);
        assert_eq!(bars[6].count, 1);
        assert_eq!(bars[0].count, 0);
        assert!(!bars[0].emphasized);
    }

    #[test]
    fn selection_emphasizes_a_single_point() {
        let dataset = dataset();
        let mut state = active_state(&dataset);
        state.selected_incident = Some("C".to_string());

        let points = scatter_points(&dataset, &state);
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.emphasized == (p.sago_no == "C")));

        let bars = month_frequencies(&dataset, &state);
        assert!(bars[6].emphasized);
        assert!(!bars[2].emphasized);
    }

    #[test]
    fn scatter_skips_incidents_missing_dimensions() {
        let mut no_width = incident("D", "강남구", "08", &[]);
        no_width.width = None;
        let dataset = IncidentDataset::new(vec![incident("A", "서대문구", "03", &[]), no_width]);

        let points = scatter_points(&dataset, &active_state(&dataset));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].sago_no, "A");
    }

    #[test]
    fn choropleth_intensity_scales_to_busiest_district() {
        let dataset = dataset();
        let counts = district_counts(&dataset);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].district, "강남구");
        assert_eq!(counts[0].count, 1);
        assert!((counts[0].intensity - 0.5).abs() < f64::EPSILON);
        assert_eq!(counts[1].district, "서대문구");
        assert!((counts[1].intensity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_dataset_has_no_choropleth_entries() {
        let dataset = IncidentDataset::new(Vec::new());
        assert!(district_counts(&dataset).is_empty());
    }
}
