//! Dataset summary tool.
//!
//! Prints the headline numbers a quick sanity check needs: record count,
//! date span, size extents, repair progress, the most frequent causes,
//! and the busiest districts.

use std::collections::BTreeMap;

use sinkhole_map_dataset::IncidentDataset;

/// Number of entries shown in each ranking.
const TOP_ENTRIES: usize = 10;

/// Counts label occurrences and returns them busiest first, ties in label
/// order.
fn ranked<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranking: Vec<(&str, usize)> = counts.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranking
}

/// Prints a summary of the loaded dataset.
pub fn run(dataset: &IncidentDataset) {
    println!();
    println!("Incidents: {}", dataset.len());

    if let Some((first, last)) = dataset.date_span() {
        println!("Date span: {first} .. {last}");
    }

    let (_, depth_max) = dataset.depth_bounds();
    let (_, area_max) = dataset.area_bounds();
    println!("Max depth: {depth_max} m, max area: {area_max} m²");

    let repaired = dataset
        .records()
        .iter()
        .filter(|incident| incident.is_repaired())
        .count();
    println!("Repaired: {repaired} of {}", dataset.len());

    let causes = ranked(
        dataset
            .records()
            .iter()
            .flat_map(|incident| incident.causes.iter().map(String::as_str)),
    );
    println!();
    println!("Most frequent causes:");
    for (cause, count) in causes.iter().take(TOP_ENTRIES) {
        println!("  {cause}: {count}");
    }

    let districts = ranked(
        dataset
            .records()
            .iter()
            .map(|incident| incident.district.as_str())
            .filter(|district| !district.is_empty()),
    );
    println!();
    println!("Busiest districts:");
    for (district, count) in districts.iter().take(TOP_ENTRIES) {
        println!("  {district}: {count}");
    }
}
