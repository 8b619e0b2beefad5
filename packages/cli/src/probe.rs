//! Route proximity probe.
//!
//! Searches for a start and a destination place, requests a car route
//! between them, and prints every incident within the chosen radius of
//! the route, nearest first.

use dialoguer::{Input, Password, Select};
use sinkhole_map_dataset::IncidentDataset;
use sinkhole_map_directions::{PlaceCandidate, kakao};
use sinkhole_map_route::{RADIUS_DEFAULT_M, RoutePoint, hazards_along_route, snap_radius};

/// Reads the Kakao REST API key from the environment, prompting when it
/// is missing.
fn api_key() -> String {
    std::env::var("KAKAO_REST_API_KEY").unwrap_or_else(|_| {
        Password::new()
            .with_prompt("Kakao REST API key")
            .allow_empty_password(true)
            .interact()
            .unwrap_or_default()
    })
}

/// Prompts for a keyword and has the user pick one of the matching
/// places. Returns `None` when the search comes back empty.
#[allow(clippy::future_not_send)]
async fn pick_place(
    client: &reqwest::Client,
    api_key: &str,
    prompt: &str,
) -> Result<Option<PlaceCandidate>, Box<dyn std::error::Error>> {
    let query: String = Input::new().with_prompt(prompt).interact_text()?;

    let candidates =
        kakao::search_places(client, kakao::PLACE_SEARCH_URL, api_key, &query).await?;
    if candidates.is_empty() {
        println!("No places found for \"{query}\".");
        return Ok(None);
    }

    let labels: Vec<String> = candidates
        .iter()
        .map(|place| format!("{} ({})", place.name, place.address))
        .collect();

    let idx = Select::new()
        .with_prompt("Which place?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(Some(candidates[idx].clone()))
}

/// Runs the route probe against the loaded dataset.
///
/// # Errors
///
/// Returns an error if a prompt fails or a directions request fails.
#[allow(clippy::future_not_send)]
pub async fn run(dataset: &IncidentDataset) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = api_key();
    let client = reqwest::Client::new();

    let Some(origin) = pick_place(&client, &api_key, "Start keyword").await? else {
        return Ok(());
    };
    let Some(destination) = pick_place(&client, &api_key, "Destination keyword").await? else {
        return Ok(());
    };

    let radius_input: String = Input::new()
        .with_prompt("Search radius in meters")
        .default(format!("{RADIUS_DEFAULT_M}"))
        .interact_text()?;
    let radius_m = snap_radius(radius_input.parse().unwrap_or(RADIUS_DEFAULT_M));

    let polyline = kakao::car_route(
        &client,
        kakao::DIRECTIONS_URL,
        &api_key,
        RoutePoint::new(origin.lat, origin.lng),
        RoutePoint::new(destination.lat, destination.lng),
    )
    .await?;

    let hazards = hazards_along_route(dataset.records(), &polyline, radius_m);

    println!();
    println!(
        "{} incidents within {radius_m} m of the route ({} vertices)",
        hazards.len(),
        polyline.len()
    );
    for hazard in &hazards {
        println!(
            "  {:>7.1} m  {}  {} ({})",
            hazard.distance_m,
            hazard.incident.sago_no,
            hazard.incident.district,
            hazard.incident.date.as_deref().unwrap_or("date unknown"),
        );
    }

    Ok(())
}
