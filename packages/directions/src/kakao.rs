//! Kakao Local and Kakao Mobility REST clients.
//!
//! Both services authenticate with a `KakaoAK {key}` authorization header.
//! Place search resolves free-text keywords to coordinates; directions
//! returns the car route as per-road vertex lists that get flattened into
//! one polyline.
//!
//! See <https://developers.kakao.com/docs/latest/ko/local/dev-guide> and
//! <https://developers.kakaomobility.com/docs/navi-api/directions/>

use sinkhole_map_route::RoutePoint;

use crate::{DirectionsError, PlaceCandidate};

/// Keyword place search endpoint.
pub const PLACE_SEARCH_URL: &str = "https://dapi.kakao.com/v2/local/search/keyword.json";

/// Car directions endpoint.
pub const DIRECTIONS_URL: &str = "https://apis-navi.kakaomobility.com/v1/directions";

/// Searches places matching a free-text keyword, best match first.
///
/// A query the service recognizes but cannot match yields an empty list,
/// not an error.
///
/// # Errors
///
/// Returns [`DirectionsError`] if no API key is configured, or if the HTTP
/// request or response parsing fails.
pub async fn search_places(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<PlaceCandidate>, DirectionsError> {
    if api_key.is_empty() {
        return Err(DirectionsError::MissingApiKey);
    }

    let resp = client
        .get(base_url)
        .header("Authorization", format!("KakaoAK {api_key}"))
        .query(&[("query", query)])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(DirectionsError::RateLimited);
    }
    let resp = resp.error_for_status()?;

    let body: serde_json::Value = resp.json().await?;
    parse_places(&body)
}

/// Requests a car route and flattens it into one ordered polyline.
///
/// # Errors
///
/// Returns [`DirectionsError`] if no API key is configured, if the HTTP
/// request or response parsing fails, or if the service finds no route.
pub async fn car_route(
    client: &reqwest::Client,
    base_url: &str,
    api_key: &str,
    origin: RoutePoint,
    destination: RoutePoint,
) -> Result<Vec<RoutePoint>, DirectionsError> {
    if api_key.is_empty() {
        return Err(DirectionsError::MissingApiKey);
    }

    let resp = client
        .get(base_url)
        .header("Authorization", format!("KakaoAK {api_key}"))
        .query(&[
            ("origin", format!("{},{}", origin.lng, origin.lat)),
            ("destination", format!("{},{}", destination.lng, destination.lat)),
        ])
        .send()
        .await?;

    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(DirectionsError::RateLimited);
    }
    let resp = resp.error_for_status()?;

    let body: serde_json::Value = resp.json().await?;
    parse_route(&body)
}

/// Parses the keyword search response.
fn parse_places(body: &serde_json::Value) -> Result<Vec<PlaceCandidate>, DirectionsError> {
    let documents = body["documents"]
        .as_array()
        .ok_or_else(|| DirectionsError::Parse {
            message: "Place search response has no documents array".to_string(),
        })?;

    let mut candidates = Vec::with_capacity(documents.len());
    for document in documents {
        let id = document["id"].as_str().unwrap_or_default();
        let name = document["place_name"].as_str().unwrap_or_default();
        let lng = document["x"].as_str().and_then(|s| s.parse::<f64>().ok());
        let lat = document["y"].as_str().and_then(|s| s.parse::<f64>().ok());

        let (Some(lng), Some(lat)) = (lng, lat) else {
            log::warn!("Skipping place candidate {name:?} without coordinates");
            continue;
        };
        if name.is_empty() {
            log::warn!("Skipping unnamed place candidate at {lat},{lng}");
            continue;
        }

        // The road address is preferred; older places only carry a lot
        // address.
        let road_address = document["road_address_name"].as_str().unwrap_or_default();
        let address = if road_address.is_empty() {
            document["address_name"].as_str().unwrap_or_default()
        } else {
            road_address
        };

        candidates.push(PlaceCandidate {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            lat,
            lng,
        });
    }

    Ok(candidates)
}

/// Parses the directions response into the flattened vertex polyline.
fn parse_route(body: &serde_json::Value) -> Result<Vec<RoutePoint>, DirectionsError> {
    let routes = body["routes"]
        .as_array()
        .ok_or_else(|| DirectionsError::Parse {
            message: "Directions response has no routes array".to_string(),
        })?;

    let Some(route) = routes.first() else {
        return Err(DirectionsError::NoRoute);
    };

    // result_code 0 is the only success code the navi API documents.
    if let Some(code) = route["result_code"].as_i64()
        && code != 0
    {
        return Err(DirectionsError::NoRoute);
    }

    let sections = route["sections"].as_array().map_or(&[][..], Vec::as_slice);

    let mut polyline = Vec::new();
    for section in sections {
        let roads = section["roads"].as_array().map_or(&[][..], Vec::as_slice);
        for road in roads {
            let vertexes = road["vertexes"].as_array().map_or(&[][..], Vec::as_slice);
            // Vertexes come as a flat lng,lat,lng,lat list; a trailing
            // unpaired value is dropped.
            for pair in vertexes.chunks_exact(2) {
                let (Some(lng), Some(lat)) = (pair[0].as_f64(), pair[1].as_f64()) else {
                    continue;
                };
                polyline.push(RoutePoint::new(lat, lng));
            }
        }
    }

    if polyline.is_empty() {
        return Err(DirectionsError::NoRoute);
    }
    Ok(polyline)
}
