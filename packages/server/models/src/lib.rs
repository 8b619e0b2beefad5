#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the sinkhole map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the dataset record types to allow independent evolution of the API
//! contract.

use serde::{Deserialize, Serialize};
use sinkhole_map_directions::PlaceCandidate;
use sinkhole_map_filter::charts::{CauseBar, DistrictCount, MonthBar, ScatterPoint};
use sinkhole_map_incident_models::Incident;
use sinkhole_map_route::RoutePoint;
use sinkhole_map_weather::WeatherEntry;

/// A sinkhole incident as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIncident {
    /// Incident number from the national feed.
    pub sago_no: String,
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
    /// Administrative district name.
    pub district: String,
    /// Street address, when the feed carried one.
    pub address: Option<String>,
    /// 8-digit occurrence date.
    pub date: Option<String>,
    /// 2-digit occurrence month.
    pub month: Option<String>,
    /// Cavity width in meters.
    pub width: Option<f64>,
    /// Cavity length in meters.
    pub length: Option<f64>,
    /// Cavity depth in meters.
    pub depth: Option<f64>,
    /// Cavity area in square meters.
    pub area: Option<f64>,
    /// Normalized cause labels.
    pub causes: Vec<String>,
    /// Deaths.
    pub death_cnt: u32,
    /// Injuries.
    pub injury_cnt: u32,
    /// Damaged vehicles.
    pub vehicle_cnt: u32,
    /// Raw repair status text.
    pub repair_status: String,
    /// Whether the repair status marks the site as restored.
    pub repaired: bool,
    /// Combined death, injury, and vehicle count.
    pub total_damage: u32,
    /// Daily rainfall on the occurrence date in millimeters.
    pub rainfall_mm: Option<f64>,
}

impl From<&Incident> for ApiIncident {
    fn from(incident: &Incident) -> Self {
        Self {
            sago_no: incident.sago_no.clone(),
            latitude: incident.latitude,
            longitude: incident.longitude,
            district: incident.district.clone(),
            address: incident.address.clone(),
            date: incident.date.clone(),
            month: incident.month.clone(),
            width: incident.width,
            length: incident.length,
            depth: incident.depth,
            area: incident.area,
            causes: incident.causes.clone(),
            death_cnt: incident.death_cnt,
            injury_cnt: incident.injury_cnt,
            vehicle_cnt: incident.vehicle_cnt,
            repair_status: incident.repair_status.clone(),
            repaired: incident.is_repaired(),
            total_damage: incident.total_damage(),
            rainfall_mm: incident.rainfall_mm,
        }
    }
}

/// Response from the incident detail endpoint: the incident plus the
/// weather observed on its occurrence date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDetail {
    /// The incident record.
    pub incident: ApiIncident,
    /// Weather on the incident's date in its district, when known.
    pub weather: Option<ApiWeatherEntry>,
}

/// Query parameters for the incidents endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentQueryParams {
    /// Restrict to one district.
    pub district: Option<String>,
    /// Inclusive 8-digit start date.
    pub from: Option<String>,
    /// Inclusive 8-digit end date.
    pub to: Option<String>,
    /// Restrict to one 2-digit month.
    pub month: Option<String>,
    /// Restrict to incidents carrying this cause label.
    pub cause: Option<String>,
    /// Maximum number of results.
    pub limit: Option<usize>,
}

/// Query parameters for the district locate endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocateQueryParams {
    pub lat: f64,
    pub lng: f64,
}

/// Query parameters for the weather endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQueryParams {
    /// District the series is for.
    pub district: String,
    /// 8-digit end date of the series; defaults to today.
    pub date: Option<String>,
    /// Days of history ending at `date`; defaults to 30.
    pub days: Option<u64>,
}

/// A daily weather observation as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiWeatherEntry {
    /// 8-digit observation date.
    pub date: String,
    /// District the observation is attributed to.
    pub district: String,
    /// Daily average temperature in Celsius.
    pub avg_temp_c: Option<f64>,
    /// Daily rainfall in millimeters.
    pub rainfall_mm: Option<f64>,
}

impl From<&WeatherEntry> for ApiWeatherEntry {
    fn from(entry: &WeatherEntry) -> Self {
        Self {
            date: entry.date.clone(),
            district: entry.district.clone(),
            avg_temp_c: entry.avg_temp_c,
            rainfall_mm: entry.rainfall_mm,
        }
    }
}

/// Query parameters for the place search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceSearchParams {
    /// Free-text keyword.
    pub query: String,
}

/// A place candidate as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    /// Stable place identifier from the provider.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Road address, or lot address for places without one.
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<PlaceCandidate> for ApiPlace {
    fn from(place: PlaceCandidate) -> Self {
        Self {
            id: place.id,
            name: place.name,
            address: place.address,
            lat: place.lat,
            lng: place.lng,
        }
    }
}

/// Request body for the route hazards endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHazardsRequest {
    /// Route start.
    pub origin: RoutePoint,
    /// Route end.
    pub destination: RoutePoint,
    /// Requested proximity radius in meters; snapped to the slider
    /// positions server-side.
    pub radius_m: Option<f64>,
    /// Vertex count for the buffer polygons' outer rings.
    pub buffer_points: Option<usize>,
}

/// Response from the route hazards endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHazardsResponse {
    /// Flattened road polyline, empty when the directions call failed.
    pub route: Vec<RoutePoint>,
    /// The radius actually applied, after snapping.
    pub radius_m: f64,
    /// Incidents within the radius, nearest first.
    pub hazards: Vec<ApiRouteHazard>,
}

/// One incident within the proximity radius of the requested route.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRouteHazard {
    /// The incident record.
    pub incident: ApiIncident,
    /// Distance to the nearest route vertex in meters.
    pub distance_m: f64,
    /// Donut-shaped highlight polygon for the map.
    pub buffer: geojson::Geometry,
}

/// Response from the session charts endpoint: every chart panel's data in
/// one payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsResponse {
    /// Cause-frequency bars, busiest first.
    pub causes: Vec<CauseBar>,
    /// Monthly bars, January through December.
    pub months: Vec<MonthBar>,
    /// Width-versus-depth scatter points.
    pub scatter: Vec<ScatterPoint>,
    /// Per-district counts with choropleth intensity.
    pub districts: Vec<DistrictCount>,
}

/// Response from the session info endpoint: detail card data for the
/// currently selected incident.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// The selected incident, if any.
    pub incident: Option<ApiIncident>,
    /// Weather on the incident's date in its district, when known.
    pub weather: Option<ApiWeatherEntry>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Number of incidents loaded.
    pub incidents: usize,
    /// Number of district boundaries loaded.
    pub districts: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_incident_derives_repair_and_damage_fields() {
        let incident = Incident {
            sago_no: "2021-0007".to_string(),
            latitude: 37.55,
            longitude: 126.97,
            district: "서대문구".to_string(),
            address: None,
            date: Some("20210305".to_string()),
            month: Some("03".to_string()),
            width: Some(2.0),
            length: None,
            depth: Some(3.5),
            area: Some(12.0),
            causes: vec!["강관 손상".to_string()],
            death_cnt: 0,
            injury_cnt: 2,
            vehicle_cnt: 1,
            repair_status: "복구완료".to_string(),
            rainfall_mm: Some(4.5),
        };

        let api = ApiIncident::from(&incident);

        assert!(api.repaired);
        assert_eq!(api.total_damage, 3);
        assert_eq!(api.sago_no, "2021-0007");
    }

    #[test]
    fn api_incident_serializes_with_camel_case_keys() {
        let incident = Incident {
            sago_no: "A".to_string(),
            latitude: 37.5,
            longitude: 127.0,
            district: String::new(),
            address: None,
            date: None,
            month: None,
            width: None,
            length: None,
            depth: None,
            area: None,
            causes: vec![],
            death_cnt: 0,
            injury_cnt: 0,
            vehicle_cnt: 0,
            repair_status: String::new(),
            rainfall_mm: None,
        };

        let value = serde_json::to_value(ApiIncident::from(&incident)).unwrap();

        assert_eq!(value["sagoNo"], "A");
        assert!(value["rainfallMm"].is_null());
        assert_eq!(value["totalDamage"], 0);
    }
}
