#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Route proximity analysis.
//!
//! Given a road polyline from the directions API, finds the incidents lying
//! within a radius of it and builds the donut polygons the map draws around
//! each hit. All distances are great-circle Haversine in meters.

use serde::{Deserialize, Serialize};
use sinkhole_map_incident_models::Incident;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Smallest selectable proximity radius.
pub const RADIUS_MIN_M: f64 = 50.0;
/// Largest selectable proximity radius.
pub const RADIUS_MAX_M: f64 = 300.0;
/// Radius slider step.
pub const RADIUS_STEP_M: f64 = 50.0;
/// Radius used when the caller does not pick one.
pub const RADIUS_DEFAULT_M: f64 = 100.0;

/// Vertex count of a donut highlight ring.
pub const DONUT_POINTS_DEFAULT: usize = 60;
/// Inner exclusion hole radius as a fraction of the outer radius.
pub const DONUT_HOLE_RATIO: f64 = 0.25;

/// One vertex of a route, or any point expressed as latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
}

impl RoutePoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An incident within the proximity radius of a route.
#[derive(Debug, Clone, Copy)]
pub struct RouteHazard<'a> {
    pub incident: &'a Incident,
    /// Distance to the nearest route vertex in meters.
    pub distance_m: f64,
}

/// Great-circle distance between two points in meters.
#[must_use]
pub fn haversine_m(from: RoutePoint, to: RoutePoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let half_dlat = (to.lat - from.lat).to_radians() / 2.0;
    let half_dlng = (to.lng - from.lng).to_radians() / 2.0;

    let a = (lat1.cos() * lat2.cos())
        .mul_add(half_dlng.sin().powi(2), half_dlat.sin().powi(2));
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}

/// Distance from a point to the nearest vertex of a route, or `None` for
/// an empty route.
#[must_use]
pub fn min_distance_to_route(point: RoutePoint, route: &[RoutePoint]) -> Option<f64> {
    route
        .iter()
        .map(|vertex| haversine_m(point, *vertex))
        .min_by(f64::total_cmp)
}

/// Incidents within `radius_m` of any route vertex, nearest first.
#[must_use]
pub fn hazards_along_route<'a>(
    incidents: &'a [Incident],
    route: &[RoutePoint],
    radius_m: f64,
) -> Vec<RouteHazard<'a>> {
    let mut hazards: Vec<RouteHazard<'a>> = incidents
        .iter()
        .filter_map(|incident| {
            let location = RoutePoint::new(incident.latitude, incident.longitude);
            let distance_m = min_distance_to_route(location, route)?;
            (distance_m <= radius_m).then_some(RouteHazard {
                incident,
                distance_m,
            })
        })
        .collect();
    hazards.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    hazards
}

/// Snaps a requested radius onto the selectable slider positions: clamped
/// to `50..=300` and rounded to the nearest 50 m step, ties upward.
/// Non-finite requests fall back to the default.
#[must_use]
pub fn snap_radius(requested_m: f64) -> f64 {
    if !requested_m.is_finite() {
        return RADIUS_DEFAULT_M;
    }
    let clamped = requested_m.clamp(RADIUS_MIN_M, RADIUS_MAX_M);
    (clamped / RADIUS_STEP_M).round() * RADIUS_STEP_M
}

/// Builds the donut highlight polygon around one hazard: an outer ring at
/// `radius_m` wound counterclockwise and an inner exclusion hole at a
/// quarter of the radius wound clockwise, per RFC 7946.
#[must_use]
pub fn donut_polygon(center: RoutePoint, radius_m: f64, points: usize) -> geojson::Geometry {
    // A ring needs at least three distinct vertices.
    let points = points.max(3);
    let outer = circle_ring(center, radius_m, points, false);
    let hole = circle_ring(center, radius_m * DONUT_HOLE_RATIO, points, true);
    geojson::Geometry::new(geojson::Value::Polygon(vec![outer, hole]))
}

/// A closed circular ring of `points + 1` positions around a center.
#[allow(clippy::cast_precision_loss)]
fn circle_ring(
    center: RoutePoint,
    radius_m: f64,
    points: usize,
    clockwise: bool,
) -> Vec<Vec<f64>> {
    let radius_deg = (radius_m / EARTH_RADIUS_M).to_degrees();
    let lng_scale = center.lat.to_radians().cos();

    let mut ring: Vec<Vec<f64>> = (0..points)
        .map(|i| {
            let mut theta = std::f64::consts::TAU * i as f64 / points as f64;
            if clockwise {
                theta = -theta;
            }
            let lat = radius_deg.mul_add(theta.sin(), center.lat);
            let lng = (radius_deg / lng_scale).mul_add(theta.cos(), center.lng);
            vec![lng, lat]
        })
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}
