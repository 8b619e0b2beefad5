//! HTTP handler functions for the sinkhole map API.
//!
//! External service failures degrade to empty result sets: the dashboard
//! stays interactive and simply shows no route or candidates for that
//! request.

use actix_web::{HttpResponse, web};
use sinkhole_map_directions::kakao;
use sinkhole_map_filter::charts::{
    cause_frequencies, district_counts, month_frequencies, scatter_points,
};
use sinkhole_map_filter::command::Command;
use sinkhole_map_filter::reconcile;
use sinkhole_map_filter::visible::map_visible;
use sinkhole_map_incident_models::Incident;
use sinkhole_map_route::{
    DONUT_POINTS_DEFAULT, RADIUS_DEFAULT_M, RoutePoint, donut_polygon, hazards_along_route,
    snap_radius,
};
use sinkhole_map_server_models::{
    ApiHealth, ApiIncident, ApiPlace, ApiRouteHazard, ApiWeatherEntry, ChartsResponse,
    IncidentDetail, IncidentQueryParams, LocateQueryParams, PlaceSearchParams,
    RouteHazardsRequest, RouteHazardsResponse, SessionInfo, WeatherQueryParams,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        incidents: state.dataset.len(),
        districts: state.boundaries.len(),
    })
}

/// `GET /api/incidents`
///
/// Returns the normalized dataset, optionally narrowed by district, date
/// window, month, or cause.
pub async fn incidents(
    state: web::Data<AppState>,
    params: web::Query<IncidentQueryParams>,
) -> HttpResponse {
    let incidents: Vec<ApiIncident> = state
        .dataset
        .records()
        .iter()
        .filter(|incident| {
            params
                .district
                .as_deref()
                .is_none_or(|district| incident.district == district)
        })
        .filter(|incident| {
            matches_date_window(incident, params.from.as_deref(), params.to.as_deref())
        })
        .filter(|incident| {
            params
                .month
                .as_deref()
                .is_none_or(|month| incident.month.as_deref() == Some(month))
        })
        .filter(|incident| {
            params
                .cause
                .as_deref()
                .is_none_or(|cause| incident.causes.iter().any(|c| c == cause))
        })
        .take(params.limit.unwrap_or(usize::MAX))
        .map(ApiIncident::from)
        .collect();

    HttpResponse::Ok().json(incidents)
}

/// `GET /api/incidents/{sago_no}`
///
/// One incident joined with the weather observed on its occurrence date.
pub async fn incident_detail(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let sago_no = path.into_inner();
    let Some(incident) = state.dataset.get(&sago_no) else {
        return HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("No incident {sago_no}")
        }));
    };

    let weather = incident
        .date
        .as_deref()
        .and_then(|date| state.weather.get(date, &incident.district));

    HttpResponse::Ok().json(IncidentDetail {
        incident: ApiIncident::from(incident),
        weather: weather.map(ApiWeatherEntry::from),
    })
}

/// `GET /api/districts`
///
/// Returns the boundary `GeoJSON` document exactly as loaded.
pub async fn districts(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.boundaries.document())
}

/// `GET /api/districts/names`
pub async fn district_names(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.boundaries.names())
}

/// `GET /api/districts/stats`
///
/// Per-district incident counts with choropleth intensity.
pub async fn district_stats(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(district_counts(&state.dataset))
}

/// `GET /api/districts/locate?lat=..&lng=..`
pub async fn locate_district(
    state: web::Data<AppState>,
    params: web::Query<LocateQueryParams>,
) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "district": state.boundaries.locate(params.lng, params.lat)
    }))
}

/// `GET /api/weather?district=..&date=..&days=..`
///
/// Daily rainfall series for one district, oldest first, ending at `date`.
pub async fn weather_series(
    state: web::Data<AppState>,
    params: web::Query<WeatherQueryParams>,
) -> HttpResponse {
    let end = params
        .date
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().format("%Y%m%d").to_string());
    let days = params.days.unwrap_or(30);

    let series: Vec<ApiWeatherEntry> = state
        .weather
        .rainfall_series(&params.district, &end, days)
        .iter()
        .map(ApiWeatherEntry::from)
        .collect();

    HttpResponse::Ok().json(series)
}

/// `GET /api/session`
pub async fn session_state(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.read().expect("Session state lock poisoned");
    HttpResponse::Ok().json(&*session)
}

/// `POST /api/session/commands`
///
/// Applies one filter command and returns the updated session state.
pub async fn session_command(
    state: web::Data<AppState>,
    command: web::Json<Command>,
) -> HttpResponse {
    let mut session = state.session.write().expect("Session state lock poisoned");
    reconcile::apply(&mut session, &state.dataset, &command);
    HttpResponse::Ok().json(&*session)
}

/// `GET /api/session/map`
///
/// The incidents the map renders under the current session state.
pub async fn session_map(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.read().expect("Session state lock poisoned");
    let incidents: Vec<ApiIncident> = map_visible(&state.dataset, &session)
        .into_iter()
        .map(ApiIncident::from)
        .collect();
    HttpResponse::Ok().json(incidents)
}

/// `GET /api/session/charts`
///
/// Every chart panel's data, with emphasis flags derived from the current
/// session state.
pub async fn session_charts(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.read().expect("Session state lock poisoned");
    HttpResponse::Ok().json(ChartsResponse {
        causes: cause_frequencies(&state.dataset, &session),
        months: month_frequencies(&state.dataset, &session),
        scatter: scatter_points(&state.dataset, &session),
        districts: district_counts(&state.dataset),
    })
}

/// `GET /api/session/info`
///
/// Detail card data for the selected incident, including the weather on
/// its occurrence date.
pub async fn session_info(state: web::Data<AppState>) -> HttpResponse {
    let session = state.session.read().expect("Session state lock poisoned");
    let incident = session
        .selected_incident
        .as_deref()
        .and_then(|sago_no| state.dataset.get(sago_no));
    let weather = incident.and_then(|incident| {
        let date = incident.date.as_deref()?;
        state.weather.get(date, &incident.district)
    });

    HttpResponse::Ok().json(SessionInfo {
        incident: incident.map(ApiIncident::from),
        weather: weather.map(ApiWeatherEntry::from),
    })
}

/// `GET /api/places/search?query=..`
///
/// Proxies the keyword place search. Failures degrade to an empty list.
pub async fn place_search(
    state: web::Data<AppState>,
    params: web::Query<PlaceSearchParams>,
) -> HttpResponse {
    match kakao::search_places(
        &state.http,
        kakao::PLACE_SEARCH_URL,
        &state.kakao_api_key,
        &params.query,
    )
    .await
    {
        Ok(places) => {
            let places: Vec<ApiPlace> = places.into_iter().map(ApiPlace::from).collect();
            HttpResponse::Ok().json(places)
        }
        Err(e) => {
            log::error!("Place search failed: {e}");
            HttpResponse::Ok().json(Vec::<ApiPlace>::new())
        }
    }
}

/// `POST /api/route/hazards`
///
/// Requests a car route between the endpoints and returns the incidents
/// within the (snapped) radius of it, each with its donut highlight
/// polygon. Directions failures degrade to an empty route.
pub async fn route_hazards(
    state: web::Data<AppState>,
    request: web::Json<RouteHazardsRequest>,
) -> HttpResponse {
    let radius_m = request.radius_m.map_or(RADIUS_DEFAULT_M, snap_radius);
    let buffer_points = request.buffer_points.unwrap_or(DONUT_POINTS_DEFAULT);

    let polyline = match kakao::car_route(
        &state.http,
        kakao::DIRECTIONS_URL,
        &state.kakao_api_key,
        request.origin,
        request.destination,
    )
    .await
    {
        Ok(polyline) => polyline,
        Err(e) => {
            log::error!("Directions request failed: {e}");
            return HttpResponse::Ok().json(RouteHazardsResponse {
                route: Vec::new(),
                radius_m,
                hazards: Vec::new(),
            });
        }
    };

    let hazards: Vec<ApiRouteHazard> =
        hazards_along_route(state.dataset.records(), &polyline, radius_m)
            .iter()
            .map(|hazard| ApiRouteHazard {
                incident: ApiIncident::from(hazard.incident),
                distance_m: hazard.distance_m,
                buffer: donut_polygon(
                    RoutePoint::new(hazard.incident.latitude, hazard.incident.longitude),
                    radius_m,
                    buffer_points,
                ),
            })
            .collect();

    HttpResponse::Ok().json(RouteHazardsResponse {
        route: polyline,
        radius_m,
        hazards,
    })
}

/// True when the incident's date falls inside the optional window. Undated
/// incidents only match when no window is requested.
fn matches_date_window(incident: &Incident, from: Option<&str>, to: Option<&str>) -> bool {
    let Some(date) = incident.date.as_deref() else {
        return from.is_none() && to.is_none();
    };
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}
