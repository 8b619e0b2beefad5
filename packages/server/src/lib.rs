#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the sinkhole map dashboard.
//!
//! Serves the incident dataset, district boundaries, and daily weather,
//! plus the shared dashboard session: clients post filter commands to
//! `/api/session/commands` and read back the derived map and chart
//! payloads. The route proximity tool proxies the external directions
//! services so the REST API key never reaches the browser.

mod handlers;
pub mod interactive;

use std::path::PathBuf;
use std::sync::RwLock;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use sinkhole_map_boundary::BoundaryIndex;
use sinkhole_map_dataset::{IncidentDataset, load_raw_records, normalize::normalize_records};
use sinkhole_map_filter::FilterState;
use sinkhole_map_incident_models::Incident;
use sinkhole_map_weather::WeatherIndex;

/// Shared application state.
pub struct AppState {
    /// All incidents, indexed by incident number.
    pub dataset: IncidentDataset,
    /// District boundary index and raw boundary document.
    pub boundaries: BoundaryIndex,
    /// Daily weather index keyed by date and district.
    pub weather: WeatherIndex,
    /// The dashboard session's filter state. Written only through the
    /// reconciler; every view endpoint is a reader.
    pub session: RwLock<FilterState>,
    /// HTTP client shared by the routing service calls.
    pub http: reqwest::Client,
    /// Kakao REST API key; empty when unconfigured.
    pub kakao_api_key: String,
}

/// Resolves the manifest location from `SINKHOLE_MANIFEST`, defaulting to
/// `data/manifest.toml` next to the working directory.
fn manifest_path() -> PathBuf {
    std::env::var("SINKHOLE_MANIFEST")
        .map_or_else(|_| PathBuf::from("data/manifest.toml"), PathBuf::from)
}

/// Fills the gaps the feed leaves: incidents without a district get one
/// from the boundary index, and incidents without rainfall get the daily
/// observation for their date and district. Values the feed carried are
/// never overwritten.
fn enrich_incidents(
    incidents: &mut [Incident],
    boundaries: &BoundaryIndex,
    weather: &WeatherIndex,
) {
    let mut located = 0usize;
    for incident in incidents.iter_mut() {
        if incident.district.is_empty()
            && let Some(name) = boundaries.locate(incident.longitude, incident.latitude)
        {
            incident.district = name.to_string();
            located += 1;
        }
        if incident.rainfall_mm.is_none()
            && let Some(date) = &incident.date
        {
            incident.rainfall_mm = weather.rainfall(date, &incident.district);
        }
    }
    if located > 0 {
        log::info!("Attributed {located} incidents to districts by location");
    }
}

/// Starts the sinkhole map API server.
///
/// Loads the data manifest, builds the incident dataset, boundary index,
/// and weather index, seeds the session state, and starts the Actix-Web
/// HTTP server. This is a regular async function — the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the manifest or any of the data files it points at cannot be
/// loaded.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let manifest_path = manifest_path();
    log::info!("Loading data manifest from {}", manifest_path.display());
    let manifest = sinkhole_map_dataset::manifest::load_manifest(&manifest_path)
        .expect("Failed to load data manifest");

    let boundaries = BoundaryIndex::load(
        &manifest.boundaries.path,
        &manifest.boundaries.name_property,
    )
    .expect("Failed to load district boundaries");

    let weather = sinkhole_map_weather::load_weather(&manifest.weather.path)
        .expect("Failed to load weather table");

    log::info!("Loading incident dataset...");
    let raw = load_raw_records(
        &manifest.incidents.path,
        manifest.incidents.records_path.as_deref(),
    )
    .expect("Failed to load incident dataset");
    let mut incidents = normalize_records(&raw);
    enrich_incidents(&mut incidents, &boundaries, &weather);
    let dataset = IncidentDataset::new(incidents);
    log::info!("Serving {} incidents", dataset.len());

    let session = RwLock::new(FilterState::initial(&dataset));

    let kakao_api_key = std::env::var("KAKAO_REST_API_KEY").unwrap_or_default();
    if kakao_api_key.is_empty() {
        log::warn!(
            "KAKAO_REST_API_KEY is not set; place search and route hazards will return empty results"
        );
    }

    let state = web::Data::new(AppState {
        dataset,
        boundaries,
        weather,
        session,
        http: reqwest::Client::new(),
        kakao_api_key,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/incidents", web::get().to(handlers::incidents))
                    .route(
                        "/incidents/{sago_no}",
                        web::get().to(handlers::incident_detail),
                    )
                    .route("/districts", web::get().to(handlers::districts))
                    .route("/districts/names", web::get().to(handlers::district_names))
                    .route("/districts/stats", web::get().to(handlers::district_stats))
                    .route(
                        "/districts/locate",
                        web::get().to(handlers::locate_district),
                    )
                    .route("/weather", web::get().to(handlers::weather_series))
                    .route("/session", web::get().to(handlers::session_state))
                    .route(
                        "/session/commands",
                        web::post().to(handlers::session_command),
                    )
                    .route("/session/map", web::get().to(handlers::session_map))
                    .route("/session/charts", web::get().to(handlers::session_charts))
                    .route("/session/info", web::get().to(handlers::session_info))
                    .route("/places/search", web::get().to(handlers::place_search))
                    .route("/route/hazards", web::post().to(handlers::route_hazards)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
