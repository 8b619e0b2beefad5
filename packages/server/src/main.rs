#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the sinkhole map application.
//!
//! Serves the REST API for the incident dataset, district boundaries,
//! session filter state, and route hazard analysis, plus the built
//! frontend assets.

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    sinkhole_map_server::run_server().await
}
