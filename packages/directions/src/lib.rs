#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Clients for the external routing services: keyword place search to
//! resolve route endpoints, and car directions to obtain the road polyline
//! the proximity tool measures against.

use serde::{Deserialize, Serialize};

pub mod kakao;

/// Errors that can occur while talking to the routing services.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },

    /// The service found no drivable route between the endpoints.
    #[error("No route found between the requested endpoints")]
    NoRoute,

    /// No REST API key was configured.
    #[error("No REST API key configured for the routing service")]
    MissingApiKey,

    /// The service rejected the request due to rate limiting.
    #[error("Rate limited by the routing service")]
    RateLimited,
}

/// One ranked candidate from the keyword place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    /// Stable place identifier from the provider.
    pub id: String,
    /// Display name of the place.
    pub name: String,
    /// Road address when the place has one, lot address otherwise.
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}
