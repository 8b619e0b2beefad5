#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI for the sinkhole map toolchain.
//!
//! Provides a unified entry point that lets users interactively select
//! which tool to run: start the dashboard server, print a dataset
//! summary, or probe a car route for nearby incidents.

mod probe;
mod summary;

use std::path::PathBuf;

use dialoguer::Select;
use sinkhole_map_dataset::{IncidentDataset, load_incidents, manifest::load_manifest};

/// Top-level tool selection for the sinkhole map toolchain.
enum Tool {
    Server,
    DatasetSummary,
    RouteProbe,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::DatasetSummary, Self::RouteProbe];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::DatasetSummary => "Dataset summary",
            Self::RouteProbe => "Route proximity probe",
        }
    }
}

/// Loads the incident dataset named by `SINKHOLE_MANIFEST`, falling back
/// to the repository's default manifest.
fn load_dataset() -> Result<IncidentDataset, Box<dyn std::error::Error>> {
    let manifest_path = std::env::var("SINKHOLE_MANIFEST")
        .map_or_else(|_| PathBuf::from("data/manifest.toml"), PathBuf::from);
    let manifest = load_manifest(&manifest_path)?;
    Ok(load_incidents(
        &manifest.incidents.path,
        manifest.incidents.records_path.as_deref(),
    )?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Sinkhole Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(sinkhole_map_server::interactive::run())
            })
            .await??;
        }
        Tool::DatasetSummary => summary::run(&load_dataset()?),
        Tool::RouteProbe => probe::run(&load_dataset()?).await?,
    }

    Ok(())
}
