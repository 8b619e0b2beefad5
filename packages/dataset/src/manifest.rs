//! Data manifest: which files to load and how to read them.
//!
//! The manifest is a small TOML document checked in next to the data files.
//! Paths are relative to the manifest's own directory so the repository can
//! be run from any working directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::DatasetError;

/// The complete data manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct DataManifest {
    /// Incident feed source.
    pub incidents: IncidentSource,
    /// District boundary source.
    pub boundaries: BoundarySource,
    /// Daily weather source.
    pub weather: WeatherSource,
}

/// Where and how to read the incident feed.
#[derive(Debug, Clone, Deserialize)]
pub struct IncidentSource {
    /// Path to the incident JSON file.
    pub path: PathBuf,
    /// Dot-separated path to the record array for wrapped exports
    /// (e.g. `"response.body.items"`). Omit for a bare array.
    #[serde(default)]
    pub records_path: Option<String>,
}

/// Where and how to read the district boundaries.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundarySource {
    /// Path to the boundary `GeoJSON` file.
    pub path: PathBuf,
    /// Feature property holding the district name.
    #[serde(default = "default_name_property")]
    pub name_property: String,
}

/// Where to read the daily weather observations.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSource {
    /// Path to the weather CSV file.
    pub path: PathBuf,
}

fn default_name_property() -> String {
    "name".to_string()
}

impl DataManifest {
    /// Resolves all relative paths against the given base directory.
    #[must_use]
    pub fn resolve(mut self, base: &Path) -> Self {
        self.incidents.path = resolve_path(base, &self.incidents.path);
        self.boundaries.path = resolve_path(base, &self.boundaries.path);
        self.weather.path = resolve_path(base, &self.weather.path);
        self
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Parses a [`DataManifest`] from a TOML string.
///
/// # Errors
///
/// Returns [`DatasetError::Toml`] if the TOML is malformed or missing
/// required fields.
pub fn parse_manifest_toml(toml_str: &str) -> Result<DataManifest, DatasetError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Loads a [`DataManifest`] from disk, resolving relative data paths
/// against the manifest's directory.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_manifest(path: &Path) -> Result<DataManifest, DatasetError> {
    let toml_str = std::fs::read_to_string(path)?;
    let manifest = parse_manifest_toml(&toml_str)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(manifest.resolve(base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repo_manifest() {
        let manifest = parse_manifest_toml(include_str!("../../../data/manifest.toml")).unwrap();
        assert_eq!(manifest.boundaries.name_property, "name");
        assert!(manifest.incidents.path.extension().is_some());
    }

    #[test]
    fn name_property_defaults() {
        let manifest = parse_manifest_toml(
            r#"
            [incidents]
            path = "a.json"

            [boundaries]
            path = "b.geojson"

            [weather]
            path = "c.csv"
            "#,
        )
        .unwrap();
        assert_eq!(manifest.boundaries.name_property, "name");
        assert_eq!(manifest.incidents.records_path, None);
    }

    #[test]
    fn resolves_relative_paths() {
        let manifest = parse_manifest_toml(
            r#"
            [incidents]
            path = "a.json"

            [boundaries]
            path = "/abs/b.geojson"

            [weather]
            path = "c.csv"
            "#,
        )
        .unwrap()
        .resolve(Path::new("/data"));

        assert_eq!(manifest.incidents.path, PathBuf::from("/data/a.json"));
        assert_eq!(manifest.boundaries.path, PathBuf::from("/abs/b.geojson"));
    }

    #[test]
    fn rejects_manifest_without_sources() {
        assert!(parse_manifest_toml("[incidents]\npath = 'a.json'").is_err());
    }
}
