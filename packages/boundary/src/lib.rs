#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! In-memory spatial index over the city's administrative districts.
//!
//! Loads a district `GeoJSON` `FeatureCollection` at startup, builds an
//! R-tree index, and provides point-in-district lookups. Used to backfill
//! incidents whose feed records carry no district, and by the locate API.

use std::path::Path;

use geo::{Contains, MultiPolygon};
use geojson::GeoJson;
use rstar::{AABB, RTree, RTreeObject};

/// Errors raised while loading boundary data.
#[derive(Debug, thiserror::Error)]
pub enum BoundaryError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Geojson(#[from] geojson::Error),
    #[error("Boundary data has an unexpected shape: {message}")]
    Shape { message: String },
}

/// A district polygon stored in the R-tree with its name.
struct DistrictEntry {
    name: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for DistrictEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built district index plus the raw `GeoJSON` document.
///
/// Constructed once at startup and shared across all consumers. The raw
/// document is kept verbatim so map clients receive exactly the boundary
/// file the operator supplied.
pub struct BoundaryIndex {
    districts: RTree<DistrictEntry>,
    names: Vec<String>,
    document: serde_json::Value,
}

impl BoundaryIndex {
    /// Builds the index from `GeoJSON` text. District names are read from
    /// `name_property` on each feature; features without a usable name or
    /// polygon geometry are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid `GeoJSON` or is not a
    /// `FeatureCollection`.
    pub fn from_geojson(geojson_str: &str, name_property: &str) -> Result<Self, BoundaryError> {
        let document: serde_json::Value = serde_json::from_str(geojson_str)?;
        let geojson = geojson_str.parse::<GeoJson>()?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(BoundaryError::Shape {
                message: "expected a FeatureCollection".to_string(),
            });
        };

        let mut entries = Vec::new();
        for feature in collection.features {
            let name = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(name_property))
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty());
            let Some(name) = name else {
                log::warn!("Skipping boundary feature without a {name_property} property");
                continue;
            };

            let Some(polygon) = feature.geometry.and_then(parse_multipolygon) else {
                log::warn!("Skipping boundary feature {name} without polygon geometry");
                continue;
            };

            entries.push(DistrictEntry {
                name: name.to_string(),
                envelope: compute_envelope(&polygon),
                polygon,
            });
        }

        let mut names: Vec<String> = entries.iter().map(|entry| entry.name.clone()).collect();
        names.sort();
        names.dedup();

        Ok(Self {
            districts: RTree::bulk_load(entries),
            names,
            document,
        })
    }

    /// Loads and indexes a district boundary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path, name_property: &str) -> Result<Self, BoundaryError> {
        let geojson_str = std::fs::read_to_string(path)?;
        let index = Self::from_geojson(&geojson_str, name_property)?;
        log::info!(
            "Loaded {} district boundaries from {}",
            index.districts.size(),
            path.display()
        );
        Ok(index)
    }

    /// Looks up the district containing a point.
    ///
    /// Districts tile the city without overlap, so first match wins.
    #[must_use]
    pub fn locate(&self, lng: f64, lat: f64) -> Option<&str> {
        let point = geo::Point::new(lng, lat);
        let query_env = AABB::from_point([lng, lat]);

        for entry in self.districts.locate_in_envelope_intersecting(&query_env) {
            if entry.polygon.contains(&point) {
                return Some(&entry.name);
            }
        }
        None
    }

    /// District names in sorted order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The boundary file exactly as loaded.
    #[must_use]
    pub const fn document(&self) -> &serde_json::Value {
        &self.document
    }

    /// Number of indexed district polygons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.size() == 0
    }
}

/// Converts a `GeoJSON` geometry into a [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
fn parse_multipolygon(geometry: geojson::Geometry) -> Option<MultiPolygon<f64>> {
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

/// Computes the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    use geo::BoundingRect;

    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
