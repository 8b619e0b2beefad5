#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Daily weather observations indexed by date and district.
//!
//! Loads the merged AWS station CSV (one row per station per day, with a
//! `sigungu` column mapped from the station code) into an in-memory index
//! keyed by `{YYYYMMDD}_{district}`. Lookups for days or districts without
//! an observation return `None` rather than failing.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Errors that can occur while loading the weather CSV.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV is missing a required column.
    #[error("Missing CSV column: {column}")]
    MissingColumn {
        /// Description of the column that could not be found.
        column: &'static str,
    },
}

/// One day of observations for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEntry {
    /// Observation date in 8-digit `YYYYMMDD` form.
    pub date: String,
    /// District (구) name.
    pub district: String,
    /// Daily average temperature in °C.
    pub avg_temp_c: Option<f64>,
    /// Daily rainfall in millimeters.
    pub rainfall_mm: Option<f64>,
}

/// The full weather index, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct WeatherIndex {
    entries: BTreeMap<String, WeatherEntry>,
}

impl WeatherIndex {
    /// Builds an index from individual entries. Later entries for the same
    /// date and district overwrite earlier ones.
    #[must_use]
    pub fn from_entries(entries: Vec<WeatherEntry>) -> Self {
        let mut map = BTreeMap::new();
        for entry in entries {
            map.insert(entry_key(&entry.date, &entry.district), entry);
        }
        Self { entries: map }
    }

    /// Looks up the observation for a date and district. `None` means "no
    /// data", which callers render as such rather than treating as an error.
    #[must_use]
    pub fn get(&self, date8: &str, district: &str) -> Option<&WeatherEntry> {
        self.entries.get(&entry_key(date8, district))
    }

    /// Daily rainfall for a date and district, when observed.
    #[must_use]
    pub fn rainfall(&self, date8: &str, district: &str) -> Option<f64> {
        self.get(date8, district).and_then(|e| e.rainfall_mm)
    }

    /// Number of indexed observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rainfall series for a district over the `days` days ending at
    /// `end_date8` inclusive, oldest first. Days without an observation get
    /// a point with empty values so the series stays continuous.
    ///
    /// Returns an empty series when `end_date8` is not a valid calendar
    /// date.
    #[must_use]
    pub fn rainfall_series(&self, district: &str, end_date8: &str, days: u64) -> Vec<WeatherEntry> {
        let Ok(end) = NaiveDate::parse_from_str(end_date8, "%Y%m%d") else {
            return Vec::new();
        };

        let mut series = Vec::new();
        for offset in (0..days).rev() {
            let Some(date) = end.checked_sub_days(Days::new(offset)) else {
                continue;
            };
            let date8 = date.format("%Y%m%d").to_string();
            let entry = self.get(&date8, district).cloned().unwrap_or(WeatherEntry {
                date: date8,
                district: district.to_string(),
                avg_temp_c: None,
                rainfall_mm: None,
            });
            series.push(entry);
        }
        series
    }
}

fn entry_key(date8: &str, district: &str) -> String {
    format!("{date8}_{district}")
}

/// Normalizes a CSV date cell to 8-digit `YYYYMMDD` form. The merged
/// exports have shipped with dashed, slashed, dotted, and bare encodings.
fn normalize_date(text: &str) -> Option<String> {
    let text = text.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date.format("%Y%m%d").to_string());
        }
    }
    None
}

/// Parses an optional numeric cell. Blank cells mean "not observed".
fn parse_cell(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Finds the index of the first header matching any of the given needles.
fn find_column(headers: &[String], needles: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| needles.iter().any(|needle| h.contains(needle)))
}

/// Parses the merged weather CSV text into entries.
///
/// Columns are located by header text so the exact export layout does not
/// matter: the date column contains `일시`, the district column `sigungu`
/// (or `시군구`), temperature `기온`, rainfall `강수량`.
///
/// # Errors
///
/// Returns [`WeatherError`] if the CSV is malformed or the date/district
/// columns cannot be located.
pub fn parse_weather_csv(text: &str) -> Result<Vec<WeatherEntry>, WeatherError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let date_col = find_column(&headers, &["일시", "date"])
        .ok_or(WeatherError::MissingColumn { column: "date (일시)" })?;
    let district_col = find_column(&headers, &["sigungu", "시군구"])
        .ok_or(WeatherError::MissingColumn { column: "district (sigungu)" })?;
    let temp_col = find_column(&headers, &["기온"]);
    let rain_col = find_column(&headers, &["강수량"]);

    let mut entries = Vec::new();
    for result in reader.records() {
        let record = result?;
        let cell = |col: usize| record.get(col).unwrap_or("").trim();

        let Some(date) = normalize_date(cell(date_col)) else {
            continue;
        };
        let district = cell(district_col);
        if district.is_empty() {
            continue;
        }

        entries.push(WeatherEntry {
            date,
            district: district.to_string(),
            avg_temp_c: temp_col.map(cell).and_then(parse_cell),
            rainfall_mm: rain_col.map(cell).and_then(parse_cell),
        });
    }

    Ok(entries)
}

/// Loads the weather CSV from disk into a [`WeatherIndex`].
///
/// # Errors
///
/// Returns [`WeatherError`] if the file cannot be read or parsed.
pub fn load_weather(path: &Path) -> Result<WeatherIndex, WeatherError> {
    let text = std::fs::read_to_string(path)?;
    let entries = parse_weather_csv(&text)?;
    log::info!(
        "Loaded {} weather observations from {}",
        entries.len(),
        path.display()
    );
    Ok(WeatherIndex::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\u{feff}지점,일시,평균기온(°C),일강수량(mm),sigungu\n\
        400,2021-03-05,8.2,42.5,강남구\n\
        412,2021-03-05,7.9,38.0,서대문구\n\
        412,2021-03-04,6.1,,서대문구\n\
        412,bad-date,6.1,1.0,서대문구\n\
        410,2021-03-05,8.0,40.0,\n";

    #[test]
    fn joins_dashed_csv_dates_with_digit_keys() {
        let index = WeatherIndex::from_entries(parse_weather_csv(CSV).unwrap());
        let entry = index.get("20210305", "서대문구").unwrap();
        assert_eq!(entry.rainfall_mm, Some(38.0));
        assert_eq!(entry.avg_temp_c, Some(7.9));
    }

    #[test]
    fn blank_cells_mean_not_observed() {
        let index = WeatherIndex::from_entries(parse_weather_csv(CSV).unwrap());
        let entry = index.get("20210304", "서대문구").unwrap();
        assert_eq!(entry.rainfall_mm, None);
        assert_eq!(entry.avg_temp_c, Some(6.1));
    }

    #[test]
    fn skips_rows_without_date_or_district() {
        let entries = parse_weather_csv(CSV).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn missing_keys_are_no_data() {
        let index = WeatherIndex::from_entries(parse_weather_csv(CSV).unwrap());
        assert!(index.get("20210305", "송파구").is_none());
        assert!(index.rainfall("19990101", "강남구").is_none());
    }

    #[test]
    fn rejects_csv_without_district_column() {
        let err = parse_weather_csv("지점,일시\n400,2021-03-05\n").unwrap_err();
        assert!(matches!(err, WeatherError::MissingColumn { .. }));
    }

    #[test]
    fn series_walks_back_across_month_boundary() {
        let index = WeatherIndex::from_entries(parse_weather_csv(CSV).unwrap());
        let series = index.rainfall_series("서대문구", "20210305", 7);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, "20210227");
        assert_eq!(series[6].date, "20210305");
        assert_eq!(series[6].rainfall_mm, Some(38.0));
        assert_eq!(series[5].rainfall_mm, None);
    }

    #[test]
    fn series_for_invalid_date_is_empty() {
        let index = WeatherIndex::default();
        assert!(index.rainfall_series("강남구", "20219999", 7).is_empty());
    }
}
