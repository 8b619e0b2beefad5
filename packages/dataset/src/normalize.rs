//! Raw feed record normalization.
//!
//! Turns one page of raw JSON objects from the Seoul sinkhole feed into
//! canonical [`Incident`]s. Records without a usable incident number or
//! coordinates are skipped with a warning; every other field is extracted
//! on a best-effort basis.

use sinkhole_map_incident_models::Incident;

use crate::parsing::{date_digits, extract_month, normalize_causes, parse_count, parse_metric};

/// Gets a string value from a JSON object by field name.
fn get_str<'a>(record: &'a serde_json::Value, field: &str) -> Option<&'a str> {
    record.get(field)?.as_str()
}

/// Extracts the incident number, accepting string and numeric encodings.
fn extract_sago_no(record: &serde_json::Value) -> Option<String> {
    if let Some(s) = get_str(record, "sagoNo")
        && !s.trim().is_empty()
    {
        return Some(s.trim().to_string());
    }
    record
        .get("sagoNo")
        .and_then(serde_json::Value::as_i64)
        .map(|n| n.to_string())
}

/// Extracts one WGS84 coordinate, accepting string and f64 encodings.
/// Zero and out-of-range values are treated as missing.
fn extract_coord(record: &serde_json::Value, field: &str, max_abs: f64) -> Option<f64> {
    let value = parse_metric(record.get(field))?;
    if value == 0.0 || value.abs() > max_abs {
        return None;
    }
    Some(value)
}

/// Extracts a trimmed, non-empty text field.
fn extract_text(record: &serde_json::Value, field: &str) -> Option<String> {
    get_str(record, field)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Normalizes a page of raw feed records into canonical incidents.
///
/// Records missing an incident number or usable coordinates are dropped;
/// the drop is logged so feed regressions surface in the server log.
#[must_use]
pub fn normalize_records(records: &[serde_json::Value]) -> Vec<Incident> {
    let mut incidents = Vec::with_capacity(records.len());

    for record in records {
        let Some(sago_no) = extract_sago_no(record) else {
            log::warn!("Skipping record without a sagoNo: {record}");
            continue;
        };

        let latitude = extract_coord(record, "sagoLat", 90.0);
        let longitude = extract_coord(record, "sagoLon", 180.0);
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            log::warn!("Skipping incident {sago_no} without usable coordinates");
            continue;
        };

        let date_value = record.get("sagoDate");
        let date = date_value.and_then(date_digits);
        let month = date_value.and_then(extract_month);

        incidents.push(Incident {
            sago_no,
            latitude,
            longitude,
            district: extract_text(record, "sigungu").unwrap_or_default(),
            address: extract_text(record, "addr"),
            date,
            month,
            width: parse_metric(record.get("sinkWidth")),
            length: parse_metric(record.get("sinkExtend")),
            depth: parse_metric(record.get("sinkDepth")),
            area: parse_metric(record.get("sinkArea")),
            causes: record
                .get("sagoDetail")
                .map(normalize_causes)
                .unwrap_or_default(),
            death_cnt: parse_count(record.get("deathCnt")),
            injury_cnt: parse_count(record.get("injuryCnt")),
            vehicle_cnt: parse_count(record.get("vehicleCnt")),
            repair_status: extract_text(record, "trStatus").unwrap_or_default(),
            rainfall_mm: parse_metric(record.get("rainfall")),
        });
    }

    incidents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_record() -> serde_json::Value {
        serde_json::json!({
            "sagoNo": "20230042",
            "sagoDate": "20230415",
            "sigungu": "서대문구",
            "addr": "연세로 50",
            "sagoLat": "37.5665",
            "sagoLon": "126.9780",
            "sinkWidth": "2.5",
            "sinkExtend": 4.0,
            "sinkDepth": "1.2",
            "sinkArea": "10",
            "sagoDetail": "['하수관 손상']",
            "deathCnt": 0,
            "injuryCnt": "1",
            "vehicleCnt": "",
            "trStatus": "복구완료",
            "rainfall": "12.5"
        })
    }

    #[test]
    fn normalizes_full_record() {
        let incidents = normalize_records(&[raw_record()]);
        assert_eq!(incidents.len(), 1);

        let it = &incidents[0];
        assert_eq!(it.sago_no, "20230042");
        assert_eq!(it.district, "서대문구");
        assert_eq!(it.date.as_deref(), Some("20230415"));
        assert_eq!(it.month.as_deref(), Some("04"));
        assert_eq!(it.width, Some(2.5));
        assert_eq!(it.length, Some(4.0));
        assert_eq!(it.depth, Some(1.2));
        assert_eq!(it.area, Some(10.0));
        assert_eq!(it.causes, vec!["하수관 손상"]);
        assert_eq!(it.injury_cnt, 1);
        assert_eq!(it.vehicle_cnt, 0);
        assert!(it.is_repaired());
        assert!(it.has_rain());
    }

    #[test]
    fn accepts_numeric_sago_no() {
        let mut record = raw_record();
        record["sagoNo"] = serde_json::json!(20230042);
        let incidents = normalize_records(&[record]);
        assert_eq!(incidents[0].sago_no, "20230042");
    }

    #[test]
    fn skips_record_without_id() {
        let mut record = raw_record();
        record["sagoNo"] = serde_json::json!("");
        assert!(normalize_records(&[record]).is_empty());
    }

    #[test]
    fn skips_zero_coordinates() {
        let mut record = raw_record();
        record["sagoLat"] = serde_json::json!("0.0");
        assert!(normalize_records(&[record]).is_empty());
    }

    #[test]
    fn skips_out_of_range_coordinates() {
        let mut record = raw_record();
        record["sagoLon"] = serde_json::json!(551_000.0);
        assert!(normalize_records(&[record]).is_empty());
    }

    #[test]
    fn tolerates_blank_optional_fields() {
        let record = serde_json::json!({
            "sagoNo": "20240001",
            "sagoLat": 37.5,
            "sagoLon": 127.0
        });
        let incidents = normalize_records(&[record]);
        assert_eq!(incidents.len(), 1);

        let it = &incidents[0];
        assert_eq!(it.district, "");
        assert_eq!(it.date, None);
        assert_eq!(it.month, None);
        assert_eq!(it.depth, None);
        assert!(it.causes.is_empty());
        assert_eq!(it.total_damage(), 0);
        assert!(!it.has_rain());
    }
}
