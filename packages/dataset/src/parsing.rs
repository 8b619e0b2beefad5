//! Tolerant field parsers for the raw Seoul sinkhole feed.
//!
//! The open-data export is messy: numbers arrive as strings, cause lists
//! arrive as Python-style quoted text, and any cell may be blank. Every
//! parser here returns an `Option` (or a defaulted value) instead of
//! failing, so a single bad cell never rejects a record.

/// Renders a scalar JSON value as text. Strings are used verbatim, numbers
/// and booleans via their display form. Null, arrays, and objects have no
/// text form.
fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    }
}

/// Normalizes the causal field of a raw record into clean cause labels.
///
/// The field has shipped in at least three shapes: a proper JSON array, a
/// Python-style stringified list (`"['원인1', '원인2']"`), and bare text.
/// Stringified lists get their single quotes normalized to double quotes
/// and are re-parsed; when that parse fails the whole original text is kept
/// as one label. Elements are trimmed, empties dropped, and duplicates
/// removed preserving first-seen order. Never panics.
#[must_use]
pub fn normalize_causes(raw: &serde_json::Value) -> Vec<String> {
    let candidates = match raw {
        serde_json::Value::Array(items) => items.iter().filter_map(value_text).collect(),
        serde_json::Value::String(s) => parse_pseudo_list(s),
        other => value_text(other).map_or_else(Vec::new, |text| vec![text]),
    };

    let mut causes: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !causes.iter().any(|existing| existing == trimmed) {
            causes.push(trimmed.to_string());
        }
    }
    causes
}

/// Re-parses a stringified list after single-to-double quote normalization.
fn parse_pseudo_list(text: &str) -> Vec<String> {
    let jsonish = text.replace('\'', "\"");
    match serde_json::from_str::<serde_json::Value>(&jsonish) {
        Ok(serde_json::Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Ok(other) => value_text(&other).map_or_else(|| vec![text.to_string()], |t| vec![t]),
        Err(_) => vec![text.to_string()],
    }
}

/// Extracts the two-digit month from a raw date value.
///
/// The month is characters 5-6 of the value's text form, with no calendar
/// validation: `"20219999"` yields `"99"`. Values shorter than six
/// characters yield `None`.
#[must_use]
pub fn extract_month(raw: &serde_json::Value) -> Option<String> {
    let text = value_text(raw)?;
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 6 {
        return None;
    }
    Some(chars[4..6].iter().collect())
}

/// Normalizes a raw date value to its 8-digit `YYYYMMDD` form.
///
/// Non-digit separators are stripped, so `"2021-03-05"` and `20210305`
/// normalize identically. Values with fewer than eight digits yield `None`;
/// longer values (datetime exports) keep their first eight digits.
#[must_use]
pub fn date_digits(raw: &serde_json::Value) -> Option<String> {
    let text = value_text(raw)?;
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 {
        return None;
    }
    Some(digits[..8].to_string())
}

/// Parses a numeric measurement that may arrive as a JSON number or a
/// numeric string. Blank, malformed, and non-finite values yield `None`.
#[must_use]
pub fn parse_metric(value: Option<&serde_json::Value>) -> Option<f64> {
    let value = value?;
    if let Some(n) = value.as_f64() {
        return Some(n).filter(|n| n.is_finite());
    }
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a damage count that may arrive as a JSON number or a numeric
/// string. Missing and malformed values default to zero.
#[must_use]
pub fn parse_count(value: Option<&serde_json::Value>) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    parse_metric(value).map_or(0, |n| if n > 0.0 { n as u32 } else { 0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_stringified_list() {
        let raw = serde_json::json!("['하수관 손상', '상수관 손상']");
        assert_eq!(normalize_causes(&raw), vec!["하수관 손상", "상수관 손상"]);
    }

    #[test]
    fn normalizes_json_array() {
        let raw = serde_json::json!(["다짐(되메우기) 불량", "기타"]);
        assert_eq!(normalize_causes(&raw), vec!["다짐(되메우기) 불량", "기타"]);
    }

    #[test]
    fn keeps_bare_text_as_single_cause() {
        let raw = serde_json::json!("도로함몰");
        assert_eq!(normalize_causes(&raw), vec!["도로함몰"]);
    }

    #[test]
    fn strips_quotes_from_scalar_pseudo_list() {
        let raw = serde_json::json!("'강관 손상'");
        assert_eq!(normalize_causes(&raw), vec!["강관 손상"]);
    }

    #[test]
    fn keeps_unparseable_pseudo_list_whole() {
        let raw = serde_json::json!("['하수관 손상', 기타]");
        assert_eq!(normalize_causes(&raw), vec!["['하수관 손상', 기타]"]);
    }

    #[test]
    fn drops_empty_and_duplicate_causes() {
        let raw = serde_json::json!("[' 기타 ', '기타', '', '하수관 손상']");
        assert_eq!(normalize_causes(&raw), vec!["기타", "하수관 손상"]);
    }

    #[test]
    fn never_panics_on_odd_shapes() {
        for raw in [
            serde_json::json!(null),
            serde_json::json!(42),
            serde_json::json!(true),
            serde_json::json!({"cause": "기타"}),
            serde_json::json!([null, {"x": 1}, []]),
            serde_json::json!(""),
        ] {
            let causes = normalize_causes(&raw);
            assert!(causes.iter().all(|c| !c.trim().is_empty()));
        }
        assert_eq!(normalize_causes(&serde_json::json!(null)), Vec::<String>::new());
        assert_eq!(normalize_causes(&serde_json::json!(42)), vec!["42"]);
    }

    #[test]
    fn extracts_month_without_validation() {
        assert_eq!(extract_month(&serde_json::json!("20210305")), Some("03".to_string()));
        assert_eq!(extract_month(&serde_json::json!("20219999")), Some("99".to_string()));
        assert_eq!(extract_month(&serde_json::json!(20211130)), Some("11".to_string()));
    }

    #[test]
    fn short_dates_have_no_month() {
        assert_eq!(extract_month(&serde_json::json!("2021")), None);
        assert_eq!(extract_month(&serde_json::json!("")), None);
        assert_eq!(extract_month(&serde_json::json!(null)), None);
    }

    #[test]
    fn normalizes_date_separators() {
        assert_eq!(date_digits(&serde_json::json!("2021-03-05")), Some("20210305".to_string()));
        assert_eq!(date_digits(&serde_json::json!("20210305")), Some("20210305".to_string()));
        assert_eq!(date_digits(&serde_json::json!(20210305)), Some("20210305".to_string()));
    }

    #[test]
    fn truncates_datetime_exports_to_date() {
        assert_eq!(
            date_digits(&serde_json::json!("2021-03-05 12:30")),
            Some("20210305".to_string())
        );
    }

    #[test]
    fn rejects_short_dates() {
        assert_eq!(date_digits(&serde_json::json!("2021-03")), None);
        assert_eq!(date_digits(&serde_json::json!("")), None);
    }

    #[test]
    fn parses_metrics_from_numbers_and_strings() {
        assert_eq!(parse_metric(Some(&serde_json::json!(3.5))), Some(3.5));
        assert_eq!(parse_metric(Some(&serde_json::json!("3.5"))), Some(3.5));
        assert_eq!(parse_metric(Some(&serde_json::json!(" 12 "))), Some(12.0));
    }

    #[test]
    fn blank_and_malformed_metrics_are_missing() {
        assert_eq!(parse_metric(None), None);
        assert_eq!(parse_metric(Some(&serde_json::json!(""))), None);
        assert_eq!(parse_metric(Some(&serde_json::json!("불명"))), None);
        assert_eq!(parse_metric(Some(&serde_json::json!(null))), None);
        assert_eq!(parse_metric(Some(&serde_json::json!("NaN"))), None);
    }

    #[test]
    fn counts_default_to_zero() {
        assert_eq!(parse_count(Some(&serde_json::json!(2))), 2);
        assert_eq!(parse_count(Some(&serde_json::json!("1"))), 1);
        assert_eq!(parse_count(Some(&serde_json::json!(""))), 0);
        assert_eq!(parse_count(Some(&serde_json::json!(-3))), 0);
        assert_eq!(parse_count(None), 0);
    }
}
