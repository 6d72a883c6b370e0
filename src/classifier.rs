//! Column kind classification.
//!
//! Classifies every column into one of the three coarse kinds the engine
//! understands: numeric, datetime, or string. Classification is a pure
//! function of the table's current cell values and is recomputed on every
//! call; nothing is cached across transformations.

use crate::types::{ColumnKind, ColumnTypeMap};
use crate::utils::{is_datetime_dtype, is_numeric_dtype, is_numeric_string};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Fraction of non-null values that must parse for a string column to be
/// classified numeric or datetime.
const MAJORITY_THRESHOLD: f64 = 0.8;

// Date pattern regexes, compiled once at startup.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}[-/]\d{1,2}[-/]\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{1,2}[-/]\d{1,2}[-/]\d{4}$").expect("Invalid regex: MM-DD-YYYY"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}\s\d{2}:\d{2}:\d{2}").expect("Invalid regex: datetime"),
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}").expect("Invalid regex: ISO"),
    ]
});

/// Check if a string looks like a calendar date or timestamp.
pub fn is_datetime_string(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return false;
    }
    DATE_PATTERNS.iter().any(|p| p.is_match(trimmed))
}

/// Classify every column of the table.
///
/// Stored dtype decides first: numeric dtypes are `Numeric`, date/time
/// dtypes are `Datetime`. String columns are inspected value-wise: a
/// majority of numeric-parseable values makes the column `Numeric`, a
/// majority of date-shaped values makes it `Datetime`, anything else is
/// `String`. An all-null column keeps its stored dtype's kind.
pub fn classify(df: &DataFrame) -> ColumnTypeMap {
    let mut type_map = ColumnTypeMap::with_capacity(df.width());
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        type_map.insert(series.name().to_string(), classify_series(series));
    }
    type_map
}

/// Classify a single column.
pub fn classify_series(series: &Series) -> ColumnKind {
    let dtype = series.dtype();
    if is_numeric_dtype(dtype) {
        return ColumnKind::Numeric;
    }
    if is_datetime_dtype(dtype) {
        return ColumnKind::Datetime;
    }
    if dtype == &DataType::String {
        return classify_string_values(series);
    }
    ColumnKind::String
}

/// Value-level classification for string-dtype columns.
fn classify_string_values(series: &Series) -> ColumnKind {
    let Ok(str_chunked) = series.str() else {
        return ColumnKind::String;
    };

    let mut total = 0usize;
    let mut numeric = 0usize;
    let mut date_like = 0usize;

    for val in str_chunked.into_iter().flatten() {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            continue;
        }
        total += 1;
        if is_numeric_string(trimmed) {
            numeric += 1;
        } else if is_datetime_string(trimmed) {
            date_like += 1;
        }
    }

    // All null or all blank: fall back to the stored kind.
    if total == 0 {
        return ColumnKind::String;
    }

    let numeric_ratio = numeric as f64 / total as f64;
    let datetime_ratio = date_like as f64 / total as f64;

    if numeric_ratio >= MAJORITY_THRESHOLD {
        ColumnKind::Numeric
    } else if datetime_ratio >= MAJORITY_THRESHOLD {
        ColumnKind::Datetime
    } else {
        ColumnKind::String
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_native_dtypes() {
        let df = df![
            "count" => [1i64, 2, 3],
            "price" => [1.5f64, 2.5, 3.5],
            "name" => ["a", "b", "c"],
        ]
        .unwrap();

        let types = classify(&df);
        assert_eq!(types["count"], ColumnKind::Numeric);
        assert_eq!(types["price"], ColumnKind::Numeric);
        assert_eq!(types["name"], ColumnKind::String);
    }

    #[test]
    fn test_classify_datetime_dtype() {
        let series = Series::new("ts".into(), &[1577836800000i64, 1577923200000])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        assert_eq!(classify_series(&series), ColumnKind::Datetime);
    }

    #[test]
    fn test_classify_numeric_looking_strings() {
        let series = Series::new("amount".into(), &["100", "200.5", "$3,000"]);
        assert_eq!(classify_series(&series), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_mostly_numeric_strings() {
        // Four of five parse: above the majority threshold, so the column
        // is numeric and the straggler is the inspector's problem.
        let series = Series::new("score".into(), &["1", "2", "3", "4", "oops"]);
        assert_eq!(classify_series(&series), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_mixed_strings_stay_string() {
        let series = Series::new("mixed".into(), &["1", "two", "3", "four"]);
        assert_eq!(classify_series(&series), ColumnKind::String);
    }

    #[test]
    fn test_classify_date_strings() {
        let series = Series::new(
            "joined".into(),
            &["2024-01-15", "2024-02-20", "2024-03-25"],
        );
        assert_eq!(classify_series(&series), ColumnKind::Datetime);
    }

    #[test]
    fn test_classify_all_null_string_column() {
        let series = Series::new("empty".into(), &[None::<&str>, None, None]);
        assert_eq!(classify_series(&series), ColumnKind::String);
    }

    #[test]
    fn test_classify_all_null_numeric_column() {
        let series = Series::new("empty".into(), &[None::<f64>, None]);
        assert_eq!(classify_series(&series), ColumnKind::Numeric);
    }

    #[test]
    fn test_classify_boolean_is_string_kind() {
        let series = Series::new("flag".into(), &[true, false]);
        assert_eq!(classify_series(&series), ColumnKind::String);
    }

    #[test]
    fn test_is_datetime_string() {
        assert!(is_datetime_string("2024-01-15"));
        assert!(is_datetime_string("01/15/2024"));
        assert!(is_datetime_string("2024-01-15 10:30:00"));
        assert!(is_datetime_string("2024-01-15T10:30:00"));
        assert!(!is_datetime_string("1705312200"));
        assert!(!is_datetime_string("not a date"));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let df = df![
            "a" => ["1", "2", "x"],
            "b" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();
        assert_eq!(classify(&df), classify(&df));
    }
}
