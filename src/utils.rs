//! Shared helpers for classification, inspection and remediation.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Characters commonly used in numeric formatting that should be stripped
/// before parsing.
pub const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Clean a string for numeric parsing by removing formatting characters.
pub fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Try to parse a string as a numeric value (f64).
///
/// Tolerates common formatting like currency symbols, percentages, and
/// thousands separators. Returns `None` for anything else.
pub fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Check if a string can be parsed as a numeric value.
pub fn is_numeric_string(s: &str) -> bool {
    parse_numeric_string(s).is_some()
}

// =============================================================================
// Statistics Utilities
// =============================================================================

/// Quantile of a slice using linear interpolation between closest ranks.
///
/// `q` is in [0, 1]. The slice must be sorted ascending. Returns `None`
/// for an empty slice.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = pos - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Collect the non-null values of a numeric Series as a sorted `Vec<f64>`.
pub fn sorted_numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.drop_nulls().cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(values)
}

/// Mode of a string Series: most frequent non-null value, ties broken by
/// first appearance order in the column.
pub fn string_mode(series: &Series) -> Option<String> {
    let str_series = series.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut counts: std::collections::HashMap<&str, (usize, usize)> =
        std::collections::HashMap::new();
    for (idx, val) in str_chunked.into_iter().enumerate() {
        if let Some(val) = val {
            let entry = counts.entry(val).or_insert((0, idx));
            entry.0 += 1;
        }
    }

    counts
        .into_iter()
        .min_by_key(|(_, (count, first_idx))| (std::cmp::Reverse(*count), *first_idx))
        .map(|(val, _)| val.to_string())
}

/// Mode of a numeric Series: most frequent non-null value, ties broken by
/// first appearance order in the column.
pub fn numeric_mode(series: &Series) -> Option<f64> {
    let float_series = series.cast(&DataType::Float64).ok()?;
    let chunked = float_series.f64().ok()?;

    // f64 keys via bit pattern; values compared for equality only.
    let mut counts: std::collections::HashMap<u64, (usize, usize, f64)> =
        std::collections::HashMap::new();
    for (idx, val) in chunked.into_iter().enumerate() {
        if let Some(val) = val {
            let entry = counts.entry(val.to_bits()).or_insert((0, idx, val));
            entry.0 += 1;
        }
    }

    counts
        .into_values()
        .min_by_key(|(count, first_idx, _)| (std::cmp::Reverse(*count), *first_idx))
        .map(|(_, _, val)| val)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always Float64.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let filled = float_series
        .f64()?
        .apply(|v| Some(v.unwrap_or(fill_value)));
    Ok(filled.into_series().with_name(series.name().clone()))
}

/// Fill null values in a string Series with a specific value.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let mut result_vec: Vec<Option<String>> = Vec::with_capacity(series.len());
    for val in str_series.str()?.into_iter() {
        match val {
            Some(v) => result_vec.push(Some(v.to_string())),
            None => result_vec.push(Some(fill_value.to_string())),
        }
    }
    Ok(Series::new(series.name().clone(), result_vec))
}

/// Collect up to `max_samples` non-null values from a Series, formatted
/// for display.
pub fn collect_sample_values(series: &Series, max_samples: usize) -> Vec<String> {
    let non_null = series.drop_nulls();
    let sample_size = std::cmp::min(max_samples, non_null.len());
    let mut samples = Vec::with_capacity(sample_size);

    for i in 0..sample_size {
        if let Ok(val) = non_null.get(i) {
            samples.push(format_cell(&val));
        }
    }

    samples
}

/// Plain textual representation of a cell value.
///
/// Unlike `AnyValue`'s `Display`, strings are not quoted and nulls render
/// as an empty string.
pub fn format_cell(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => format!("{}", other),
    }
}

// =============================================================================
// Tests
// =============================================================================
