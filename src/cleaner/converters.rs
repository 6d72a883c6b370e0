//! Column type coercion.
//!
//! Conversions are null-tolerant: a cell that cannot be coerced becomes
//! null instead of failing the whole column. Nulls stay null through every
//! conversion.

use crate::utils::{format_cell, is_datetime_dtype, is_numeric_dtype, parse_numeric_string};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Datetime layouts tried in order when coercing text.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts, promoted to midnight.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Millisecond timestamps are larger than any plausible second timestamp.
const EPOCH_MILLIS_CUTOFF: f64 = 1e11;

/// Coerce a column to Float64.
///
/// Text cells go through light normalization first (currency symbols,
/// thousands separators, percent signs are stripped); anything that still
/// does not parse becomes null. Temporal cells coerce through their
/// physical representation.
pub fn to_numeric(series: &Series) -> PolarsResult<Series> {
    if is_numeric_dtype(series.dtype()) {
        return series.cast(&DataType::Float64);
    }
    if is_datetime_dtype(series.dtype()) {
        return series.to_physical_repr().cast(&DataType::Float64);
    }

    let str_series = series.cast(&DataType::String)?;
    let values: Vec<Option<f64>> = str_series
        .str()?
        .into_iter()
        .map(|v| v.and_then(parse_numeric_string))
        .collect();
    Ok(Series::new(series.name().clone(), values))
}

/// Coerce a column to millisecond-precision datetimes.
///
/// Numeric cells are treated as epoch timestamps, seconds or milliseconds
/// by magnitude. Text cells are tried against the known layouts and
/// become null when none matches.
pub fn to_datetime(series: &Series) -> PolarsResult<Series> {
    if is_datetime_dtype(series.dtype()) {
        return Ok(series.clone());
    }

    let millis: Vec<Option<i64>> = if is_numeric_dtype(series.dtype()) {
        series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(epoch_to_millis))
            .collect()
    } else {
        series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| {
                v.and_then(parse_datetime_str)
                    .map(|dt| dt.and_utc().timestamp_millis())
            })
            .collect()
    };

    Series::new(series.name().clone(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

/// Coerce a column to text. Nulls stay null rather than becoming a
/// literal placeholder.
pub fn to_string(series: &Series) -> PolarsResult<Series> {
    if series.dtype() == &DataType::String {
        return Ok(series.clone());
    }

    let mut values: Vec<Option<String>> = Vec::with_capacity(series.len());
    for idx in 0..series.len() {
        let cell = series.get(idx)?;
        match cell {
            AnyValue::Null => values.push(None),
            other => values.push(Some(format_cell(&other))),
        }
    }
    Ok(Series::new(series.name().clone(), values))
}

/// Parse a datetime string against the known layouts.
pub fn parse_datetime_str(s: &str) -> Option<NaiveDateTime> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn epoch_to_millis(value: f64) -> i64 {
    if value.abs() >= EPOCH_MILLIS_CUTOFF {
        value as i64
    } else {
        (value * 1000.0) as i64
    }
}
