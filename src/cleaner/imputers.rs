//! Per-column missing-value imputation.
//!
//! Every function returns a new Series and leaves the input untouched.
//! Statistics are computed over the non-null values only; a column with no
//! non-null values has no mean, median or mode, and the fill becomes a
//! no-op rather than an error.

use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, is_datetime_dtype, is_numeric_dtype, numeric_mode,
    quantile_linear, sorted_numeric_values, string_mode,
};
use polars::prelude::*;

/// Fill nulls with the mean of the column.
///
/// Non-numeric columns are returned unchanged; a mean of text is not
/// meaningful. The result of a successful fill is Float64.
pub fn fill_with_mean(series: &Series) -> PolarsResult<Series> {
    if !is_numeric_dtype(series.dtype()) {
        return Ok(series.clone());
    }
    let mean = series.cast(&DataType::Float64)?.f64()?.mean();
    match mean {
        Some(mean) => fill_numeric_nulls(series, mean),
        None => Ok(series.clone()),
    }
}

/// Fill nulls with the median of the column.
///
/// The median of an even-count column is the midpoint of the two central
/// values. Non-numeric columns are returned unchanged.
pub fn fill_with_median(series: &Series) -> PolarsResult<Series> {
    if !is_numeric_dtype(series.dtype()) {
        return Ok(series.clone());
    }
    let sorted = sorted_numeric_values(series)?;
    match quantile_linear(&sorted, 0.5) {
        Some(median) => fill_numeric_nulls(series, median),
        None => Ok(series.clone()),
    }
}

/// Fill nulls with the most frequent value of the column.
///
/// Frequency ties go to the value that appears first. Works on every
/// column kind; datetime columns are filled through their physical
/// representation so the dtype survives.
pub fn fill_with_mode(series: &Series) -> PolarsResult<Series> {
    if is_numeric_dtype(series.dtype()) {
        return match numeric_mode(series) {
            Some(mode) => fill_numeric_nulls(series, mode),
            None => Ok(series.clone()),
        };
    }
    if is_datetime_dtype(series.dtype()) {
        return match physical_mode(series)? {
            Some(mode) => fill_physical_nulls(series, mode),
            None => Ok(series.clone()),
        };
    }
    match string_mode(series) {
        Some(mode) => fill_string_nulls(series, &mode),
        None => Ok(series.clone()),
    }
}

/// Fill nulls with a zero value appropriate for the column kind: `0.0`
/// for numeric columns, `"0"` for string columns and the epoch for
/// datetime columns.
pub fn fill_with_zero(series: &Series) -> PolarsResult<Series> {
    if is_numeric_dtype(series.dtype()) {
        return fill_numeric_nulls(series, 0.0);
    }
    if is_datetime_dtype(series.dtype()) {
        return fill_physical_nulls(series, 0);
    }
    fill_string_nulls(series, "0")
}

/// Most frequent physical (Int64) value of a temporal Series.
fn physical_mode(series: &Series) -> PolarsResult<Option<i64>> {
    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
    let chunked = physical.i64()?;

    let mut counts: std::collections::HashMap<i64, (usize, usize)> =
        std::collections::HashMap::new();
    for (idx, val) in chunked.into_iter().enumerate() {
        if let Some(val) = val {
            let entry = counts.entry(val).or_insert((0, idx));
            entry.0 += 1;
        }
    }

    Ok(counts
        .into_iter()
        .min_by_key(|(_, (count, first_idx))| (std::cmp::Reverse(*count), *first_idx))
        .map(|(val, _)| val))
}

/// Fill nulls of a temporal Series through its Int64 physical values,
/// then cast back to the original dtype.
fn fill_physical_nulls(series: &Series, fill_value: i64) -> PolarsResult<Series> {
    let dtype = series.dtype().clone();
    let physical = series.to_physical_repr().cast(&DataType::Int64)?;
    let filled = physical
        .i64()?
        .apply(|v| Some(v.unwrap_or(fill_value)))
        .into_series();
    filled.cast(&dtype).map(|s| s.with_name(series.name().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> Series {
        Series::new("score".into(), vec![Some(10.0), None, Some(30.0), Some(20.0)])
    }

    #[test]
    fn test_fill_with_mean() {
        let filled = fill_with_mean(&scores()).unwrap();
        let values: Vec<f64> = filled.f64().unwrap().into_iter().flatten().collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0, 20.0]);
        assert_eq!(filled.null_count(), 0);
    }

    #[test]
    fn test_fill_with_median_even_count() {
        let series = Series::new("v".into(), vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), None]);
        let filled = fill_with_median(&series).unwrap();
        assert_eq!(filled.f64().unwrap().get(4), Some(2.5));
    }

    #[test]
    fn test_fill_with_mean_integer_column_becomes_float() {
        let series = Series::new("n".into(), vec![Some(1i64), Some(3), None]);
        let filled = fill_with_mean(&series).unwrap();
        assert_eq!(filled.dtype(), &DataType::Float64);
        assert_eq!(filled.f64().unwrap().get(2), Some(2.0));
    }

    #[test]
    fn test_fill_with_mean_on_string_column_is_noop() {
        let series = Series::new("name".into(), vec![Some("a"), None]);
        let filled = fill_with_mean(&series).unwrap();
        assert_eq!(filled.null_count(), 1);
        assert_eq!(filled.dtype(), &DataType::String);
    }

    #[test]
    fn test_fill_with_mode_string() {
        let series = Series::new("name".into(), vec![Some("b"), Some("a"), Some("b"), None]);
        let filled = fill_with_mode(&series).unwrap();
        assert_eq!(filled.str().unwrap().get(3), Some("b"));
    }

    #[test]
    fn test_fill_with_mode_tie_goes_to_first_appearance() {
        let series = Series::new("name".into(), vec![Some("x"), Some("y"), None]);
        let filled = fill_with_mode(&series).unwrap();
        assert_eq!(filled.str().unwrap().get(2), Some("x"));
    }

    #[test]
    fn test_fill_with_mode_numeric() {
        let series = Series::new("v".into(), vec![Some(5.0), Some(7.0), Some(7.0), None]);
        let filled = fill_with_mode(&series).unwrap();
        assert_eq!(filled.f64().unwrap().get(3), Some(7.0));
    }

    #[test]
    fn test_fill_with_zero_numeric() {
        let filled = fill_with_zero(&scores()).unwrap();
        assert_eq!(filled.f64().unwrap().get(1), Some(0.0));
    }

    #[test]
    fn test_fill_with_zero_string() {
        let series = Series::new("name".into(), vec![Some("a"), None]);
        let filled = fill_with_zero(&series).unwrap();
        assert_eq!(filled.str().unwrap().get(1), Some("0"));
    }

    #[test]
    fn test_all_null_column_mean_is_noop() {
        let series = Series::new("v".into(), vec![None::<f64>, None]);
        let filled = fill_with_mean(&series).unwrap();
        assert_eq!(filled.null_count(), 2);
    }

    #[test]
    fn test_all_null_column_mode_is_noop() {
        let series = Series::new("v".into(), vec![None::<f64>, None]);
        let filled = fill_with_mode(&series).unwrap();
        assert_eq!(filled.null_count(), 2);
    }
}
