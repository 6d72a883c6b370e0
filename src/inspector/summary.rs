//! Whole-table summary: shape, per-column statistics and duplicates.

use crate::classifier;
use crate::types::{ColumnKind, ColumnSummary, TableSummary};
use crate::utils::{collect_sample_values, is_numeric_dtype};
use polars::prelude::*;

use super::duplicate_report;

const SAMPLE_SIZE: usize = 5;

/// Summarize a table for display.
///
/// Numeric min/max/mean are computed on a Float64 cast so integer and
/// float columns report on the same scale; they stay `None` for
/// non-numeric columns and for columns that are entirely null.
pub fn summarize(df: &DataFrame) -> TableSummary {
    let types = classifier::classify(df);
    let total_rows = df.height();

    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            let name = series.name().to_string();
            let kind = types.get(&name).copied().unwrap_or(ColumnKind::String);

            let null_count = series.null_count();
            let null_percentage = if total_rows == 0 {
                0.0
            } else {
                null_count as f64 / total_rows as f64 * 100.0
            };
            let unique_count = series.n_unique().unwrap_or(0);

            let (min, max, mean) = numeric_stats(series);

            ColumnSummary {
                name,
                dtype: series.dtype().to_string(),
                kind,
                null_count,
                null_percentage,
                unique_count,
                min,
                max,
                mean,
                sample_values: collect_sample_values(series, SAMPLE_SIZE),
            }
        })
        .collect();

    TableSummary {
        shape: (df.height(), df.width()),
        columns,
        duplicate_count: duplicate_report(df).count,
    }
}

fn numeric_stats(series: &Series) -> (Option<f64>, Option<f64>, Option<f64>) {
    if !is_numeric_dtype(series.dtype()) {
        return (None, None, None);
    }
    let Ok(as_f64) = series.cast(&DataType::Float64) else {
        return (None, None, None);
    };
    let Ok(values) = as_f64.f64() else {
        return (None, None, None);
    };
    (values.min(), values.max(), values.mean())
}
