//! Remediation engine: the four transformations that actually change a
//! table.
//!
//! Each operation takes a table by reference and returns a new one. A
//! column named in a request that does not exist in the table is skipped
//! with a warning instead of failing, so one request can be replayed
//! against a family of similarly shaped files.

pub mod converters;
pub mod imputers;

use crate::error::{Result, ResultExt};
use crate::inspector::first_occurrence_mask;
use crate::plan::{MissingStrategy, OutlierMethod};
use crate::types::ColumnKind;
use crate::utils::{is_numeric_dtype, quantile_linear, sorted_numeric_values};
use polars::prelude::*;
use tracing::{debug, warn};

/// Multiplier for the interquartile range fences.
const IQR_FENCE: f64 = 1.5;

/// Drop every row that exactly repeats an earlier row.
///
/// The first occurrence survives and row order is otherwise preserved, so
/// the operation is idempotent.
pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame> {
    if df.width() == 0 || df.height() == 0 {
        return Ok(df.clone());
    }

    let mask = first_occurrence_mask(df);
    let result = df.filter(&mask)?;
    debug!(
        removed = df.height() - result.height(),
        "removed duplicate rows"
    );
    Ok(result)
}

/// Apply a missing-value strategy per column, in the order given.
///
/// A `Drop` strategy removes whole rows and therefore changes what the
/// later strategies see.
pub fn handle_missing_values(
    df: &DataFrame,
    strategies: &[(String, MissingStrategy)],
) -> Result<DataFrame> {
    let mut result = df.clone();

    for (column, strategy) in strategies {
        if result.column(column).is_err() {
            warn!(column = %column, "column not found, skipping missing-value strategy");
            continue;
        }

        match strategy {
            MissingStrategy::Drop => {
                let mask = result
                    .column(column)?
                    .as_materialized_series()
                    .is_not_null();
                result = result.filter(&mask)?;
            }
            MissingStrategy::Mean => {
                let filled =
                    imputers::fill_with_mean(result.column(column)?.as_materialized_series())?;
                result.replace(column, filled)?;
            }
            MissingStrategy::Median => {
                let filled =
                    imputers::fill_with_median(result.column(column)?.as_materialized_series())?;
                result.replace(column, filled)?;
            }
            MissingStrategy::Mode => {
                let filled =
                    imputers::fill_with_mode(result.column(column)?.as_materialized_series())?;
                result.replace(column, filled)?;
            }
            MissingStrategy::Zero => {
                let filled =
                    imputers::fill_with_zero(result.column(column)?.as_materialized_series())?;
                result.replace(column, filled)?;
            }
        }
    }

    Ok(result)
}

/// Coerce columns to the requested kinds.
///
/// Cells that cannot be coerced become null; they surface in the next
/// missing-value report instead of aborting the conversion.
pub fn fix_data_types(df: &DataFrame, fixes: &[(String, ColumnKind)]) -> Result<DataFrame> {
    let mut result = df.clone();

    for (column, kind) in fixes {
        let Ok(col) = result.column(column) else {
            warn!(column = %column, "column not found, skipping type fix");
            continue;
        };
        let series = col.as_materialized_series();

        let converted = match kind {
            ColumnKind::Numeric => converters::to_numeric(series),
            ColumnKind::Datetime => converters::to_datetime(series),
            ColumnKind::String => converters::to_string(series),
        }
        .context(format!("Converting column '{}' to {}", column, kind))?;
        result.replace(column, converted)?;
    }

    Ok(result)
}

/// Remove rows whose value lies outside the IQR fences of a column.
///
/// Columns are processed one at a time and each filter runs on the
/// remaining rows, so the fences of later columns are computed after
/// earlier columns have already removed rows. Null cells never disqualify
/// a row; non-numeric and unknown columns are skipped.
pub fn remove_outliers(
    df: &DataFrame,
    columns: &[String],
    method: OutlierMethod,
) -> Result<DataFrame> {
    let OutlierMethod::Iqr = method;
    let mut result = df.clone();

    for column in columns {
        let Ok(col) = result.column(column) else {
            warn!(column = %column, "column not found, skipping outlier removal");
            continue;
        };
        let series = col.as_materialized_series().clone();
        if !is_numeric_dtype(series.dtype()) {
            warn!(column = %column, "column is not numeric, skipping outlier removal");
            continue;
        }

        let sorted = sorted_numeric_values(&series)
            .context(format!("Computing outlier fences for '{}'", column))?;
        let (Some(q1), Some(q3)) = (
            quantile_linear(&sorted, 0.25),
            quantile_linear(&sorted, 0.75),
        ) else {
            continue;
        };
        let iqr = q3 - q1;
        let lower = q1 - IQR_FENCE * iqr;
        let upper = q3 + IQR_FENCE * iqr;

        let as_f64 = series.cast(&DataType::Float64)?;
        let keep: Vec<bool> = as_f64
            .f64()?
            .into_iter()
            .map(|v| match v {
                Some(v) => v >= lower && v <= upper,
                None => true,
            })
            .collect();
        let mask = BooleanChunked::from_slice("keep".into(), &keep);

        let before = result.height();
        result = result.filter(&mask)?;
        debug!(
            column = %column,
            removed = before - result.height(),
            lower,
            upper,
            "applied outlier fences"
        );
    }

    Ok(result)
}
