//! Read-only quality analyses over a table.
//!
//! Three independent analyses: missing values, duplicate rows, and
//! type-consistency issues. None of them mutate the input, and none of
//! them raise on malformed cell values; an unparseable cell is a data
//! quality finding, not an error.

mod recommend;
mod summary;

pub use recommend::recommend;
pub use summary::summarize;

use crate::classifier;
use crate::types::{ColumnKind, DuplicateReport, MissingValueReport, TypeIssueReport};
use crate::utils::{is_numeric_dtype, parse_numeric_string};
use polars::prelude::*;
use std::collections::HashSet;

/// Percentage of null cells per column.
///
/// A zero-row table reports 0% for every column.
pub fn missing_report(df: &DataFrame) -> MissingValueReport {
    let total_rows = df.height();
    let mut report = MissingValueReport::with_capacity(df.width());

    for col in df.get_columns() {
        let pct = if total_rows == 0 {
            0.0
        } else {
            col.null_count() as f64 / total_rows as f64 * 100.0
        };
        report.insert(col.name().to_string(), pct);
    }

    report
}

/// Rows that exactly repeat an earlier row.
///
/// A row is a duplicate if a row with equal values in every column
/// (nulls compare equal to nulls) occurred at a lower index. Only rows at
/// or after the second occurrence are counted; their zero-based positions
/// are returned in ascending order.
pub fn duplicate_report(df: &DataFrame) -> DuplicateReport {
    if df.width() == 0 || df.height() == 0 {
        return DuplicateReport::empty();
    }

    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(df.height());
    let mut indices = Vec::new();

    for idx in 0..df.height() {
        let key = row_key(df, idx);
        if !seen.insert(key) {
            indices.push(idx);
        }
    }

    DuplicateReport {
        count: indices.len(),
        indices,
    }
}

/// Boolean mask that is true for the first occurrence of each distinct
/// row. Shared with the remediation engine so duplicate detection and
/// duplicate removal agree on the definition.
pub(crate) fn first_occurrence_mask(df: &DataFrame) -> BooleanChunked {
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(df.height());
    let mask: Vec<bool> = (0..df.height()).map(|idx| seen.insert(row_key(df, idx))).collect();
    BooleanChunked::from_slice("first_occurrence".into(), &mask)
}

/// Value-tuple of a row, usable as a hash key. `AnyValue`'s `Debug`
/// representation keeps kinds distinct (the string "1" never collides with
/// the integer 1) and renders nulls identically.
fn row_key(df: &DataFrame, idx: usize) -> Vec<String> {
    df.get_columns()
        .iter()
        .map(|col| {
            col.as_materialized_series()
                .get(idx)
                .map(|v| format!("{:?}", v))
                .unwrap_or_default()
        })
        .collect()
}

/// Type-consistency issues per column.
///
/// Only columns classified numeric can carry issues: every non-null cell
/// is checked against numeric coercion and the failures are counted. Null
/// cells are missing, not malformed, and belong to [`missing_report`].
pub fn type_issues(df: &DataFrame) -> TypeIssueReport {
    let mut report = TypeIssueReport::new();
    let types = classifier::classify(df);

    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let name = series.name().to_string();
        if types.get(&name) != Some(&ColumnKind::Numeric) {
            continue;
        }
        // Cells of a natively numeric column cannot fail coercion.
        if is_numeric_dtype(series.dtype()) {
            continue;
        }

        let Ok(str_chunked) = series.str() else {
            continue;
        };
        let non_numeric = str_chunked
            .into_iter()
            .flatten()
            .filter(|v| !v.trim().is_empty() && parse_numeric_string(v).is_none())
            .count();

        if non_numeric > 0 {
            report.insert(
                name,
                vec![format!("Contains {} non-numeric values", non_numeric)],
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_report_basic() {
        let df = df![
            "id" => [1i64, 1, 2],
            "name" => ["a", "a", "b"],
            "score" => [Some(10.0), Some(10.0), None],
        ]
        .unwrap();

        let report = missing_report(&df);
        assert_eq!(report["id"], 0.0);
        assert_eq!(report["name"], 0.0);
        assert!((report["score"] - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_report_fully_null_column() {
        let df = df![
            "empty" => [None::<f64>, None, None],
        ]
        .unwrap();

        assert_eq!(missing_report(&df)["empty"], 100.0);
    }

    #[test]
    fn test_missing_report_zero_rows_no_division() {
        let df = df![
            "a" => Vec::<i64>::new(),
        ]
        .unwrap();

        assert_eq!(missing_report(&df)["a"], 0.0);
    }

    #[test]
    fn test_duplicate_report_counts_later_occurrences_only() {
        let df = df![
            "id" => [1i64, 1, 2],
            "name" => ["a", "a", "b"],
            "score" => [Some(10.0), Some(10.0), None],
        ]
        .unwrap();

        let report = duplicate_report(&df);
        assert_eq!(report.count, 1);
        assert_eq!(report.indices, vec![1]);
    }

    #[test]
    fn test_duplicate_report_no_duplicates() {
        let df = df![
            "id" => [1i64, 2, 3],
        ]
        .unwrap();

        let report = duplicate_report(&df);
        assert_eq!(report.count, 0);
        assert!(report.indices.is_empty());
    }

    #[test]
    fn test_duplicate_report_null_equals_null() {
        let df = df![
            "v" => [None::<f64>, None, Some(1.0)],
        ]
        .unwrap();

        let report = duplicate_report(&df);
        assert_eq!(report.count, 1);
        assert_eq!(report.indices, vec![1]);
    }

    #[test]
    fn test_duplicate_report_triplicate() {
        let df = df![
            "v" => ["x", "x", "x", "y"],
        ]
        .unwrap();

        let report = duplicate_report(&df);
        assert_eq!(report.count, 2);
        assert_eq!(report.indices, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_report_empty_schema() {
        let df = DataFrame::empty();
        let report = duplicate_report(&df);
        assert_eq!(report.count, 0);
        assert!(report.indices.is_empty());
    }

    #[test]
    fn test_type_issues_counts_bad_cells() {
        // Mostly numeric strings: classified numeric, one straggler.
        let df = df![
            "amount" => ["1", "2", "3", "4", "oops"],
        ]
        .unwrap();

        let report = type_issues(&df);
        assert_eq!(
            report["amount"],
            vec!["Contains 1 non-numeric values".to_string()]
        );
    }

    #[test]
    fn test_type_issues_clean_numeric_column() {
        let df = df![
            "amount" => [1.0, 2.0, 3.0],
        ]
        .unwrap();

        assert!(type_issues(&df).is_empty());
    }

    #[test]
    fn test_type_issues_ignores_string_columns() {
        let df = df![
            "name" => ["alice", "bob", "carol"],
        ]
        .unwrap();

        assert!(type_issues(&df).is_empty());
    }

    #[test]
    fn test_type_issues_nulls_are_not_failures() {
        let df = df![
            "amount" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();

        assert!(type_issues(&df).is_empty());
    }

    #[test]
    fn test_analyses_do_not_mutate_input() {
        let df = df![
            "v" => ["x", "x", "1"],
        ]
        .unwrap();
        let before = df.clone();

        let _ = missing_report(&df);
        let _ = duplicate_report(&df);
        let _ = type_issues(&df);

        assert!(df.equals_missing(&before));
    }
}
