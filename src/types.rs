//! Shared types for reports produced by the inspector and consumed by a
//! presentation layer.
//!
//! Everything here is serde-serializable; the presentation layer renders
//! these structures directly (tables, charts, recommendation text).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Semantic kind of a column, one of the three coarse buckets the engine
/// understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Integer or floating point numbers.
    Numeric,
    /// Calendar dates or timestamps.
    Datetime,
    /// Everything else (text, categoricals, booleans).
    String,
}

impl ColumnKind {
    /// Lowercase token used in user-facing output and strategy parsing.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Datetime => "datetime",
            ColumnKind::String => "string",
        }
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(ColumnKind::Numeric),
            "datetime" => Ok(ColumnKind::Datetime),
            "string" => Ok(ColumnKind::String),
            other => Err(format!(
                "unknown column kind '{}' (expected numeric, datetime or string)",
                other
            )),
        }
    }
}

/// Mapping from column name to classified kind. Recomputed from cell
/// values on every call; never cached across transformations.
pub type ColumnTypeMap = HashMap<String, ColumnKind>;

/// Mapping from column name to percentage (0-100) of null cells.
pub type MissingValueReport = HashMap<String, f64>;

/// Mapping from column name to human-readable type-consistency issues.
pub type TypeIssueReport = HashMap<String, Vec<String>>;

/// Rows that are exact duplicates of an earlier row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Number of rows at or after the second occurrence of their value-tuple.
    pub count: usize,
    /// Zero-based positions of those rows, ascending.
    pub indices: Vec<usize>,
}

impl DuplicateReport {
    /// A report for a table with no repeated rows.
    pub fn empty() -> Self {
        Self {
            count: 0,
            indices: Vec::new(),
        }
    }
}

/// Per-column statistics for the dataset summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Stored Polars dtype, as text.
    pub dtype: String,
    /// Classified semantic kind.
    pub kind: ColumnKind,
    pub null_count: usize,
    pub null_percentage: f64,
    pub unique_count: usize,
    /// Minimum value for numeric columns.
    pub min: Option<f64>,
    /// Maximum value for numeric columns.
    pub max: Option<f64>,
    /// Mean for numeric columns.
    pub mean: Option<f64>,
    /// A few non-null values, formatted for display.
    pub sample_values: Vec<String>,
}

/// Summary of a whole table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    /// (rows, columns).
    pub shape: (usize, usize),
    pub columns: Vec<ColumnSummary>,
    pub duplicate_count: usize,
}

/// A remediation recommendation derived from the quality reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
}
