//! Table Quality Inspection and Remediation Library
//!
//! A data-quality engine built with Rust and Polars for tabular files.
//!
//! # Overview
//!
//! This library provides three layers over a loaded table:
//!
//! - **Type Classification**: Assign every column one of three semantic
//!   kinds (numeric, datetime, string) from its stored dtype and cell values
//! - **Quality Inspection**: Missing-value percentages, duplicate rows,
//!   type-consistency issues, whole-table summaries and recommendations
//! - **Remediation**: Duplicate removal, per-column missing-value
//!   strategies, null-tolerant type coercion and IQR outlier removal
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tablescrub::{inspector, io, CleaningPlan, MissingStrategy};
//!
//! let df = io::load_table("data.csv")?;
//!
//! // Inspect
//! let summary = inspector::summarize(&df);
//! println!("{} duplicate rows", summary.duplicate_count);
//!
//! // Remediate
//! let cleaned = CleaningPlan::new()
//!     .with_remove_duplicates(true)
//!     .with_missing_strategy("score", MissingStrategy::Median)
//!     .apply(&df)?;
//!
//! std::fs::write("cleaned.csv", io::write_csv(&cleaned)?)?;
//! ```
//!
//! Every inspection is read-only and every remediation returns a new
//! table; nothing mutates its input.

pub mod classifier;
pub mod cleaner;
pub mod error;
pub mod inspector;
pub mod io;
pub mod plan;
pub mod types;
pub mod utils;

pub use error::{Result, ScrubError};
pub use plan::{CleaningPlan, MissingStrategy, OutlierMethod, PlanValidationError};
pub use types::{
    ColumnKind, ColumnSummary, ColumnTypeMap, DuplicateReport, MissingValueReport, Recommendation,
    TableSummary, TypeIssueReport,
};
