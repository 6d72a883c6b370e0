//! Declarative cleaning plans.
//!
//! A [`CleaningPlan`] bundles the four remediation steps into a single
//! validated value that is applied in a fixed order: duplicates first,
//! then missing values, then type fixes, then outliers. Each step runs on
//! the output of the previous one.

use crate::cleaner;
use crate::error::{Result, ScrubError};
use crate::types::ColumnKind;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How to remediate null cells in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingStrategy {
    /// Drop every row where this column is null.
    Drop,
    /// Fill nulls with the column mean. Numeric columns only.
    Mean,
    /// Fill nulls with the column median. Numeric columns only.
    Median,
    /// Fill nulls with the most frequent value.
    Mode,
    /// Fill nulls with a zero value appropriate for the column.
    Zero,
}

impl MissingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingStrategy::Drop => "drop",
            MissingStrategy::Mean => "mean",
            MissingStrategy::Median => "median",
            MissingStrategy::Mode => "mode",
            MissingStrategy::Zero => "zero",
        }
    }
}

impl std::fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MissingStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(MissingStrategy::Drop),
            "mean" => Ok(MissingStrategy::Mean),
            "median" => Ok(MissingStrategy::Median),
            "mode" => Ok(MissingStrategy::Mode),
            "zero" => Ok(MissingStrategy::Zero),
            other => Err(format!(
                "unknown missing-value strategy '{}' (expected drop, mean, median, mode or zero)",
                other
            )),
        }
    }
}

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Interquartile range fences at 1.5 IQR beyond Q1 and Q3.
    Iqr,
}

impl std::str::FromStr for OutlierMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(OutlierMethod::Iqr),
            other => Err(format!("unknown outlier method '{}' (expected iqr)", other)),
        }
    }
}

/// Validation failure for a [`CleaningPlan`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanValidationError {
    #[error("column '{0}' has more than one missing-value strategy")]
    DuplicateMissingColumn(String),

    #[error("column '{0}' has more than one type fix")]
    DuplicateTypeFixColumn(String),

    #[error("column '{0}' is listed more than once for outlier removal")]
    DuplicateOutlierColumn(String),
}

/// An ordered set of remediation steps.
///
/// Columns named in a plan do not have to exist in the table the plan is
/// applied to; missing columns are skipped with a warning so one plan can
/// serve a family of similarly shaped files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub remove_duplicates: bool,
    pub missing: Vec<(String, MissingStrategy)>,
    pub type_fixes: Vec<(String, ColumnKind)>,
    pub outlier_columns: Vec<String>,
    pub outlier_method: Option<OutlierMethod>,
}

impl CleaningPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_remove_duplicates(mut self, enabled: bool) -> Self {
        self.remove_duplicates = enabled;
        self
    }

    pub fn with_missing_strategy(
        mut self,
        column: impl Into<String>,
        strategy: MissingStrategy,
    ) -> Self {
        self.missing.push((column.into(), strategy));
        self
    }

    pub fn with_type_fix(mut self, column: impl Into<String>, kind: ColumnKind) -> Self {
        self.type_fixes.push((column.into(), kind));
        self
    }

    pub fn with_outlier_removal(mut self, columns: Vec<String>, method: OutlierMethod) -> Self {
        self.outlier_columns = columns;
        self.outlier_method = Some(method);
        self
    }

    /// True when the plan performs no work at all.
    pub fn is_empty(&self) -> bool {
        !self.remove_duplicates
            && self.missing.is_empty()
            && self.type_fixes.is_empty()
            && self.outlier_columns.is_empty()
    }

    /// Reject plans that name the same column twice within one step.
    pub fn validate(&self) -> std::result::Result<(), PlanValidationError> {
        let mut seen = std::collections::HashSet::new();
        for (column, _) in &self.missing {
            if !seen.insert(column.as_str()) {
                return Err(PlanValidationError::DuplicateMissingColumn(column.clone()));
            }
        }

        seen.clear();
        for (column, _) in &self.type_fixes {
            if !seen.insert(column.as_str()) {
                return Err(PlanValidationError::DuplicateTypeFixColumn(column.clone()));
            }
        }

        seen.clear();
        for column in &self.outlier_columns {
            if !seen.insert(column.as_str()) {
                return Err(PlanValidationError::DuplicateOutlierColumn(column.clone()));
            }
        }

        Ok(())
    }

    /// Run every configured step, each on the output of the previous one.
    /// An invalid plan is rejected before anything runs.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        self.validate()
            .map_err(|e| ScrubError::InvalidConfig(e.to_string()))?;

        let mut result = df.clone();

        if self.remove_duplicates {
            result = cleaner::remove_duplicates(&result)?;
        }
        if !self.missing.is_empty() {
            result = cleaner::handle_missing_values(&result, &self.missing)?;
        }
        if !self.type_fixes.is_empty() {
            result = cleaner::fix_data_types(&result, &self.type_fixes)?;
        }
        if !self.outlier_columns.is_empty() {
            let method = self.outlier_method.unwrap_or(OutlierMethod::Iqr);
            result = cleaner::remove_outliers(&result, &self.outlier_columns, method)?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strategy_round_trip() {
        for token in ["drop", "mean", "median", "mode", "zero"] {
            let strategy: MissingStrategy = token.parse().unwrap();
            assert_eq!(strategy.as_str(), token);
        }
    }

    #[test]
    fn test_strategy_unknown_token() {
        let err = "average".parse::<MissingStrategy>().unwrap_err();
        assert!(err.contains("average"));
    }

    #[test]
    fn test_validate_rejects_duplicate_missing_column() {
        let plan = CleaningPlan::new()
            .with_missing_strategy("score", MissingStrategy::Mean)
            .with_missing_strategy("score", MissingStrategy::Zero);

        assert_eq!(
            plan.validate(),
            Err(PlanValidationError::DuplicateMissingColumn("score".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_type_fix() {
        let plan = CleaningPlan::new()
            .with_type_fix("amount", ColumnKind::Numeric)
            .with_type_fix("amount", ColumnKind::String);

        assert_eq!(
            plan.validate(),
            Err(PlanValidationError::DuplicateTypeFixColumn("amount".to_string()))
        );
    }

    #[test]
    fn test_validate_accepts_same_column_across_steps() {
        let plan = CleaningPlan::new()
            .with_missing_strategy("score", MissingStrategy::Mean)
            .with_type_fix("score", ColumnKind::Numeric)
            .with_outlier_removal(vec!["score".to_string()], OutlierMethod::Iqr);

        assert_eq!(plan.validate(), Ok(()));
    }

    #[test]
    fn test_empty_plan_is_identity() {
        let df = df![
            "id" => [1i64, 1, 2],
        ]
        .unwrap();

        let plan = CleaningPlan::new();
        assert!(plan.is_empty());
        let result = plan.apply(&df).unwrap();
        assert!(result.equals_missing(&df));
    }

    #[test]
    fn test_apply_runs_steps_in_order() {
        // Duplicate removal runs before the mean fill, so the duplicate
        // row does not bias the mean: mean of [10, 30] is 20.
        let df = df![
            "id" => [1i64, 1, 2, 3],
            "score" => [Some(10.0), Some(10.0), Some(30.0), None],
        ]
        .unwrap();

        let plan = CleaningPlan::new()
            .with_remove_duplicates(true)
            .with_missing_strategy("score", MissingStrategy::Mean);

        let result = plan.apply(&df).unwrap();
        assert_eq!(result.height(), 3);
        let scores: Vec<f64> = result
            .column("score")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(scores, vec![10.0, 30.0, 20.0]);
    }

    #[test]
    fn test_apply_rejects_invalid_plan() {
        let df = df![
            "score" => [1.0, 2.0],
        ]
        .unwrap();

        let plan = CleaningPlan::new()
            .with_missing_strategy("score", MissingStrategy::Mean)
            .with_missing_strategy("score", MissingStrategy::Zero);

        let err = plan.apply(&df).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_plan_serializes_to_json() {
        let plan = CleaningPlan::new()
            .with_remove_duplicates(true)
            .with_missing_strategy("score", MissingStrategy::Median);

        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"median\""));
        let back: CleaningPlan = serde_json::from_str(&json).unwrap();
        assert!(back.remove_duplicates);
    }
}
