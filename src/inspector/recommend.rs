//! Remediation recommendations derived from the quality reports.

use crate::classifier;
use crate::types::{ColumnKind, Recommendation};
use polars::prelude::*;

use super::{duplicate_report, missing_report, type_issues};

/// Turn the quality reports into actionable recommendations.
///
/// One recommendation per finding category, each listing the affected
/// columns and a suggested strategy per column kind. A clean table yields
/// an empty list.
pub fn recommend(df: &DataFrame) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let types = classifier::classify(df);

    let missing = missing_report(df);
    let mut affected: Vec<(&String, &f64)> =
        missing.iter().filter(|(_, pct)| **pct > 0.0).collect();
    affected.sort_by(|a, b| a.0.cmp(b.0));
    if !affected.is_empty() {
        let actions = affected
            .iter()
            .map(|(name, pct)| {
                let strategy = match types.get(*name) {
                    Some(ColumnKind::Numeric) => "fill with mean or median",
                    _ => "fill with mode or drop rows",
                };
                format!("{}: {:.1}% missing, {}", name, pct, strategy)
            })
            .collect();
        recommendations.push(Recommendation {
            title: "Handle missing values".to_string(),
            description: format!("{} column(s) contain null cells", affected.len()),
            actions,
        });
    }

    let duplicates = duplicate_report(df);
    if duplicates.count > 0 {
        recommendations.push(Recommendation {
            title: "Remove duplicate rows".to_string(),
            description: format!("{} row(s) exactly repeat an earlier row", duplicates.count),
            actions: vec!["drop every row after the first occurrence".to_string()],
        });
    }

    let issues = type_issues(df);
    if !issues.is_empty() {
        let mut actions: Vec<String> = issues
            .iter()
            .map(|(name, findings)| format!("{}: {}, convert to numeric", name, findings.join("; ")))
            .collect();
        actions.sort();
        recommendations.push(Recommendation {
            title: "Fix data types".to_string(),
            description: format!("{} column(s) mix numeric and non-numeric text", issues.len()),
            actions,
        });
    }

    recommendations
}
