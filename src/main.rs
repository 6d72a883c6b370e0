//! CLI entry point for the table quality engine.

use anyhow::{anyhow, Result};
use clap::Parser;
use polars::prelude::*;
use tablescrub::{
    classifier, inspector, io, CleaningPlan, ColumnKind, MissingStrategy, OutlierMethod,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Inspect and clean tabular data files",
    long_about = "Inspect CSV and Excel files for quality problems and apply cleaning steps.\n\n\
                  EXAMPLES:\n  \
                  # Inspection report only\n  \
                  tablescrub -i data.csv\n\n  \
                  # Remove duplicates and fill a column's nulls with the median\n  \
                  tablescrub -i data.csv --remove-duplicates --missing score=median -o cleaned.csv\n\n  \
                  # Coerce a column to numeric and drop IQR outliers\n  \
                  tablescrub -i data.csv --fix-type amount=numeric --outlier-column amount -o cleaned.csv\n\n  \
                  # Machine-readable report\n  \
                  tablescrub -i data.csv --json | jq .shape"
)]
struct Args {
    /// Path to the CSV or Excel file to inspect
    #[arg(short, long)]
    input: String,

    /// Where to write the cleaned CSV
    ///
    /// Required when any cleaning step is requested
    #[arg(short, long)]
    output: Option<String>,

    /// Remove rows that exactly repeat an earlier row
    #[arg(long)]
    remove_duplicates: bool,

    /// Missing-value strategy as column=strategy
    ///
    /// Strategies: drop, mean, median, mode, zero. Repeatable.
    #[arg(long, value_name = "COL=STRATEGY")]
    missing: Vec<String>,

    /// Type fix as column=kind
    ///
    /// Kinds: numeric, datetime, string. Repeatable.
    #[arg(long, value_name = "COL=KIND")]
    fix_type: Vec<String>,

    /// Numeric column to strip IQR outliers from. Repeatable.
    #[arg(long, value_name = "COL")]
    outlier_column: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output the inspection report as JSON to stdout
    ///
    /// Disables all progress logs; only outputs JSON.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// carries nothing but JSON.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let plan = build_plan(&args)?;
    if !plan.is_empty() && args.output.is_none() {
        return Err(anyhow!("--output is required when cleaning steps are requested"));
    }

    info!("Loading table from: {}", args.input);
    let data = io::load_table(&args.input)?;
    info!("Table loaded: {:?}", data.shape());

    if args.json {
        print_json_report(&data)?;
    } else {
        print_report(&args.input, &data);
    }

    if plan.is_empty() {
        return Ok(());
    }

    let cleaned = plan.apply(&data)?;
    info!(
        rows_before = data.height(),
        rows_after = cleaned.height(),
        "cleaning complete"
    );

    if let Some(output) = &args.output {
        std::fs::write(output, io::write_csv(&cleaned)?)?;
        info!("Cleaned table written to: {}", output);
    }

    Ok(())
}

/// Build a cleaning plan from the CLI flags. An unknown strategy token or
/// a column named twice within one step is a configuration error.
fn build_plan(args: &Args) -> Result<CleaningPlan> {
    let mut plan = CleaningPlan::new().with_remove_duplicates(args.remove_duplicates);

    for spec in &args.missing {
        let (column, token) = split_spec(spec)?;
        let strategy: MissingStrategy = token.parse().map_err(|e: String| anyhow!(e))?;
        plan = plan.with_missing_strategy(column, strategy);
    }

    for spec in &args.fix_type {
        let (column, token) = split_spec(spec)?;
        let kind: ColumnKind = token.parse().map_err(|e: String| anyhow!(e))?;
        plan = plan.with_type_fix(column, kind);
    }

    if !args.outlier_column.is_empty() {
        plan = plan.with_outlier_removal(args.outlier_column.clone(), OutlierMethod::Iqr);
    }

    plan.validate().map_err(|e| anyhow!(e))?;
    Ok(plan)
}

/// Split a `column=value` flag into its parts.
fn split_spec(spec: &str) -> Result<(&str, &str)> {
    match spec.split_once('=') {
        Some((column, value)) if !column.is_empty() && !value.is_empty() => Ok((column, value)),
        _ => Err(anyhow!("expected column=value, got '{}'", spec)),
    }
}

/// Print the human-readable inspection report.
///
/// Uses `println!` intentionally: this is the primary output of the tool,
/// visible regardless of log level.
fn print_report(input: &str, data: &DataFrame) {
    let summary = inspector::summarize(data);
    let types = classifier::classify(data);
    let issues = inspector::type_issues(data);

    println!("\n{}", "=".repeat(80));
    println!("INSPECTION REPORT");
    println!("{}\n", "=".repeat(80));

    println!("TABLE OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", input);
    println!("  Rows: {}", summary.shape.0);
    println!("  Columns: {}", summary.shape.1);
    println!("  Duplicate rows: {}", summary.duplicate_count);
    println!();

    println!("COLUMNS");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<12} {:<10} {:<10} {:<10}",
        "Column", "Kind", "Dtype", "Missing %", "Unique"
    );
    println!("{}", "-".repeat(70));
    for col in &summary.columns {
        println!(
            "{:<20} {:<12} {:<10} {:<10.1} {:<10}",
            truncate_str(&col.name, 19),
            types.get(&col.name).map(|k| k.as_str()).unwrap_or("string"),
            truncate_str(&col.dtype, 9),
            col.null_percentage,
            col.unique_count
        );
    }
    println!();

    if !issues.is_empty() {
        println!("TYPE ISSUES");
        println!("{}", "-".repeat(40));
        let mut names: Vec<&String> = issues.keys().collect();
        names.sort();
        for name in names {
            for finding in &issues[name] {
                println!("  {}: {}", name, finding);
            }
        }
        println!();
    }

    let recommendations = inspector::recommend(data);
    if !recommendations.is_empty() {
        println!("RECOMMENDATIONS");
        println!("{}", "-".repeat(40));
        for rec in &recommendations {
            println!("  {} ({})", rec.title, rec.description);
            for action in &rec.actions {
                println!("    - {}", action);
            }
        }
        println!();
    }
    println!("{}", "=".repeat(80));
}

/// Print the inspection report as a single JSON document on stdout.
fn print_json_report(data: &DataFrame) -> Result<()> {
    let report = serde_json::json!({
        "summary": inspector::summarize(data),
        "column_types": classifier::classify(data),
        "missing_values": inspector::missing_report(data),
        "duplicates": inspector::duplicate_report(data),
        "type_issues": inspector::type_issues(data),
        "recommendations": inspector::recommend(data),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// Counts chars, not bytes, so multi-byte column names never split mid
// codepoint.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let head: String = s.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_spec() {
        assert_eq!(split_spec("score=mean").unwrap(), ("score", "mean"));
        assert!(split_spec("score").is_err());
        assert!(split_spec("=mean").is_err());
        assert!(split_spec("score=").is_err());
    }

    #[test]
    fn test_build_plan_rejects_unknown_strategy() {
        let args = Args::parse_from(["tablescrub", "-i", "x.csv", "--missing", "score=average"]);
        assert!(build_plan(&args).is_err());
    }

    #[test]
    fn test_build_plan_collects_steps() {
        let args = Args::parse_from([
            "tablescrub",
            "-i",
            "x.csv",
            "--remove-duplicates",
            "--missing",
            "score=median",
            "--fix-type",
            "amount=numeric",
            "--outlier-column",
            "amount",
        ]);
        let plan = build_plan(&args).unwrap();
        assert!(plan.remove_duplicates);
        assert_eq!(plan.missing, vec![("score".to_string(), MissingStrategy::Median)]);
        assert_eq!(plan.type_fixes, vec![("amount".to_string(), ColumnKind::Numeric)]);
        assert_eq!(plan.outlier_columns, vec!["amount".to_string()]);
    }

    #[test]
    fn test_build_plan_rejects_duplicate_column() {
        let args = Args::parse_from([
            "tablescrub",
            "-i",
            "x.csv",
            "--missing",
            "score=mean",
            "--missing",
            "score=zero",
        ]);
        assert!(build_plan(&args).is_err());
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a_very_long_column_name", 10), "a_very_lo…");
    }

    #[test]
    fn test_truncate_str_multibyte_column_name() {
        assert_eq!(truncate_str("température_extérieure", 10), "températu…");
        assert_eq!(truncate_str("catégorie", 10), "catégorie");
    }
}
