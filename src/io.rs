//! Table ingestion and export.
//!
//! The loader dispatches on file extension: CSV goes through Polars with
//! a chain of fallback strategies for badly quoted files, Excel goes
//! through calamine with per-column type inference on the first
//! worksheet. Everything else is rejected before any bytes are read.

use crate::cleaner::converters::parse_datetime_str;
use crate::error::{Result, ScrubError};
use calamine::{open_workbook_auto, Data, DataType as CellType, Reader};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a table from a CSV or Excel file.
///
/// The extension decides the reader, case-insensitively. An unsupported
/// or missing extension is an [`ScrubError::UnsupportedFormat`]; a file
/// that exists but cannot be parsed is a [`ScrubError::LoadFailed`].
pub fn load_table(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let df = match extension.as_str() {
        "csv" => load_csv_with_fallbacks(path)?,
        "xls" | "xlsx" | "xlsm" | "xlsb" => load_excel(path)?,
        _ => return Err(ScrubError::UnsupportedFormat(extension)),
    };

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded table"
    );
    Ok(df)
}

/// Serialize a table as CSV bytes, header included.
pub fn write_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut df = df.clone();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .map_err(|e| ScrubError::ExportFailed(e.to_string()))?;
    Ok(buffer)
}

/// Load CSV with multiple fallback strategies.
fn load_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    // Strategy 1: standard loading with quote handling.
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("standard CSV loading failed: {}", e),
    }

    // Strategy 2: without quote handling.
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .and_then(|reader| reader.finish())
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("CSV loading without quotes failed: {}", e),
    }

    // Strategy 3: pre-clean the content and parse from memory.
    let content =
        std::fs::read_to_string(path).map_err(|e| ScrubError::LoadFailed(e.to_string()))?;
    let cleaned = clean_csv_content(&content);
    CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .map_err(|e| ScrubError::LoadFailed(e.to_string()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Column types the Excel reader can materialize.
enum ExcelColType {
    Int64,
    Float64,
    Boolean,
    Utf8,
    Datetime,
}

/// Read the first worksheet of an Excel workbook.
///
/// The first row provides the headers; unnamed columns get positional
/// names. Column types are inferred from the cells below the header.
fn load_excel(path: &Path) -> Result<DataFrame> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ScrubError::LoadFailed(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ScrubError::LoadFailed("workbook has no worksheets".to_string()))?
        .map_err(|e| ScrubError::LoadFailed(e.to_string()))?;

    let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
    if rows.is_empty() {
        return Ok(DataFrame::empty());
    }

    let headers: Vec<String> = rows[0]
        .iter()
        .map(|c| CellType::as_string(c).unwrap_or_else(|| c.to_string()))
        .collect();

    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let cells: Vec<Option<&Data>> = rows[1..].iter().map(|row| row.get(col_idx)).collect();
        let name = if header.is_empty() {
            format!("column_{}", col_idx + 1)
        } else {
            header.clone()
        };
        let series = excel_column_to_series(&name, &cells, excel_infer_column_type(&cells))?;
        columns.push(series.into());
    }

    // Every column is built from the same rows[1..] slice, so heights match.
    DataFrame::new(columns).map_err(Into::into)
}

/// Infer the target type of an Excel column from its cells.
///
/// Any text cell makes the column text, unless every non-empty cell
/// parses as a datetime. Whole-number floats collapse to Int64.
fn excel_infer_column_type(cells: &[Option<&Data>]) -> ExcelColType {
    let mut has_string = false;
    let mut has_float = false;
    let mut has_int = false;
    let mut has_bool = false;
    let mut has_datetime = false;

    for cell in cells.iter().flatten() {
        if CellType::is_string(*cell) {
            has_string = true;
            break;
        }
        if CellType::is_float(*cell) {
            has_float = true;
        }
        if CellType::is_int(*cell) {
            has_int = true;
        }
        if CellType::is_bool(*cell) {
            has_bool = true;
        }
        if CellType::is_datetime(*cell) || CellType::is_datetime_iso(*cell) {
            has_datetime = true;
        }
    }

    if has_string {
        let any_parsed = cells
            .iter()
            .flatten()
            .any(|c| excel_cell_to_datetime(c).is_some());
        let all_non_empty_parse = cells
            .iter()
            .flatten()
            .all(|c| CellType::is_empty(*c) || excel_cell_to_datetime(c).is_some());
        if any_parsed && all_non_empty_parse {
            ExcelColType::Datetime
        } else {
            ExcelColType::Utf8
        }
    } else if has_datetime {
        ExcelColType::Datetime
    } else if has_int && !has_float {
        ExcelColType::Int64
    } else if has_float || has_int {
        let all_whole = cells.iter().flatten().all(|cell| {
            CellType::as_f64(*cell)
                .map(|f| f.is_finite() && (f - f.trunc()).abs() < 1e-10)
                .unwrap_or(true)
        });
        if all_whole {
            ExcelColType::Int64
        } else {
            ExcelColType::Float64
        }
    } else if has_bool {
        ExcelColType::Boolean
    } else {
        ExcelColType::Utf8
    }
}

/// Convert a calamine cell to a NaiveDateTime (serial, ISO, or text).
fn excel_cell_to_datetime(cell: &Data) -> Option<chrono::NaiveDateTime> {
    if let Some(dt) = cell.as_datetime() {
        return Some(dt);
    }
    let s = cell.get_datetime_iso().or_else(|| cell.get_string())?;
    parse_datetime_str(s)
}

/// Build a Polars Series from a column of cells using the inferred type.
fn excel_column_to_series(
    name: &str,
    cells: &[Option<&Data>],
    col_type: ExcelColType,
) -> Result<Series> {
    let series = match col_type {
        ExcelColType::Int64 => {
            let values: Vec<Option<i64>> =
                cells.iter().map(|c| c.and_then(|cell| cell.as_i64())).collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Float64 => {
            let values: Vec<Option<f64>> =
                cells.iter().map(|c| c.and_then(|cell| cell.as_f64())).collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Boolean => {
            let values: Vec<Option<bool>> =
                cells.iter().map(|c| c.and_then(|cell| cell.get_bool())).collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Utf8 => {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| {
                    c.and_then(|cell| {
                        if CellType::is_empty(cell) {
                            None
                        } else {
                            cell.as_string()
                        }
                    })
                })
                .collect();
            Series::new(name.into(), values)
        }
        ExcelColType::Datetime => {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| {
                    c.and_then(excel_cell_to_datetime)
                        .map(|dt| dt.and_utc().timestamp_millis())
                })
                .collect();
            Series::new(name.into(), values)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
    };
    Ok(series)
}
