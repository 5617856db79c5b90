//! CSV ingest and normalization.
//!
//! This module is responsible for turning CSV files into inputs the rest of the
//! crate can trust:
//!
//! - labelled training datasets (`read_dataset_csv`) for the fitter
//! - unlabelled business rows (`read_inputs_csv`) for batch scoring
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **One coercion path**: feature cells go through the same coercer as
//!   single requests, so training and scoring parse values identically

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{BusinessRecord, CoercionMode, FEATURE_COUNT, FEATURES, FeatureVector, RawValue, position_of};
use crate::error::{AppError, EXIT_DATA, EXIT_INPUT};
use crate::io::coerce::coerce;

const COMPANY_COLUMNS: [&str; 2] = ["company name", "company_name"];
const CIN_COLUMNS: [&str; 1] = ["cin"];
const TARGET_COLUMNS: [&str; 2] = ["performance score", "performance_score"];
const ID_COLUMNS: [&str; 3] = ["id", "company name", "company_name"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Training ingest output: parsed records + row errors.
#[derive(Debug, Clone)]
pub struct IngestedDataset {
    pub records: Vec<BusinessRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// One unscored business row.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRow {
    pub id: String,
    pub values: Vec<RawValue>,
}

/// Batch ingest output. Cells are left raw; coercion happens at scoring time.
#[derive(Debug, Clone)]
pub struct IngestedInputs {
    pub rows: Vec<InputRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load a labelled dataset CSV.
pub fn read_dataset_csv(path: &Path, mode: CoercionMode) -> Result<IngestedDataset, AppError> {
    let file = open(path)?;
    read_dataset(file, mode)
}

/// Load unlabelled business rows for batch scoring.
pub fn read_inputs_csv(path: &Path) -> Result<IngestedInputs, AppError> {
    let file = open(path)?;
    read_inputs(file)
}

pub fn read_dataset<R: Read>(source: R, mode: CoercionMode) -> Result<IngestedDataset, AppError> {
    let mut reader = csv_reader(source);
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);
    let feature_cols = feature_columns(&headers)?;
    let target_col = find_column(&header_map, &TARGET_COLUMNS)
        .ok_or_else(|| AppError::new(EXIT_INPUT, "Missing required column: `Performance Score`"))?;
    let company_col = find_column(&header_map, &COMPANY_COLUMNS);
    let cin_col = find_column(&header_map, &CIN_COLUMNS);

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let company_name = cell(&record, company_col).unwrap_or_default().to_string();
        let id = (!company_name.is_empty()).then(|| company_name.clone());

        match parse_labelled_row(&record, &feature_cols, target_col, mode) {
            Ok((features, performance_score)) => records.push(BusinessRecord {
                company_name: if company_name.is_empty() {
                    format!("row-{line}")
                } else {
                    company_name
                },
                cin: cell(&record, cin_col).unwrap_or_default().to_string(),
                features,
                performance_score,
            }),
            Err(message) => row_errors.push(RowError { line, id, message }),
        }
    }

    if records.is_empty() {
        return Err(AppError::new(EXIT_DATA, "No valid rows remain after validation."));
    }

    tracing::debug!(
        rows_read,
        rows_used = records.len(),
        rejected = row_errors.len(),
        "dataset ingested"
    );

    Ok(IngestedDataset {
        records,
        row_errors,
        rows_read,
    })
}

pub fn read_inputs<R: Read>(source: R) -> Result<IngestedInputs, AppError> {
    let mut reader = csv_reader(source);
    let headers = read_headers(&mut reader)?;
    let header_map = build_header_map(&headers);
    let feature_cols = feature_columns(&headers)?;
    let id_col = find_column(&header_map, &ID_COLUMNS);

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let id = match cell(&record, id_col) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => format!("row-{line}"),
        };
        let values = feature_cols
            .iter()
            .map(|&col| RawValue::Text(cell(&record, Some(col)).unwrap_or_default().to_string()))
            .collect();
        rows.push(InputRow { id, values });
    }

    Ok(IngestedInputs {
        rows,
        row_errors,
        rows_read,
    })
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source)
}

/// Normalized header names, in column order.
fn read_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?;
    Ok(headers.iter().map(normalize_header_name).collect())
}

/// Header name to column index. The first of repeated names wins.
fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        map.entry(name.clone()).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, candidates: &[&str]) -> Option<usize> {
    candidates.iter().find_map(|c| header_map.get(*c).copied())
}

/// Column index of each feature, in `FEATURES` order.
///
/// A feature named by more than one column (e.g. both `debt_to_capital` and
/// `Debt to Capital`) is rejected rather than resolved silently.
fn feature_columns(headers: &[String]) -> Result<[usize; FEATURE_COUNT], AppError> {
    let mut found: [Option<usize>; FEATURE_COUNT] = [None; FEATURE_COUNT];
    for (col, header) in headers.iter().enumerate() {
        let Some(pos) = position_of(header) else { continue };
        if let Some(first) = found[pos] {
            return Err(AppError::new(
                EXIT_INPUT,
                format!(
                    "Duplicate columns for `{}`: columns {} and {}",
                    FEATURES[pos].label,
                    first + 1,
                    col + 1
                ),
            ));
        }
        found[pos] = Some(col);
    }

    let missing: Vec<String> = FEATURES
        .iter()
        .zip(found.iter())
        .filter(|(_, col)| col.is_none())
        .map(|(desc, _)| format!("`{}`", desc.label))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Missing required feature column(s): {}", missing.join(", ")),
        ));
    }

    Ok(found.map(|col| col.unwrap_or_default()))
}

fn cell(record: &StringRecord, col: Option<usize>) -> Option<&str> {
    col.and_then(|c| record.get(c))
}

fn parse_labelled_row(
    record: &StringRecord,
    feature_cols: &[usize; FEATURE_COUNT],
    target_col: usize,
    mode: CoercionMode,
) -> Result<(FeatureVector, f64), String> {
    let raw: Vec<RawValue> = feature_cols
        .iter()
        .map(|&col| RawValue::Text(record.get(col).unwrap_or_default().to_string()))
        .collect();
    let features = coerce(&raw, mode).map_err(|e| e.to_string())?;

    let target_text = record.get(target_col).unwrap_or_default();
    let target = target_text
        .parse::<f64>()
        .map_err(|_| format!("Missing/invalid `Performance Score` value '{target_text}'."))?;
    if !(target.is_finite() && (0.0..=1.0).contains(&target)) {
        return Err(format!("`Performance Score` {target} is outside [0, 1]."));
    }

    Ok((features, target))
}
