//! Export datasets and assessments to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.
//! Dataset exports use the same column labels `ingest` reads back.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{BusinessRecord, CreditAssessment, FEATURES};
use crate::error::{AppError, EXIT_INPUT, ScoreError};
use crate::math::round_to;

/// One batch result keyed by its input id.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub id: String,
    pub outcome: Result<CreditAssessment, ScoreError>,
}

/// Write a labelled dataset CSV.
pub fn write_dataset_csv(path: &Path, records: &[BusinessRecord]) -> Result<(), AppError> {
    let file = create(path)?;
    write_dataset(file, records)
}

/// Write batch assessments, one row per input. Rejected rows carry the error
/// text and leave the score columns empty.
pub fn write_assessments_csv(path: &Path, rows: &[ScoredRow]) -> Result<(), AppError> {
    let file = create(path)?;
    write_assessments(file, rows)
}

pub fn write_dataset<W: Write>(sink: W, records: &[BusinessRecord]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["Company Name", "CIN"];
    header.extend(FEATURES.iter().map(|f| f.label));
    header.push("Performance Score");
    writer.write_record(&header).map_err(write_err)?;

    for r in records {
        let f = &r.features;
        writer
            .write_record([
                r.company_name.clone(),
                r.cin.clone(),
                format!("{:.2}", f.average_monthly_balance),
                f.number_of_transactions.to_string(),
                f.number_of_gst_paid_transactions.to_string(),
                format!("{:.6}", f.debt_to_capital),
                format!("{:.6}", f.operating_profit_margins),
                bool_cell(f.use_of_overdraft).to_string(),
                f.net_working_capital_days.to_string(),
                format!("{:.6}", f.year_on_year_sales_growth),
                f.emi_missed_count.to_string(),
                bool_cell(f.utility_bill_default).to_string(),
                format!("{:.6}", r.performance_score),
            ])
            .map_err(write_err)?;
    }

    writer.flush().map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush CSV: {e}")))
}

pub fn write_assessments<W: Write>(sink: W, rows: &[ScoredRow]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record([
            "id",
            "performance_score",
            "credit_score",
            "risk_category",
            "risk_level",
            "recommendation",
            "error",
        ])
        .map_err(write_err)?;

    for row in rows {
        let record = match &row.outcome {
            Ok(a) => [
                row.id.clone(),
                format!("{:.3}", round_to(a.performance_score, 3)),
                a.credit_score.to_string(),
                a.risk_category.to_string(),
                a.risk_level.to_string(),
                a.recommendation.clone(),
                String::new(),
            ],
            Err(e) => [
                row.id.clone(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                e.to_string(),
            ],
        };
        writer.write_record(&record).map_err(write_err)?;
    }

    writer.flush().map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush CSV: {e}")))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_err(e: csv::Error) -> AppError {
    AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}"))
}

// Same spelling the dataset generator has always used for booleans.
fn bool_cell(b: bool) -> &'static str {
    if b { "True" } else { "False" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoercionMode, FeatureVector};
    use crate::io::ingest::read_dataset;
    use crate::models::classify;

    fn record(name: &str, overdraft: bool) -> BusinessRecord {
        BusinessRecord {
            company_name: name.to_string(),
            cin: "U12345MH2004PTC123456".to_string(),
            features: FeatureVector {
                average_monthly_balance: 25000.5,
                number_of_transactions: 60,
                number_of_gst_paid_transactions: 40,
                debt_to_capital: 0.35,
                operating_profit_margins: 0.12,
                use_of_overdraft: overdraft,
                net_working_capital_days: 75,
                year_on_year_sales_growth: -0.02,
                emi_missed_count: 1,
                utility_bill_default: false,
            },
            performance_score: 0.5125,
        }
    }

    #[test]
    fn dataset_export_is_readable_by_ingest() {
        let records = vec![record("Business_1", true), record("Acme, Ltd", false)];
        let mut buf = Vec::new();
        write_dataset(&mut buf, &records).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Company Name,CIN,Average Monthly Balance"));
        assert!(text.contains(",True,"));
        assert!(text.contains("\"Acme, Ltd\""));

        let back = read_dataset(buf.as_slice(), CoercionMode::Strict).unwrap();
        assert!(back.row_errors.is_empty());
        assert_eq!(back.records, records);
    }

    #[test]
    fn assessment_export_keeps_failed_rows() {
        let rows = vec![
            ScoredRow {
                id: "a".to_string(),
                outcome: Ok(classify(0.87654)),
            },
            ScoredRow {
                id: "b".to_string(),
                outcome: Err(ScoreError::validation("Expected 10 values, got 3")),
            },
        ];
        let mut buf = Vec::new();
        write_assessments(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("a,0.877,782,Excellent,Very Low Risk,"));
        assert_eq!(lines[2], "b,,,,,,\"Invalid input: Expected 10 values, got 3\"");
    }
}
