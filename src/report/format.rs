//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use std::path::Path;

use crate::domain::{CreditAssessment, SplitMetrics};
use crate::fit::FitOutcome;
use crate::io::artifact::ModelArtifact;
use crate::io::export::ScoredRow;
use crate::io::ingest::IngestedDataset;
use crate::report::{BatchSummary, Rankings};

/// Human-readable result for one business.
pub fn format_assessment(a: &CreditAssessment) -> String {
    let mut out = String::new();
    out.push_str("=== bizscore - Credit Assessment ===\n");
    out.push_str(&format!("Performance score: {:.3}\n", a.performance_score));
    out.push_str(&format!("Credit score     : {}\n", a.credit_score));
    out.push_str(&format!("Risk category    : {}\n", a.risk_category));
    out.push_str(&format!("Risk level       : {}\n", a.risk_level));
    out.push_str(&format!("Recommendation   : {}\n", a.recommendation));
    out
}

/// Dataset stats, per-split metrics and the fitted coefficients.
pub fn format_fit_summary(data: &IngestedDataset, outcome: &FitOutcome, artifact_path: &Path) -> String {
    let mut out = String::new();

    out.push_str("=== bizscore - Model Fit ===\n");
    out.push_str(&format!(
        "Rows: read={} | used={} | rejected={}\n",
        data.rows_read,
        data.records.len(),
        data.row_errors.len()
    ));
    for e in data.row_errors.iter().take(5) {
        let id = e.id.as_deref().unwrap_or("-");
        out.push_str(&format!("  line {} ({id}): {}\n", e.line, e.message));
    }
    if data.row_errors.len() > 5 {
        out.push_str(&format!("  ... {} more\n", data.row_errors.len() - 5));
    }

    out.push_str("\nMetrics (calibrated scale):\n");
    out.push_str(&metrics_header());
    let m = &outcome.metrics;
    out.push_str(&metrics_row("train", &m.train));
    out.push_str(&metrics_row("validation", &m.validation));
    out.push_str(&metrics_row("test", &m.test));

    out.push_str("\nCoefficients (standardized, by |weight|):\n");
    for c in &outcome.ranking {
        out.push_str(&format!("  {:<32} {:>10.6}\n", c.feature, c.weight));
    }
    out.push_str(&format!("  {:<32} {:>10.6}\n", "(bias)", outcome.bundle.model().bias()));

    out.push_str(&format!("\nArtifact: {}\n", artifact_path.display()));
    out
}

/// Contents of a model artifact.
pub fn format_artifact_summary(artifact: &ModelArtifact, path: &Path) -> String {
    let mut out = String::new();

    out.push_str("=== bizscore - Model Artifact ===\n");
    out.push_str(&format!("Path   : {}\n", path.display()));
    out.push_str(&format!(
        "Format : v{} ({})\n",
        artifact.format_version, artifact.tool
    ));
    out.push_str(&format!("Created: {}\n", artifact.created_at.to_rfc3339()));

    out.push('\n');
    out.push_str(&format!(
        "{:<32} {:>14} {:>14} {:>12}\n",
        "feature", "mean", "std", "weight"
    ));
    out.push_str(&format!("{:-<32} {:-<14} {:-<14} {:-<12}\n", "", "", "", ""));
    let rows = artifact
        .features
        .iter()
        .zip(&artifact.scaler.mean)
        .zip(&artifact.scaler.std)
        .zip(&artifact.model.weights);
    for (((name, mean), std), weight) in rows {
        out.push_str(&format!(
            "{:<32} {:>14.4} {:>14.4} {:>12.6}\n",
            truncate(name, 32),
            mean,
            std,
            weight
        ));
    }
    out.push_str(&format!("{:<32} {:>14} {:>14} {:>12.6}\n", "(bias)", "", "", artifact.model.bias));

    if let Some(m) = &artifact.metrics {
        out.push_str("\nMetrics at fit time:\n");
        out.push_str(&metrics_header());
        out.push_str(&metrics_row("train", &m.train));
        out.push_str(&metrics_row("validation", &m.validation));
        out.push_str(&metrics_row("test", &m.test));
    }

    out
}

pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let mut out = String::new();

    out.push_str("=== bizscore - Batch Scoring ===\n");
    out.push_str(&format!(
        "Rows: total={} | scored={} | rejected={}\n",
        summary.total, summary.scored, summary.rejected
    ));
    if let (Some(s), Some(c)) = (summary.mean_score, summary.mean_credit_score) {
        out.push_str(&format!("Mean performance score: {s:.3} | mean credit score: {c:.1}\n"));
    }

    out.push_str("\nBy category:\n");
    for (category, count) in &summary.by_category {
        let share = if summary.scored > 0 {
            100.0 * *count as f64 / summary.scored as f64
        } else {
            0.0
        };
        out.push_str(&format!("  {:<10} {:>6} ({share:>5.1}%)\n", category.display_name(), count));
    }

    out
}

/// Format the strongest/weakest tables.
pub fn format_rankings(rankings: &Rankings) -> String {
    let mut out = String::new();

    out.push_str("Strongest:\n");
    out.push_str(&format_table(&rankings.strongest));
    out.push('\n');

    out.push_str("Weakest:\n");
    out.push_str(&format_table(&rankings.weakest));

    out
}

fn format_table(rows: &[ScoredRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>8} {:>6} {:<10}", "id", "score", "credit", "category"));
    out.push('\n');
    out.push_str(&format!("{:-<24} {:-<8} {:-<6} {:-<10}", "", "", "", ""));
    out.push('\n');

    for r in rows {
        let Ok(a) = &r.outcome else { continue };
        out.push_str(&format!(
            "{:<24} {:>8.3} {:>6} {:<10}",
            truncate(&r.id, 24),
            a.performance_score,
            a.credit_score,
            a.risk_category.display_name()
        ));
        out.push('\n');
    }

    out
}

fn metrics_header() -> String {
    format!("  {:<12} {:>6} {:>8} {:>8} {:>8}\n", "split", "n", "MAE", "RMSE", "R2")
}

fn metrics_row(label: &str, m: &SplitMetrics) -> String {
    format!(
        "  {:<12} {:>6} {:>8.4} {:>8.4} {:>8.4}\n",
        label, m.n, m.mae, m.rmse, m.r2
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classify;
    use crate::report::{rank_by_score, summarize_batch};

    #[test]
    fn assessment_block_lists_every_field() {
        let text = format_assessment(&classify(0.9933));
        assert!(text.contains("Performance score: 0.993"));
        assert!(text.contains("Credit score     : 846"));
        assert!(text.contains("Excellent"));
        assert!(text.contains("Very Low Risk"));
        assert!(text.contains("Highly recommended for credit"));
    }

    #[test]
    fn batch_block_shows_shares() {
        let rows = vec![
            ScoredRow {
                id: "a".to_string(),
                outcome: Ok(classify(0.8)),
            },
            ScoredRow {
                id: "b".to_string(),
                outcome: Ok(classify(0.2)),
            },
        ];
        let text = format_batch_summary(&summarize_batch(&rows));
        assert!(text.contains("total=2 | scored=2 | rejected=0"));
        assert!(text.contains("Excellent"));
        assert!(text.contains("( 50.0%)"));

        let table = format_rankings(&rank_by_score(&rows, 1));
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[3].starts_with("a "));
    }

    #[test]
    fn truncate_marks_long_ids() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-company-name", 8), "a-very-.");
    }
}
