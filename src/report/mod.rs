//! Reporting utilities: batch summaries, rankings, and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::RiskCategory;
use crate::io::export::ScoredRow;
use crate::math::mean;

/// Aggregate view of one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub scored: usize,
    pub rejected: usize,
    /// Count per category, in `RiskCategory::ALL` order.
    pub by_category: [(RiskCategory, usize); 5],
    pub mean_score: Option<f64>,
    pub mean_credit_score: Option<f64>,
}

/// Strongest / weakest scored rows (top-N each side).
#[derive(Debug, Clone)]
pub struct Rankings {
    pub strongest: Vec<ScoredRow>,
    pub weakest: Vec<ScoredRow>,
}

pub fn summarize_batch(rows: &[ScoredRow]) -> BatchSummary {
    let mut by_category = RiskCategory::ALL.map(|c| (c, 0usize));
    let mut scores = Vec::with_capacity(rows.len());
    let mut credit = Vec::with_capacity(rows.len());

    for a in rows.iter().filter_map(|r| r.outcome.as_ref().ok()) {
        if let Some(slot) = by_category.iter_mut().find(|(c, _)| *c == a.risk_category) {
            slot.1 += 1;
        }
        scores.push(a.performance_score);
        credit.push(a.credit_score as f64);
    }

    BatchSummary {
        total: rows.len(),
        scored: scores.len(),
        rejected: rows.len() - scores.len(),
        by_category,
        mean_score: mean(&scores),
        mean_credit_score: mean(&credit),
    }
}

/// Rank scored rows by performance score. Rejected rows are left out.
pub fn rank_by_score(rows: &[ScoredRow], top_n: usize) -> Rankings {
    let score = |r: &ScoredRow| r.outcome.as_ref().map(|a| a.performance_score).unwrap_or(f64::NAN);

    let mut sorted: Vec<ScoredRow> = rows.iter().filter(|r| r.outcome.is_ok()).cloned().collect();
    sorted.sort_by(|a, b| score(b).total_cmp(&score(a)));
    let strongest = sorted.iter().take(top_n).cloned().collect();
    let weakest = sorted.iter().rev().take(top_n).cloned().collect();

    Rankings { strongest, weakest }
}
