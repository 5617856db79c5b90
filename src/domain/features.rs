//! The fixed, ordered feature registry.
//!
//! Every component that touches feature positions (coercer, scaler, scorer,
//! artifact loader, dataset reader, fitter) reads the order from `FEATURES`.
//! A model artifact carries the same names and is rejected at load time if they
//! differ in content or order.

use serde::{Deserialize, Serialize};

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 10;

/// Scalar type of a feature position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Real-valued.
    Float,
    /// Parsed as a float, then truncated toward zero.
    Integer,
    /// Boolean-like, encoded as 0/1.
    Flag,
}

/// Name, dataset label and scalar kind of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureDescriptor {
    /// snake_case identifier used in JSON requests and model artifacts.
    pub name: &'static str,
    /// Column header used by the training dataset CSV.
    pub label: &'static str,
    pub kind: FeatureKind,
}

impl FeatureDescriptor {
    const fn new(name: &'static str, label: &'static str, kind: FeatureKind) -> Self {
        Self { name, label, kind }
    }

    /// True if `header` names this feature (snake_case name or dataset label,
    /// case-insensitive).
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.name) || header.eq_ignore_ascii_case(self.label)
    }
}

pub const FEATURES: [FeatureDescriptor; FEATURE_COUNT] = [
    FeatureDescriptor::new("average_monthly_balance", "Average Monthly Balance", FeatureKind::Float),
    FeatureDescriptor::new("number_of_transactions", "Number of Transactions", FeatureKind::Integer),
    FeatureDescriptor::new(
        "number_of_gst_paid_transactions",
        "Number of GST-paid Transactions",
        FeatureKind::Integer,
    ),
    FeatureDescriptor::new("debt_to_capital", "Debt to Capital", FeatureKind::Float),
    FeatureDescriptor::new("operating_profit_margins", "Operating Profit Margins", FeatureKind::Float),
    FeatureDescriptor::new("use_of_overdraft", "Use of Overdraft", FeatureKind::Flag),
    FeatureDescriptor::new("net_working_capital_days", "Net Working Capital Days", FeatureKind::Integer),
    FeatureDescriptor::new("year_on_year_sales_growth", "Year on Year Sales Growth", FeatureKind::Float),
    FeatureDescriptor::new("emi_missed_count", "EMI Missed Count", FeatureKind::Integer),
    FeatureDescriptor::new(
        "utility_bill_default",
        "Utility Bill Default on Payment Date",
        FeatureKind::Flag,
    ),
];

/// Feature names in model order.
pub fn feature_names() -> Vec<String> {
    FEATURES.iter().map(|f| f.name.to_string()).collect()
}

/// Position of the feature named by `header`, if any.
pub fn position_of(header: &str) -> Option<usize> {
    FEATURES.iter().position(|f| f.matches(header))
}
