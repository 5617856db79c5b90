//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages
//! - exported to JSON/CSV
//! - reloaded later for batch runs and comparisons

use std::fmt;

use serde::{Deserialize, Serialize};

use super::features::FEATURE_COUNT;

/// One opaque input cell, before coercion.
///
/// Deserializes from any JSON scalar, so request bodies may carry `true`,
/// `37`, `37.0` or `"37.0"` interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Textual form used for boolean-like matching.
    ///
    /// Whole floats keep a trailing `.0` (`1.0` renders as `"1.0"`, not `"1"`),
    /// so only integer `1` and the literal text `"1"` count as a truthy digit.
    pub fn text_form(&self) -> String {
        match self {
            RawValue::Bool(true) => "True".to_string(),
            RawValue::Bool(false) => "False".to_string(),
            RawValue::Int(i) => i.to_string(),
            RawValue::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
                    format!("{v:.1}")
                } else {
                    format!("{v}")
                }
            }
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// How boolean-like text outside the recognized vocabulary is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    /// Anything other than `true`/`1`/`yes` maps to 0.
    #[default]
    Permissive,
    /// Only `true`/`1`/`yes` and `false`/`0`/`no` are accepted.
    Strict,
}

/// A fully typed, ordered model input.
///
/// Field order matches `FEATURES`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub average_monthly_balance: f64,
    pub number_of_transactions: i64,
    pub number_of_gst_paid_transactions: i64,
    pub debt_to_capital: f64,
    pub operating_profit_margins: f64,
    pub use_of_overdraft: bool,
    pub net_working_capital_days: i64,
    pub year_on_year_sales_growth: f64,
    pub emi_missed_count: i64,
    pub utility_bill_default: bool,
}

impl FeatureVector {
    /// Numeric encoding in model order (flags as 0/1).
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.average_monthly_balance,
            self.number_of_transactions as f64,
            self.number_of_gst_paid_transactions as f64,
            self.debt_to_capital,
            self.operating_profit_margins,
            flag(self.use_of_overdraft),
            self.net_working_capital_days as f64,
            self.year_on_year_sales_growth,
            self.emi_missed_count as f64,
            flag(self.utility_bill_default),
        ]
    }

    /// Inverse of `to_array` for values already coerced to their kinds.
    pub(crate) fn from_array(v: [f64; FEATURE_COUNT]) -> Self {
        Self {
            average_monthly_balance: v[0],
            number_of_transactions: v[1] as i64,
            number_of_gst_paid_transactions: v[2] as i64,
            debt_to_capital: v[3],
            operating_profit_margins: v[4],
            use_of_overdraft: v[5] != 0.0,
            net_working_capital_days: v[6] as i64,
            year_on_year_sales_growth: v[7],
            emi_missed_count: v[8] as i64,
            utility_bill_default: v[9] != 0.0,
        }
    }
}

fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

/// Ordinal credit category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Excellent,
        RiskCategory::Good,
        RiskCategory::Fair,
        RiskCategory::Poor,
        RiskCategory::VeryPoor,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            RiskCategory::Excellent => "Excellent",
            RiskCategory::Good => "Good",
            RiskCategory::Fair => "Fair",
            RiskCategory::Poor => "Poor",
            RiskCategory::VeryPoor => "Very Poor",
        }
    }

    pub fn risk_level(self) -> RiskLevel {
        match self {
            RiskCategory::Excellent => RiskLevel::VeryLow,
            RiskCategory::Good => RiskLevel::Low,
            RiskCategory::Fair => RiskLevel::Medium,
            RiskCategory::Poor => RiskLevel::High,
            RiskCategory::VeryPoor => RiskLevel::VeryHigh,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            RiskCategory::Excellent => "Highly recommended for credit",
            RiskCategory::Good => "Recommended for credit",
            RiskCategory::Fair => "Consider with conditions",
            RiskCategory::Poor => "Not recommended",
            RiskCategory::VeryPoor => "Strong rejection recommended",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Risk level paired with each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Very Low Risk")]
    VeryLow,
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
    #[serde(rename = "Very High Risk")]
    VeryHigh,
}

impl RiskLevel {
    pub fn display_name(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Final assessment for one business.
///
/// `performance_score` is kept at full precision; the response contract
/// rounds it for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub performance_score: f64,
    pub credit_score: i64,
    pub risk_category: RiskCategory,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

/// One labelled training row.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessRecord {
    pub company_name: String,
    pub cin: String,
    pub features: FeatureVector,
    /// Target in [0, 1].
    pub performance_score: f64,
}

/// Goodness of fit on one data split, measured on the calibrated scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitMetrics {
    pub n: usize,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Metrics for the train / validation / test splits of one fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    pub train: SplitMetrics,
    pub validation: SplitMetrics,
    pub test: SplitMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_deserialize_from_json_scalars() {
        let v: Vec<RawValue> = serde_json::from_str(r#"[true, 37, 37.5, "yes"]"#).unwrap();
        assert_eq!(
            v,
            vec![
                RawValue::Bool(true),
                RawValue::Int(37),
                RawValue::Float(37.5),
                RawValue::Text("yes".to_string()),
            ]
        );
    }

    #[test]
    fn whole_floats_keep_decimal_in_text_form() {
        assert_eq!(RawValue::Float(1.0).text_form(), "1.0");
        assert_eq!(RawValue::Float(0.25).text_form(), "0.25");
        assert_eq!(RawValue::Int(1).text_form(), "1");
    }

    #[test]
    fn feature_vector_array_round_trip() {
        let fv = FeatureVector {
            average_monthly_balance: 39655.51,
            number_of_transactions: 194,
            number_of_gst_paid_transactions: 120,
            debt_to_capital: 0.21,
            operating_profit_margins: 0.04,
            use_of_overdraft: true,
            net_working_capital_days: 80,
            year_on_year_sales_growth: 0.18,
            emi_missed_count: 0,
            utility_bill_default: false,
        };
        let arr = fv.to_array();
        assert_eq!(arr[5], 1.0);
        assert_eq!(arr[9], 0.0);
        assert_eq!(FeatureVector::from_array(arr), fv);
    }

    #[test]
    fn categories_serialize_with_display_names() {
        let json = serde_json::to_string(&RiskCategory::VeryPoor).unwrap();
        assert_eq!(json, "\"Very Poor\"");
        let json = serde_json::to_string(&RiskLevel::VeryLow).unwrap();
        assert_eq!(json, "\"Very Low Risk\"");
        for c in RiskCategory::ALL {
            assert_eq!(c.to_string(), c.display_name());
        }
    }
}
