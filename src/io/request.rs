//! JSON request/response contract.
//!
//! A request is an object keyed by the snake_case feature names; each value is
//! any JSON scalar and goes through the same coercion as positional input. The
//! response is the flat assessment object with the performance score rounded
//! to three decimals.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{CreditAssessment, RawValue, RiskCategory, RiskLevel};
use crate::error::{AppError, EXIT_INPUT};
use crate::math::round_to;

/// One business as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessData {
    pub average_monthly_balance: RawValue,
    pub number_of_transactions: RawValue,
    pub number_of_gst_paid_transactions: RawValue,
    pub debt_to_capital: RawValue,
    pub operating_profit_margins: RawValue,
    pub use_of_overdraft: RawValue,
    pub net_working_capital_days: RawValue,
    pub year_on_year_sales_growth: RawValue,
    pub emi_missed_count: RawValue,
    pub utility_bill_default: RawValue,
}

impl BusinessData {
    /// Values in `FEATURES` order.
    pub fn to_raw_values(&self) -> Vec<RawValue> {
        vec![
            self.average_monthly_balance.clone(),
            self.number_of_transactions.clone(),
            self.number_of_gst_paid_transactions.clone(),
            self.debt_to_capital.clone(),
            self.operating_profit_margins.clone(),
            self.use_of_overdraft.clone(),
            self.net_working_capital_days.clone(),
            self.year_on_year_sales_growth.clone(),
            self.emi_missed_count.clone(),
            self.utility_bill_default.clone(),
        ]
    }
}

/// Output contract for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub performance_score: f64,
    pub credit_score: i64,
    pub risk_category: RiskCategory,
    pub risk_level: RiskLevel,
    pub recommendation: String,
}

impl From<&CreditAssessment> for AssessmentResponse {
    fn from(a: &CreditAssessment) -> Self {
        Self {
            performance_score: round_to(a.performance_score, 3),
            credit_score: a.credit_score,
            risk_category: a.risk_category,
            risk_level: a.risk_level,
            recommendation: a.recommendation.clone(),
        }
    }
}

/// Read a `BusinessData` JSON file.
pub fn read_business_json(path: &Path) -> Result<BusinessData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open input JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid input JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classify;

    const REQUEST: &str = r#"{
        "average_monthly_balance": 39655.51,
        "number_of_transactions": 194,
        "number_of_gst_paid_transactions": "120",
        "debt_to_capital": 0.21,
        "operating_profit_margins": 0.04,
        "use_of_overdraft": false,
        "net_working_capital_days": 80,
        "year_on_year_sales_growth": 0.18,
        "emi_missed_count": 0,
        "utility_bill_default": "yes"
    }"#;

    #[test]
    fn request_maps_to_ordered_values() {
        let data: BusinessData = serde_json::from_str(REQUEST).unwrap();
        let raw = data.to_raw_values();
        assert_eq!(raw.len(), 10);
        assert_eq!(raw[0], RawValue::Float(39655.51));
        assert_eq!(raw[2], RawValue::Text("120".to_string()));
        assert_eq!(raw[5], RawValue::Bool(false));
        assert_eq!(raw[9], RawValue::Text("yes".to_string()));
    }

    #[test]
    fn missing_or_unknown_fields_are_rejected() {
        let missing = REQUEST.replace("\"emi_missed_count\": 0,", "");
        assert!(serde_json::from_str::<BusinessData>(&missing).is_err());

        let extra = REQUEST.replace("\"emi_missed_count\": 0,", "\"emi_missed_count\": 0, \"cin\": \"X\",");
        assert!(serde_json::from_str::<BusinessData>(&extra).is_err());
    }

    #[test]
    fn response_rounds_score_and_uses_display_names() {
        let response = AssessmentResponse::from(&classify(0.123456));
        assert_eq!(response.performance_score, 0.123);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["risk_category"], "Very Poor");
        assert_eq!(json["risk_level"], "Very High Risk");
        assert_eq!(json["credit_score"], 368);
        assert_eq!(json["recommendation"], "Strong rejection recommended");
    }
}
