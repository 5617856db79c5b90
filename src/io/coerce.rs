//! Raw input coercion.
//!
//! Turns ten opaque input cells into a typed `FeatureVector`, following the
//! scalar kind recorded for each position in `FEATURES`:
//!
//! - `Float`: parsed as `f64` (text is trimmed first)
//! - `Integer`: parsed as `f64`, then truncated toward zero (`"37.0"` -> 37);
//!   magnitudes above 2^53 are rejected
//! - `Flag`: native booleans map directly; anything else is matched on its
//!   text form against `true` / `1` / `yes` (case-insensitive)
//!
//! In permissive mode an unrecognized flag value silently maps to 0. Strict mode
//! also accepts `false` / `0` / `no` and rejects everything else.

use crate::domain::{
    CoercionMode, FEATURE_COUNT, FEATURES, FeatureDescriptor, FeatureKind, FeatureVector, RawValue,
};
use crate::error::ScoreError;

const TRUTHY: [&str; 3] = ["true", "1", "yes"];
const FALSY: [&str; 3] = ["false", "0", "no"];

/// Largest magnitude an integer field keeps exactly after the `f64` round trip.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Validate and coerce a raw ten-value input.
pub fn coerce(raw: &[RawValue], mode: CoercionMode) -> Result<FeatureVector, ScoreError> {
    if raw.len() != FEATURE_COUNT {
        return Err(ScoreError::validation(format!(
            "Expected {FEATURE_COUNT} values, got {}",
            raw.len()
        )));
    }

    let mut values = [0.0; FEATURE_COUNT];
    for (pos, (value, desc)) in raw.iter().zip(FEATURES.iter()).enumerate() {
        values[pos] = match desc.kind {
            FeatureKind::Float => coerce_float(value, desc, pos)?,
            FeatureKind::Integer => coerce_integer(value, desc, pos)?,
            FeatureKind::Flag => coerce_flag(value, desc, pos, mode)?,
        };
    }

    Ok(FeatureVector::from_array(values))
}

fn coerce_float(value: &RawValue, desc: &FeatureDescriptor, pos: usize) -> Result<f64, ScoreError> {
    let parsed = match value {
        RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawValue::Int(i) => Some(*i as f64),
        RawValue::Float(v) => Some(*v),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(field_error(desc, pos, format!("non-finite value {v}"))),
        None => Err(field_error(
            desc,
            pos,
            format!("cannot parse '{}' as a number", value.text_form()),
        )),
    }
}

fn coerce_integer(value: &RawValue, desc: &FeatureDescriptor, pos: usize) -> Result<f64, ScoreError> {
    let v = coerce_float(value, desc, pos)?.trunc();
    if v.abs() > MAX_EXACT_INTEGER {
        return Err(field_error(desc, pos, format!("integer {v} is out of range")));
    }
    Ok(v)
}

fn coerce_flag(
    value: &RawValue,
    desc: &FeatureDescriptor,
    pos: usize,
    mode: CoercionMode,
) -> Result<f64, ScoreError> {
    if let RawValue::Bool(b) = value {
        return Ok(if *b { 1.0 } else { 0.0 });
    }

    let text = value.text_form().to_lowercase();
    if TRUTHY.contains(&text.as_str()) {
        return Ok(1.0);
    }

    match mode {
        CoercionMode::Permissive => Ok(0.0),
        CoercionMode::Strict if FALSY.contains(&text.as_str()) => Ok(0.0),
        CoercionMode::Strict => Err(field_error(
            desc,
            pos,
            format!("'{}' is not a recognized boolean (expected true/false, yes/no, 1/0)", value.text_form()),
        )),
    }
}

fn field_error(desc: &FeatureDescriptor, pos: usize, detail: String) -> ScoreError {
    ScoreError::validation(format!("`{}` (position {}): {detail}", desc.name, pos + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(overdraft: RawValue, utility: RawValue) -> Vec<RawValue> {
        vec![
            RawValue::from(5.0),
            RawValue::from(37i64),
            RawValue::from(26i64),
            RawValue::from(0.39),
            RawValue::from(0.05),
            overdraft,
            RawValue::from(87i64),
            RawValue::from(-0.14),
            RawValue::from(3i64),
            utility,
        ]
    }

    #[test]
    fn rejects_wrong_arity() {
        let raw = vec![RawValue::from(1.0); 9];
        let err = coerce(&raw, CoercionMode::Permissive).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Expected 10 values, got 9"));

        let raw = vec![RawValue::from(1.0); 11];
        assert!(coerce(&raw, CoercionMode::Permissive).is_err());
    }

    #[test]
    fn integers_tolerate_float_text_and_truncate() {
        let mut raw = sample(true.into(), false.into());
        raw[1] = RawValue::from("37.0");
        raw[2] = RawValue::from("26.9");
        raw[6] = RawValue::from(87.7);
        raw[8] = RawValue::from(" 3 ");
        let fv = coerce(&raw, CoercionMode::Permissive).unwrap();
        assert_eq!(fv.number_of_transactions, 37);
        assert_eq!(fv.number_of_gst_paid_transactions, 26);
        assert_eq!(fv.net_working_capital_days, 87);
        assert_eq!(fv.emi_missed_count, 3);
    }

    #[test]
    fn negative_integers_truncate_toward_zero() {
        let mut raw = sample(true.into(), false.into());
        raw[6] = RawValue::from("-4.8");
        let fv = coerce(&raw, CoercionMode::Permissive).unwrap();
        assert_eq!(fv.net_working_capital_days, -4);
    }

    #[test]
    fn oversized_integers_are_rejected() {
        let mut raw = sample(true.into(), false.into());
        raw[1] = RawValue::from("1e20");
        let err = coerce(&raw, CoercionMode::Permissive).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("number_of_transactions"));
        assert!(err.to_string().contains("position 2"));

        raw[1] = RawValue::from("-9007199254740994");
        assert!(coerce(&raw, CoercionMode::Permissive).is_err());

        raw[1] = RawValue::from("9007199254740992");
        let fv = coerce(&raw, CoercionMode::Permissive).unwrap();
        assert_eq!(fv.number_of_transactions, 9_007_199_254_740_992);
    }

    #[test]
    fn unparsable_numbers_fail_with_feature_name() {
        let mut raw = sample(true.into(), false.into());
        raw[3] = RawValue::from("abc");
        let err = coerce(&raw, CoercionMode::Permissive).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("debt_to_capital"));

        let mut raw = sample(true.into(), false.into());
        raw[1] = RawValue::from("");
        assert!(coerce(&raw, CoercionMode::Permissive).is_err());
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut raw = sample(true.into(), false.into());
        raw[0] = RawValue::from("NaN");
        assert!(coerce(&raw, CoercionMode::Permissive).is_err());
        raw[0] = RawValue::from(f64::INFINITY);
        assert!(coerce(&raw, CoercionMode::Permissive).is_err());
    }

    #[test]
    fn flags_follow_permissive_vocabulary() {
        let fv = coerce(&sample("Yes".into(), "no".into()), CoercionMode::Permissive).unwrap();
        assert!(fv.use_of_overdraft);
        assert!(!fv.utility_bill_default);

        let fv = coerce(&sample("TRUE".into(), "maybe".into()), CoercionMode::Permissive).unwrap();
        assert!(fv.use_of_overdraft);
        assert!(!fv.utility_bill_default);

        let fv = coerce(&sample(RawValue::from(1i64), RawValue::from("1")), CoercionMode::Permissive).unwrap();
        assert!(fv.use_of_overdraft);
        assert!(fv.utility_bill_default);

        let fv = coerce(&sample(true.into(), false.into()), CoercionMode::Permissive).unwrap();
        assert!(fv.use_of_overdraft);
        assert!(!fv.utility_bill_default);
    }

    #[test]
    fn whole_float_flag_is_not_truthy() {
        let fv = coerce(&sample(RawValue::from(1.0), false.into()), CoercionMode::Permissive).unwrap();
        assert!(!fv.use_of_overdraft);
    }

    #[test]
    fn strict_mode_rejects_unrecognized_flags() {
        let fv = coerce(&sample("yes".into(), "No".into()), CoercionMode::Strict).unwrap();
        assert!(fv.use_of_overdraft);
        assert!(!fv.utility_bill_default);

        let err = coerce(&sample("yes".into(), "nope".into()), CoercionMode::Strict).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("utility_bill_default"));

        assert!(coerce(&sample(RawValue::from(2i64), false.into()), CoercionMode::Strict).is_err());
    }

    #[test]
    fn float_fields_accept_native_booleans() {
        let mut raw = sample(true.into(), false.into());
        raw[4] = RawValue::from(true);
        let fv = coerce(&raw, CoercionMode::Permissive).unwrap();
        assert_eq!(fv.operating_profit_margins, 1.0);
    }
}
