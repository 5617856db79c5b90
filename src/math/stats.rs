//! Summary statistics and regression metrics.

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by `n`), or `None` for an empty slice.
pub fn population_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Mean absolute error.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let total: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum();
    Some(total / actual.len() as f64)
}

/// Root mean squared error.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let sse: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p) * (a - p)).sum();
    Some((sse / actual.len() as f64).sqrt())
}

/// Coefficient of determination.
///
/// A constant `actual` series yields 1.0 for a perfect prediction and 0.0
/// otherwise.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    paired(actual, predicted)?;
    let m = mean(actual)?;
    let ss_res: f64 = actual.iter().zip(predicted).map(|(a, p)| (a - p) * (a - p)).sum();
    let ss_tot: f64 = actual.iter().map(|a| (a - m) * (a - m)).sum();
    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}

fn paired(a: &[f64], b: &[f64]) -> Option<()> {
    (!a.is_empty() && a.len() == b.len()).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(0.123456, 3), 0.123);
        assert_eq!(round_to(0.9935, 2), 0.99);
        assert_eq!(round_to(-0.145, 1), -0.1);
    }

    #[test]
    fn mean_and_std() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), Some(5.0));
        assert!((population_std(&v).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn error_metrics() {
        let a = [1.0, 2.0, 3.0];
        let p = [1.0, 2.0, 5.0];
        assert!((mae(&a, &p).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((rmse(&a, &p).unwrap() - (4.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((r_squared(&a, &a).unwrap() - 1.0).abs() < 1e-12);
        assert!((r_squared(&a, &p).unwrap() - (1.0 - 4.0 / 2.0)).abs() < 1e-12);
        assert_eq!(mae(&a, &p[..2]), None);
    }
}
