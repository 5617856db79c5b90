//! Synthetic business dataset generation.
//!
//! Produces correlated, plausible business profiles together with a rule-based
//! performance score, so the fitter has something realistic to learn from when
//! no real portfolio data is available. Output is fully determined by the seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Beta, Gamma, LogNormal, Normal, Poisson};

use crate::domain::{BusinessRecord, FeatureVector};
use crate::error::{AppError, EXIT_INPUT, EXIT_NUMERIC};
use crate::math::round_to;

const STATE_CODES: [&str; 8] = ["DL", "MH", "KA", "TN", "GJ", "UP", "WB", "RJ"];
const COMPANY_TYPES: [&str; 3] = ["PTC", "PLC", "LLC"];

const EMI_CAP: i64 = 8;

struct Distributions {
    size: LogNormal<f64>,
    balance: Normal<f64>,
    transactions: Normal<f64>,
    gst_rate: Beta<f64>,
    debt: Beta<f64>,
    margin: Gamma<f64>,
    wc_days: Normal<f64>,
    growth: Normal<f64>,
    emi: Poisson<f64>,
}

impl Distributions {
    fn new() -> Result<Self, AppError> {
        let err = |e: &dyn std::fmt::Display| AppError::new(EXIT_NUMERIC, format!("Distribution error: {e}"));
        Ok(Self {
            size: LogNormal::new(0.0, 1.0).map_err(|e| err(&e))?,
            balance: Normal::new(50_000.0, 25_000.0).map_err(|e| err(&e))?,
            transactions: Normal::new(100.0, 50.0).map_err(|e| err(&e))?,
            gst_rate: Beta::new(2.0, 1.0).map_err(|e| err(&e))?,
            debt: Beta::new(2.0, 2.0).map_err(|e| err(&e))?,
            margin: Gamma::new(2.0, 0.05).map_err(|e| err(&e))?,
            wc_days: Normal::new(70.0, 30.0).map_err(|e| err(&e))?,
            growth: Normal::new(0.1, 0.15).map_err(|e| err(&e))?,
            emi: Poisson::new(2.0).map_err(|e| err(&e))?,
        })
    }
}

/// Generate `count` labelled records.
pub fn generate_dataset(count: usize, seed: u64) -> Result<Vec<BusinessRecord>, AppError> {
    if count == 0 {
        return Err(AppError::new(EXIT_INPUT, "Record count must be > 0."));
    }

    let dist = Distributions::new()?;
    let mut rng = StdRng::seed_from_u64(seed);

    let records: Vec<BusinessRecord> = (1..=count)
        .map(|i| {
            let features = sample_features(&mut rng, &dist);
            BusinessRecord {
                company_name: format!("Business_{i}"),
                cin: generate_cin(&mut rng),
                performance_score: performance_score(&features),
                features,
            }
        })
        .collect();

    tracing::info!(count, seed, "synthetic dataset generated");
    Ok(records)
}

fn sample_features(rng: &mut StdRng, dist: &Distributions) -> FeatureVector {
    let size = dist.size.sample(rng);

    let balance = round_to(dist.balance.sample(rng) * (size / 2.0), 2).clamp(5_000.0, 200_000.0);

    let transactions = ((dist.transactions.sample(rng) * (size / 1.5)).trunc() as i64).clamp(10, 300);
    let gst_paid = (transactions as f64 * dist.gst_rate.sample(rng)).trunc() as i64;

    let debt = round_to(dist.debt.sample(rng), 2);
    let margin = round_to(dist.margin.sample(rng), 2).min(0.35);

    let overdraft = rng.r#gen::<f64>() < 0.3 + debt * 0.4;

    let wc_days = (dist.wc_days.sample(rng).trunc() as i64).clamp(5, 150);
    let growth = round_to(dist.growth.sample(rng), 2).clamp(-0.3, 0.5);

    let emi_prob = debt * 0.3 + if overdraft { 0.1 } else { 0.0 };
    let emi_missed = if rng.r#gen::<f64>() < emi_prob {
        let draw: f64 = dist.emi.sample(rng);
        (draw as i64 + 1).min(EMI_CAP)
    } else {
        0
    };

    let utility_prob = 0.15 + emi_missed as f64 * 0.05 + if overdraft { 0.1 } else { 0.0 };
    let utility_default = rng.r#gen::<f64>() < utility_prob;

    FeatureVector {
        average_monthly_balance: balance,
        number_of_transactions: transactions,
        number_of_gst_paid_transactions: gst_paid,
        debt_to_capital: debt,
        operating_profit_margins: margin,
        use_of_overdraft: overdraft,
        net_working_capital_days: wc_days,
        year_on_year_sales_growth: growth,
        emi_missed_count: emi_missed,
        utility_bill_default: utility_default,
    }
}

/// `{L|U}{industry:5}{state}{year}{type}{serial:6}`, e.g. `U54321MH1999PLC654321`.
fn generate_cin(rng: &mut StdRng) -> String {
    let listing = if rng.gen_bool(0.5) { 'L' } else { 'U' };
    let industry = rng.gen_range(10_000..=99_999);
    let state = STATE_CODES[rng.gen_range(0..STATE_CODES.len())];
    let year = rng.gen_range(1990..=2020);
    let kind = COMPANY_TYPES[rng.gen_range(0..COMPANY_TYPES.len())];
    let serial = rng.gen_range(100_000..=999_999);
    format!("{listing}{industry}{state}{year}{kind}{serial}")
}

/// Rule-based composite score used as the training label.
///
/// Weighted components (debt 10%, margin 25%, growth 15%, missed EMIs 20%,
/// utility default 15%, GST compliance 10%) minus 2.5% for overdraft use and
/// 2.5% for more than 100 working capital days. Clamped to [0.1, 0.95] and
/// rounded to two decimals.
pub fn performance_score(f: &FeatureVector) -> f64 {
    let debt = (1.0 - f.debt_to_capital).max(0.0) * 0.10;
    let profit = (f.operating_profit_margins / 0.3).min(1.0) * 0.25;
    let growth = ((f.year_on_year_sales_growth + 0.2) / 0.4).clamp(0.0, 1.0) * 0.15;
    let emi = (1.0 - f.emi_missed_count as f64 / 5.0).max(0.0) * 0.20;
    let utility = if f.utility_bill_default { 0.0 } else { 0.15 };
    let gst = f.number_of_gst_paid_transactions as f64 / f.number_of_transactions.max(1) as f64 * 0.10;

    let mut penalty = 0.0;
    if f.use_of_overdraft {
        penalty += 0.025;
    }
    if f.net_working_capital_days > 100 {
        penalty += 0.025;
    }

    let total = debt + profit + growth + emi + utility + gst - penalty;
    round_to(total.clamp(0.1, 0.95), 2)
}
