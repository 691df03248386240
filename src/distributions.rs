//! Scenario-to-distribution conversion
//!
//! Derives per-year parametric distribution parameters from the three named
//! forecast paths of each macro-variable. Inflation, loan rate, and
//! discount rate are Normal on the linear scale; electricity price is
//! Lognormal so draws stay strictly positive.

use serde::{Deserialize, Serialize};

use crate::project::MAX_LIFETIME_YEARS;
use crate::scenarios::{pad_to_length, ScenarioPaths, ScenarioTables};

/// Φ⁻¹(0.90): the P10–P90 spread of a standard Normal is 2 × Z90 × σ
pub const Z90: f64 = 1.2815515655446004;

/// Lower bound on σ so coinciding optimistic/pessimistic paths never
/// produce a zero-width distribution
const SIGMA_FLOOR: f64 = 1e-12;

/// Percentile inputs for the price distribution are clamped here before
/// taking logs
const PRICE_EPS: f64 = 1e-9;

/// Per-year Normal parameters on the linear scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalParams {
    pub mean: Vec<f64>,
    pub sigma: Vec<f64>,
}

/// Per-year Lognormal parameters (Normal in log space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LognormalParams {
    pub log_mean: Vec<f64>,
    pub log_sigma: Vec<f64>,
}

/// Distribution parameters for every macro-variable over the capped horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDistributions {
    /// Inflation, % year-over-year
    pub inflation: NormalParams,
    /// Loan interest rate, % per year
    pub loan_rate: NormalParams,
    /// Discount rate, fraction
    pub discount: NormalParams,
    /// Electricity price, currency per kWh
    pub electricity_price: LognormalParams,
    /// Number of projection years all parameter vectors share
    pub horizon: usize,
}

impl MarketDistributions {
    /// Derive per-year distribution parameters from the scenario tables.
    ///
    /// Percentile roles are uniform across variables: optimistic ↔ P10,
    /// moderate ↔ P50, pessimistic ↔ P90. For electricity price
    /// "optimistic" means cheap grid power; the mapping is the same, only
    /// the distribution family differs.
    pub fn from_scenarios(tables: &ScenarioTables, project_lifetime: u32) -> Self {
        let horizon = project_lifetime.min(MAX_LIFETIME_YEARS) as usize;

        let inflation = normal_from_paths(&tables.inflation, horizon);
        let loan_rate = normal_from_paths(&tables.loan_rate, horizon);
        let discount = normal_from_paths(&broadcast_scalar(&tables.discount_rate, horizon), horizon);
        let electricity_price = lognormal_from_paths(&tables.electricity_price, horizon);

        Self {
            inflation,
            loan_rate,
            discount,
            electricity_price,
            horizon,
        }
    }
}

/// mean = P50, σ = (P90 − P10) / (2 × Z90), floored at [`SIGMA_FLOOR`]
fn normal_from_paths(paths: &ScenarioPaths, horizon: usize) -> NormalParams {
    let p10 = pad_to_length(&paths.optimistic, horizon);
    let p50 = pad_to_length(&paths.moderate, horizon);
    let p90 = pad_to_length(&paths.pessimistic, horizon);

    let sigma = p10
        .iter()
        .zip(&p90)
        .map(|(lo, hi)| ((hi - lo) / (2.0 * Z90)).max(SIGMA_FLOOR))
        .collect();

    NormalParams { mean: p50, sigma }
}

/// Same role assignment as [`normal_from_paths`], taken in log space after
/// clamping the percentile inputs to [`PRICE_EPS`]
fn lognormal_from_paths(paths: &ScenarioPaths, horizon: usize) -> LognormalParams {
    let p10 = pad_to_length(&paths.optimistic, horizon);
    let p50 = pad_to_length(&paths.moderate, horizon);
    let p90 = pad_to_length(&paths.pessimistic, horizon);

    let log_mean = p50.iter().map(|p| p.max(PRICE_EPS).ln()).collect();
    let log_sigma = p10
        .iter()
        .zip(&p90)
        .map(|(lo, hi)| {
            let spread = hi.max(PRICE_EPS).ln() - lo.max(PRICE_EPS).ln();
            (spread / (2.0 * Z90)).max(SIGMA_FLOOR)
        })
        .collect();

    LognormalParams {
        log_mean,
        log_sigma,
    }
}

/// Discount scenarios are one scalar per label; repeat each across the
/// horizon before the Normal fit
fn broadcast_scalar(paths: &ScenarioPaths, horizon: usize) -> ScenarioPaths {
    let scalar = |path: &[f64]| vec![path.first().copied().unwrap_or(0.0); horizon];
    ScenarioPaths::new(
        scalar(&paths.optimistic),
        scalar(&paths.moderate),
        scalar(&paths.pessimistic),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normal_sigma_matches_p10_p90_spread() {
        let paths = ScenarioPaths::new(vec![2.0], vec![3.0], vec![4.0]);
        let params = normal_from_paths(&paths, 1);

        assert_relative_eq!(params.mean[0], 3.0);
        assert_relative_eq!(params.sigma[0], 2.0 / (2.0 * Z90));
    }

    #[test]
    fn test_sigma_floor_when_paths_coincide() {
        let paths = ScenarioPaths::new(vec![2.5], vec![2.5], vec![2.5]);
        let params = normal_from_paths(&paths, 5);

        assert!(params.sigma.iter().all(|&s| s >= 1e-12));
        assert!(params.sigma.iter().all(|&s| s <= 1e-11));
    }

    #[test]
    fn test_lognormal_works_in_log_space() {
        let paths = ScenarioPaths::new(vec![0.20], vec![0.25], vec![0.30]);
        let params = lognormal_from_paths(&paths, 1);

        assert_relative_eq!(params.log_mean[0], 0.25_f64.ln());
        assert_relative_eq!(
            params.log_sigma[0],
            (0.30_f64.ln() - 0.20_f64.ln()) / (2.0 * Z90)
        );
    }

    #[test]
    fn test_lognormal_clamps_non_positive_prices() {
        let paths = ScenarioPaths::new(vec![0.0], vec![-1.0], vec![0.1]);
        let params = lognormal_from_paths(&paths, 1);

        assert_relative_eq!(params.log_mean[0], 1e-9_f64.ln());
        assert!(params.log_sigma[0].is_finite());
        assert!(params.log_sigma[0] > 0.0);
    }

    #[test]
    fn test_short_paths_padded_with_last_value() {
        let paths = ScenarioPaths::new(vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]);
        let params = normal_from_paths(&paths, 4);

        assert_eq!(params.mean, vec![3.0, 4.0, 4.0, 4.0]);
        assert_relative_eq!(params.sigma[3], 4.0 / (2.0 * Z90));
    }

    #[test]
    fn test_builtin_horizon_capped_at_30() {
        let tables = ScenarioTables::builtin();
        let dist = MarketDistributions::from_scenarios(&tables, 45);

        assert_eq!(dist.horizon, 30);
        assert_eq!(dist.inflation.mean.len(), 30);
        assert_eq!(dist.electricity_price.log_mean.len(), 30);
        assert_eq!(dist.discount.mean.len(), 30);
    }

    #[test]
    fn test_discount_broadcast_constant_across_years() {
        let tables = ScenarioTables::builtin();
        let dist = MarketDistributions::from_scenarios(&tables, 10);

        assert!(dist.discount.mean.iter().all(|&m| m == 0.05));
        let expected_sigma = (0.07 - 0.03) / (2.0 * Z90);
        for &s in &dist.discount.sigma {
            assert_relative_eq!(s, expected_sigma);
        }
    }
}
