//! Monte Carlo orchestration
//!
//! Validates inputs, derives the market distributions, pre-draws every
//! sample, evaluates trials in parallel, and reduces the per-trial
//! indicator arrays into percentile tables and success probabilities.

mod samples;

pub use samples::SampleMatrix;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::distributions::MarketDistributions;
use crate::indicators::{self, value_or_nan};
use crate::project::{ProjectParams, ValidationError, MAX_SIMULATIONS};
use crate::projection::{equity_cash_flows, financed_cash_flows};
use crate::scenarios::ScenarioTables;
use crate::stats::{nan_median, percentile_of_sorted};

/// Default number of Monte Carlo trials per assessment
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Default pseudo-random seed
pub const DEFAULT_SEED: u64 = 42;

/// Percentile set reported for every indicator
pub const SUMMARY_PERCENTILES: [f64; 7] = [5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0];

/// Simulation controls, separate from the project economics
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of trials (1..=1,000,000)
    pub n_sims: usize,
    /// Seed for the deterministic sample stream
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_sims: DEFAULT_SIMULATIONS,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.n_sims == 0 || self.n_sims > MAX_SIMULATIONS {
            return Err(ValidationError::SimulationCountOutOfRange(self.n_sims));
        }
        Ok(())
    }
}

/// Raw per-trial indicator arrays. NaN marks trials where an indicator was
/// undefined. Immutable once returned from the reduction step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResults {
    pub irr: Vec<f64>,
    pub npv: Vec<f64>,
    pub pbp: Vec<f64>,
    pub dpp: Vec<f64>,
    pub roi: Vec<f64>,
}

impl RawResults {
    fn with_capacity(n: usize) -> Self {
        Self {
            irr: Vec::with_capacity(n),
            npv: Vec::with_capacity(n),
            pbp: Vec::with_capacity(n),
            dpp: Vec::with_capacity(n),
            roi: Vec::with_capacity(n),
        }
    }
}

/// Fixed percentile levels of one indicator's distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PercentileTable {
    #[serde(rename = "P5")]
    pub p5: f64,
    #[serde(rename = "P10")]
    pub p10: f64,
    #[serde(rename = "P25")]
    pub p25: f64,
    #[serde(rename = "P50")]
    pub p50: f64,
    #[serde(rename = "P75")]
    pub p75: f64,
    #[serde(rename = "P90")]
    pub p90: f64,
    #[serde(rename = "P95")]
    pub p95: f64,
}

impl PercentileTable {
    /// Reduce one indicator array, excluding NaN trials
    pub fn from_values(values: &[f64]) -> Self {
        let mut valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        valid.sort_unstable_by(f64::total_cmp);

        Self {
            p5: percentile_of_sorted(&valid, 5.0),
            p10: percentile_of_sorted(&valid, 10.0),
            p25: percentile_of_sorted(&valid, 25.0),
            p50: percentile_of_sorted(&valid, 50.0),
            p75: percentile_of_sorted(&valid, 75.0),
            p90: percentile_of_sorted(&valid, 90.0),
            p95: percentile_of_sorted(&valid, 95.0),
        }
    }
}

/// Percentile tables for all five indicators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorPercentiles {
    #[serde(rename = "IRR")]
    pub irr: PercentileTable,
    #[serde(rename = "NPV")]
    pub npv: PercentileTable,
    #[serde(rename = "PBP")]
    pub pbp: PercentileTable,
    #[serde(rename = "DPP")]
    pub dpp: PercentileTable,
    #[serde(rename = "ROI")]
    pub roi: PercentileTable,
}

/// Success probabilities over all trials; undefined trials count as
/// failures
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessProbabilities {
    /// Pr(NPV > 0)
    pub npv_positive: f64,
    /// Pr(PBP < project lifetime)
    pub payback_within_lifetime: f64,
    /// Pr(DPP < project lifetime)
    pub discounted_payback_within_lifetime: f64,
}

/// Percentiles and probabilities reduced from the raw arrays
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub percentiles: IndicatorPercentiles,
    pub probabilities: SuccessProbabilities,
}

/// Echoed inputs and effective settings of one assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetadata {
    pub n_sims: usize,
    /// Horizon actually simulated (capped at 30 years)
    pub project_lifetime: u32,
    /// Median of the per-trial discount rates
    pub disc_target_used: f64,
    pub capex: f64,
    pub annual_maintenance_cost: f64,
    pub annual_energy_savings: f64,
    pub loan_amount: f64,
    pub loan_term: u32,
    pub loan_rate: Option<f64>,
    pub seed: u64,
}

/// Complete result bundle of one assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub raw: RawResults,
    pub summary: SimulationSummary,
    pub metadata: SimulationMetadata,
    /// Distribution parameters, kept for downstream rendering of median
    /// trajectories
    pub market_distributions: MarketDistributions,
}

/// One trial's indicator values (NaN where unresolved)
struct TrialOutcome {
    irr: f64,
    npv: f64,
    pbp: f64,
    dpp: f64,
    roi: f64,
}

/// Pre-loaded engine for running assessments against one scenario set.
///
/// The scenario tables are injected at construction, so tests and callers
/// with their own forecasts substitute them directly; `new()` uses the
/// built-in curated set.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    tables: ScenarioTables,
}

impl RiskEngine {
    /// Engine over the built-in scenario tables
    pub fn new() -> Self {
        Self {
            tables: ScenarioTables::builtin(),
        }
    }

    /// Engine over caller-supplied scenario tables
    pub fn with_tables(tables: ScenarioTables) -> Self {
        Self { tables }
    }

    /// The scenario set this engine assesses against
    pub fn tables(&self) -> &ScenarioTables {
        &self.tables
    }

    /// Run one full Monte Carlo assessment.
    ///
    /// Identical `params` + `config` reproduce bit-identical raw arrays,
    /// independent of thread count: all draws happen before the parallel
    /// trial loop, and each trial writes only its own slot.
    pub fn run(
        &self,
        params: &ProjectParams,
        config: &SimulationConfig,
    ) -> Result<AssessmentResult, ValidationError> {
        params.validate()?;
        config.validate()?;

        let horizon = params.horizon();
        let dist = MarketDistributions::from_scenarios(&self.tables, params.project_lifetime);
        let samples = SampleMatrix::draw(&dist, config.n_sims, config.seed, params.loan_rate);
        debug!(
            "drew samples for {} trials over {} years (seed {})",
            config.n_sims, horizon, config.seed
        );

        let trials: Vec<TrialOutcome> = (0..config.n_sims)
            .into_par_iter()
            .map(|trial| evaluate_trial(params, &samples, horizon, trial))
            .collect();

        let mut raw = RawResults::with_capacity(config.n_sims);
        for trial in &trials {
            raw.irr.push(trial.irr);
            raw.npv.push(trial.npv);
            raw.pbp.push(trial.pbp);
            raw.dpp.push(trial.dpp);
            raw.roi.push(trial.roi);
        }

        let lifetime = horizon as f64;
        let summary = SimulationSummary {
            percentiles: IndicatorPercentiles {
                irr: PercentileTable::from_values(&raw.irr),
                npv: PercentileTable::from_values(&raw.npv),
                pbp: PercentileTable::from_values(&raw.pbp),
                dpp: PercentileTable::from_values(&raw.dpp),
                roi: PercentileTable::from_values(&raw.roi),
            },
            probabilities: SuccessProbabilities {
                npv_positive: fraction(&raw.npv, |v| v > 0.0),
                payback_within_lifetime: fraction(&raw.pbp, |v| v < lifetime),
                discounted_payback_within_lifetime: fraction(&raw.dpp, |v| v < lifetime),
            },
        };
        debug!(
            "reduced {} trials: Pr(NPV > 0) = {:.4}",
            config.n_sims, summary.probabilities.npv_positive
        );

        let metadata = SimulationMetadata {
            n_sims: config.n_sims,
            project_lifetime: horizon as u32,
            disc_target_used: nan_median(&samples.first_year_discount_rates()),
            capex: params.capex,
            annual_maintenance_cost: params.annual_maintenance_cost,
            annual_energy_savings: params.annual_energy_savings,
            loan_amount: params.loan_amount,
            loan_term: params.loan_term,
            loan_rate: params.loan_rate,
            seed: config.seed,
        };

        Ok(AssessmentResult {
            raw,
            summary,
            metadata,
            market_distributions: dist,
        })
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one assessment against the built-in scenario tables
pub fn run_simulation(
    params: &ProjectParams,
    config: &SimulationConfig,
) -> Result<AssessmentResult, ValidationError> {
    RiskEngine::new().run(params, config)
}

fn evaluate_trial(
    params: &ProjectParams,
    samples: &SampleMatrix,
    horizon: usize,
    trial: usize,
) -> TrialOutcome {
    let prices = samples.trial_electricity_prices(trial);
    let inflation = samples.trial_inflation(trial);
    let discount_rate = samples.trial_discount_rate(trial);

    let flows = if params.is_financed() {
        financed_cash_flows(
            params.capex,
            params.annual_energy_savings,
            params.annual_maintenance_cost,
            horizon,
            prices,
            inflation,
            params.loan_amount,
            samples.trial_loan_rates(trial),
            params.loan_term as usize,
        )
    } else {
        equity_cash_flows(
            params.capex,
            params.annual_energy_savings,
            params.annual_maintenance_cost,
            horizon,
            prices,
            inflation,
        )
    };

    TrialOutcome {
        irr: value_or_nan(indicators::irr(&flows)),
        npv: indicators::npv(discount_rate, &flows),
        pbp: value_or_nan(indicators::pbp(&flows)),
        dpp: value_or_nan(indicators::dpp(discount_rate, horizon, &flows)),
        roi: value_or_nan(indicators::roi(&flows)),
    }
}

/// Fraction of all trials satisfying the predicate; NaN entries never
/// satisfy it, so undefined trials count against success
fn fraction(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().filter(|&&v| predicate(v)).count() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_params() -> ProjectParams {
        ProjectParams::financed(60_000.0, 27_400.0, 2_000.0, 20, 25_000.0, 15)
    }

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            n_sims: 500,
            seed: 42,
        }
    }

    fn assert_bits_equal(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_same_seed_reproduces_raw_arrays_bit_for_bit() {
        let engine = RiskEngine::new();
        let a = engine.run(&reference_params(), &small_config()).unwrap();
        let b = engine.run(&reference_params(), &small_config()).unwrap();

        assert_bits_equal(&a.raw.irr, &b.raw.irr);
        assert_bits_equal(&a.raw.npv, &b.raw.npv);
        assert_bits_equal(&a.raw.pbp, &b.raw.pbp);
        assert_bits_equal(&a.raw.dpp, &b.raw.dpp);
        assert_bits_equal(&a.raw.roi, &b.raw.roi);
    }

    #[test]
    fn test_raw_arrays_have_one_slot_per_trial() {
        let result = run_simulation(&reference_params(), &small_config()).unwrap();
        assert_eq!(result.raw.irr.len(), 500);
        assert_eq!(result.raw.npv.len(), 500);
        assert_eq!(result.raw.roi.len(), 500);
    }

    #[test]
    fn test_percentiles_monotonic() {
        let result = run_simulation(&reference_params(), &small_config()).unwrap();
        let tables = [
            result.summary.percentiles.irr,
            result.summary.percentiles.npv,
            result.summary.percentiles.pbp,
            result.summary.percentiles.dpp,
            result.summary.percentiles.roi,
        ];

        for t in tables {
            assert!(t.p10 <= t.p50, "P10 {} > P50 {}", t.p10, t.p50);
            assert!(t.p50 <= t.p90, "P50 {} > P90 {}", t.p50, t.p90);
            assert!(t.p5 <= t.p95);
        }
    }

    #[test]
    fn test_probabilities_are_fractions() {
        let result = run_simulation(&reference_params(), &small_config()).unwrap();
        let p = result.summary.probabilities;

        for value in [
            p.npv_positive,
            p.payback_within_lifetime,
            p.discounted_payback_within_lifetime,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_reference_scenario_is_viable() {
        // 27,400 kWh/year at grid prices dwarfs maintenance and debt
        // service; the median trial must be profitable
        let result = run_simulation(&reference_params(), &small_config()).unwrap();

        assert!(result.summary.percentiles.npv.p50 > 0.0);
        assert!(result.summary.percentiles.pbp.p50 < 20.0);
        assert!(result.summary.probabilities.npv_positive > 0.5);
    }

    #[test]
    fn test_validation_precedes_simulation() {
        let mut params = reference_params();
        params.project_lifetime = 31;
        assert_eq!(
            run_simulation(&params, &small_config()).unwrap_err(),
            ValidationError::LifetimeTooLong(31)
        );

        let config = SimulationConfig { n_sims: 0, seed: 42 };
        assert_eq!(
            run_simulation(&reference_params(), &config).unwrap_err(),
            ValidationError::SimulationCountOutOfRange(0)
        );

        let config = SimulationConfig {
            n_sims: 1_000_001,
            seed: 42,
        };
        assert_eq!(
            run_simulation(&reference_params(), &config).unwrap_err(),
            ValidationError::SimulationCountOutOfRange(1_000_001)
        );
    }

    #[test]
    fn test_equity_only_project_runs() {
        let params = ProjectParams::equity(60_000.0, 27_400.0, 2_000.0, 20);
        let result = run_simulation(&params, &small_config()).unwrap();

        assert_eq!(result.metadata.loan_amount, 0.0);
        assert!(result.summary.percentiles.npv.p50.is_finite());
    }

    #[test]
    fn test_fixed_loan_rate_echoed_and_applied() {
        let mut params = reference_params();
        params.loan_rate = Some(3.5);
        let fixed = run_simulation(&params, &small_config()).unwrap();
        let sampled = run_simulation(&reference_params(), &small_config()).unwrap();

        assert_eq!(fixed.metadata.loan_rate, Some(3.5));
        // Removing rate uncertainty changes the cash flows
        assert_ne!(
            fixed.summary.percentiles.npv.p50,
            sampled.summary.percentiles.npv.p50
        );
    }

    #[test]
    fn test_metadata_echoes_inputs() {
        let result = run_simulation(&reference_params(), &small_config()).unwrap();
        let m = &result.metadata;

        assert_eq!(m.n_sims, 500);
        assert_eq!(m.project_lifetime, 20);
        assert_eq!(m.capex, 60_000.0);
        assert_eq!(m.loan_term, 15);
        assert_eq!(m.seed, 42);
        // Effective discount rate centers on the moderate 5% scenario
        assert!(m.disc_target_used > 0.0 && m.disc_target_used < 0.10);
    }

    #[test]
    fn test_distribution_parameters_included_for_rendering() {
        let result = run_simulation(&reference_params(), &small_config()).unwrap();
        assert_eq!(result.market_distributions.horizon, 20);
        assert_eq!(result.market_distributions.inflation.mean.len(), 20);
    }
}
