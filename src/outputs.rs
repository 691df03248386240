//! Per-indicator extraction and report formatting
//!
//! The presentation layer pulls individual KPI results out of an
//! [`AssessmentResult`] in several shapes: a single point forecast, a
//! percentile summary, the full distribution, or a custom threshold
//! probability. Unknown indicator names and comparison operators parse to
//! validation errors, never panics.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::project::ValidationError;
use crate::simulation::{AssessmentResult, SuccessProbabilities};
use crate::stats::{nan_mean, nan_median, nan_percentile, nan_std};

/// The five financial indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Indicator {
    Irr,
    Npv,
    Pbp,
    Dpp,
    Roi,
}

impl Indicator {
    pub const ALL: [Indicator; 5] = [
        Indicator::Irr,
        Indicator::Npv,
        Indicator::Pbp,
        Indicator::Dpp,
        Indicator::Roi,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Indicator::Irr => "IRR",
            Indicator::Npv => "NPV",
            Indicator::Pbp => "PBP",
            Indicator::Dpp => "DPP",
            Indicator::Roi => "ROI",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Indicator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IRR" => Ok(Indicator::Irr),
            "NPV" => Ok(Indicator::Npv),
            "PBP" => Ok(Indicator::Pbp),
            "DPP" => Ok(Indicator::Dpp),
            "ROI" => Ok(Indicator::Roi),
            _ => Err(ValidationError::UnknownIndicator(s.to_string())),
        }
    }
}

/// Point-forecast statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Median,
}

/// Comparison operator for custom threshold probabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

impl FromStr for Comparison {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Comparison::Greater),
            ">=" => Ok(Comparison::GreaterEqual),
            "<" => Ok(Comparison::Less),
            "<=" => Ok(Comparison::LessEqual),
            "==" => Ok(Comparison::Equal),
            "!=" => Ok(Comparison::NotEqual),
            _ => Err(ValidationError::UnknownComparison(s.to_string())),
        }
    }
}

impl Comparison {
    fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Greater => value > threshold,
            Comparison::GreaterEqual => value >= threshold,
            Comparison::Less => value < threshold,
            Comparison::LessEqual => value <= threshold,
            Comparison::Equal => approx_equal(value, threshold),
            Comparison::NotEqual => !approx_equal(value, threshold),
        }
    }
}

/// Tolerant equality for distribution values (relative 1e-5, absolute 1e-8)
fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

/// One labelled percentile of a distribution
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Percentile {
    /// Percentile level, 0..=100
    pub q: f64,
    pub value: f64,
}

/// Percentile summary of one indicator plus its moments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub percentiles: Vec<Percentile>,
    pub mean: f64,
    pub std_dev: f64,
}

/// Output shape for [`AssessmentResult::indicator_report`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportShape {
    Point,
    Summary,
    Full,
}

/// A formatted, serialization-ready view of one indicator
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum IndicatorReport {
    Point {
        indicator: Indicator,
        value: f64,
        statistic: Statistic,
        n_simulations: usize,
    },
    Summary {
        indicator: Indicator,
        percentiles: Vec<Percentile>,
        mean: f64,
        std_dev: f64,
        n_simulations: usize,
    },
    Full {
        indicator: Indicator,
        distribution: Vec<f64>,
        n_values: usize,
        n_simulations: usize,
    },
}

impl AssessmentResult {
    /// The raw per-trial array of one indicator
    pub fn indicator_values(&self, indicator: Indicator) -> &[f64] {
        match indicator {
            Indicator::Irr => &self.raw.irr,
            Indicator::Npv => &self.raw.npv,
            Indicator::Pbp => &self.raw.pbp,
            Indicator::Dpp => &self.raw.dpp,
            Indicator::Roi => &self.raw.roi,
        }
    }

    /// NaN-aware mean or median of one indicator
    pub fn point_forecast(&self, indicator: Indicator, statistic: Statistic) -> f64 {
        let values = self.indicator_values(indicator);
        match statistic {
            Statistic::Mean => nan_mean(values),
            Statistic::Median => nan_median(values),
        }
    }

    /// Percentile summary of one indicator. `percentiles` defaults to the
    /// fixed reporting set {5, 10, 25, 50, 75, 90, 95}.
    pub fn distribution_summary(
        &self,
        indicator: Indicator,
        percentiles: Option<&[f64]>,
    ) -> DistributionSummary {
        let values = self.indicator_values(indicator);
        let levels = percentiles.unwrap_or(&crate::simulation::SUMMARY_PERCENTILES);

        DistributionSummary {
            percentiles: levels
                .iter()
                .map(|&q| Percentile {
                    q,
                    value: nan_percentile(values, q),
                })
                .collect(),
            mean: nan_mean(values),
            std_dev: nan_std(values),
        }
    }

    /// The full distribution of one indicator, optionally keeping the NaN
    /// slots of undefined trials
    pub fn full_distribution(&self, indicator: Indicator, remove_nan: bool) -> Vec<f64> {
        let values = self.indicator_values(indicator);
        if remove_nan {
            values.iter().copied().filter(|v| !v.is_nan()).collect()
        } else {
            values.to_vec()
        }
    }

    /// The three pre-computed success probabilities
    pub fn success_probabilities(&self) -> SuccessProbabilities {
        self.summary.probabilities
    }

    /// Probability that an indicator compares as requested against a
    /// threshold, over the trials where it resolved. NaN when no trial
    /// resolved.
    pub fn indicator_probability(
        &self,
        indicator: Indicator,
        threshold: f64,
        comparison: Comparison,
    ) -> f64 {
        let valid: Vec<f64> = self
            .indicator_values(indicator)
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect();
        if valid.is_empty() {
            return f64::NAN;
        }
        let hits = valid
            .iter()
            .filter(|&&v| comparison.holds(v, threshold))
            .count();
        hits as f64 / valid.len() as f64
    }

    /// Percentile summaries for all five indicators at once
    pub fn all_indicators_summary(&self) -> Vec<(Indicator, DistributionSummary)> {
        Indicator::ALL
            .iter()
            .map(|&ind| (ind, self.distribution_summary(ind, None)))
            .collect()
    }

    /// Format one indicator in the requested shape
    pub fn indicator_report(&self, indicator: Indicator, shape: ReportShape) -> IndicatorReport {
        let n_simulations = self.metadata.n_sims;
        match shape {
            ReportShape::Point => IndicatorReport::Point {
                indicator,
                value: self.point_forecast(indicator, Statistic::Median),
                statistic: Statistic::Median,
                n_simulations,
            },
            ReportShape::Summary => {
                let summary = self.distribution_summary(indicator, None);
                IndicatorReport::Summary {
                    indicator,
                    percentiles: summary.percentiles,
                    mean: summary.mean,
                    std_dev: summary.std_dev,
                    n_simulations,
                }
            }
            ReportShape::Full => {
                let distribution = self.full_distribution(indicator, true);
                IndicatorReport::Full {
                    indicator,
                    n_values: distribution.len(),
                    distribution,
                    n_simulations,
                }
            }
        }
    }
}
