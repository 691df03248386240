//! Macro-economic forecast scenarios
//!
//! Each macro-variable (inflation, electricity price, loan interest rate,
//! discount rate) carries three named yearly paths. The paths are fixed
//! domain constants, not user input; `ScenarioTables::builtin()` holds the
//! curated set used for every assessment.

mod tables;

pub use tables::ScenarioTables;

use serde::{Deserialize, Serialize};

/// Three named yearly forecast paths for one macro-variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPaths {
    /// Favorable path (low inflation, low rates, cheap grid power)
    pub optimistic: Vec<f64>,
    /// Central path
    pub moderate: Vec<f64>,
    /// Unfavorable path
    pub pessimistic: Vec<f64>,
}

impl ScenarioPaths {
    pub fn new(optimistic: Vec<f64>, moderate: Vec<f64>, pessimistic: Vec<f64>) -> Self {
        Self {
            optimistic,
            moderate,
            pessimistic,
        }
    }

    /// Shortest of the three paths
    pub fn min_len(&self) -> usize {
        self.optimistic
            .len()
            .min(self.moderate.len())
            .min(self.pessimistic.len())
    }
}

/// Fit a path to `length` years: shorter paths repeat their final value,
/// longer paths are cut at the horizon.
pub fn pad_to_length(path: &[f64], length: usize) -> Vec<f64> {
    match path.last() {
        None => Vec::new(),
        Some(&last) => {
            let mut padded: Vec<f64> = path.iter().copied().take(length).collect();
            padded.resize(length, last);
            padded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_extends_with_last_value() {
        let padded = pad_to_length(&[1.0, 2.0, 3.0], 5);
        assert_eq!(padded, vec![1.0, 2.0, 3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_pad_truncates_longer_paths() {
        let padded = pad_to_length(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(padded, vec![1.0, 2.0]);
    }

    #[test]
    fn test_pad_exact_length_is_identity() {
        let path = vec![0.5, 0.6];
        assert_eq!(pad_to_length(&path, 2), path);
    }

    #[test]
    fn test_pad_empty_path_stays_empty() {
        assert!(pad_to_length(&[], 4).is_empty());
    }

    #[test]
    fn test_builtin_tables_cover_full_horizon() {
        let tables = ScenarioTables::builtin();
        // Inflation and loan-rate tables span the 30-year cap outright;
        // shorter price paths rely on padding.
        assert_eq!(tables.inflation.min_len(), 30);
        assert_eq!(tables.loan_rate.min_len(), 30);
        assert!(tables.electricity_price.min_len() >= 18);
        assert_eq!(tables.discount_rate.min_len(), 1);
    }
}
