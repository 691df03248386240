//! Built-in forecast tables
//!
//! Hand-curated 30-year scenario paths for the four macro-variables.
//! Inflation anchors on the ECB 2% target; loan rates reflect residential
//! retrofit financing (no negative rates); discount rates span homeowner
//! opportunity cost of capital from conservative (3%) to equity-market
//! equivalent (7%).

use serde::{Deserialize, Serialize};

use super::ScenarioPaths;

/// The full scenario set for one assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioTables {
    /// Consumer-price inflation, % year-over-year
    pub inflation: ScenarioPaths,
    /// Grid electricity price, currency per kWh
    pub electricity_price: ScenarioPaths,
    /// Loan interest rate, % per year on outstanding principal
    pub loan_rate: ScenarioPaths,
    /// Discount rate as a fraction; one scalar per scenario, constant
    /// across the horizon
    pub discount_rate: ScenarioPaths,
}

impl ScenarioTables {
    /// The curated default forecast set
    pub fn builtin() -> Self {
        Self {
            inflation: ScenarioPaths::new(
                vec![
                    2.8, 2.4, 2.2, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, // years 1-10
                    2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, // years 11-20
                    2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, // years 21-30
                ],
                vec![
                    3.0, 2.7, 2.5, 2.4, 2.3, 2.3, 2.4, 2.4, 2.5, 2.5, // years 1-10
                    2.4, 2.4, 2.3, 2.3, 2.3, 2.3, 2.3, 2.3, 2.3, 2.3, // years 11-20
                    2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, 2.2, // years 21-30
                ],
                vec![
                    3.5, 3.3, 3.2, 3.0, 2.9, 2.8, 2.9, 3.0, 3.1, 3.2, // years 1-10
                    3.2, 3.2, 3.1, 3.1, 3.0, 3.0, 3.0, 3.0, 2.9, 2.9, // years 11-20
                    2.8, 2.8, 2.7, 2.7, 2.7, 2.6, 2.6, 2.6, 2.5, 2.5, // years 21-30
                ],
            ),
            electricity_price: ScenarioPaths::new(
                vec![
                    0.221, 0.229, 0.237, 0.245, 0.253, 0.261, 0.269, 0.277, 0.285,
                    0.293, 0.301, 0.310, 0.318, 0.326, 0.334, 0.342, 0.350, 0.358,
                ],
                vec![
                    0.246, 0.254, 0.262, 0.270, 0.278, 0.286, 0.294, 0.302, 0.310,
                    0.318, 0.326, 0.335, 0.343, 0.351, 0.359, 0.367, 0.375, 0.383,
                ],
                vec![
                    0.271, 0.279, 0.287, 0.295, 0.303, 0.311, 0.319, 0.327, 0.335,
                    0.343, 0.351, 0.360, 0.368, 0.376, 0.384, 0.392, 0.400, 0.408,
                ],
            ),
            loan_rate: ScenarioPaths::new(
                vec![
                    2.5, 2.8, 3.0, 3.0, 2.9, 2.8, 2.8, 2.7, 2.7, 2.7, // years 1-10
                    2.6, 2.6, 2.6, 2.5, 2.5, 2.5, 2.5, 2.5, 2.5, 2.5, // years 11-20
                    2.5, 2.5, 2.5, 2.5, 2.5, 2.5, 2.5, 2.5, 2.5, 2.5, // years 21-30
                ],
                vec![
                    3.5, 3.8, 4.0, 4.0, 3.9, 3.8, 3.8, 3.7, 3.7, 3.7, // years 1-10
                    3.6, 3.6, 3.6, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, // years 11-20
                    3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, 3.5, // years 21-30
                ],
                vec![
                    5.0, 5.3, 5.5, 5.5, 5.4, 5.3, 5.3, 5.2, 5.2, 5.2, // years 1-10
                    5.1, 5.1, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, // years 11-20
                    5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, // years 21-30
                ],
            ),
            discount_rate: ScenarioPaths::new(
                vec![0.03], // conservative investor, low alternatives
                vec![0.05], // typical residential opportunity cost
                vec![0.07], // equity-market equivalent
            ),
        }
    }
}
