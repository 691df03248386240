//! Project parameters and input validation
//!
//! All contract violations are rejected here, synchronously, before any
//! simulation work begins. Per-trial numeric failures are a separate
//! concern and never surface as errors (see `indicators`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard cap on the evaluation horizon in years
pub const MAX_LIFETIME_YEARS: u32 = 30;

/// Hard cap on the number of Monte Carlo trials per assessment
pub const MAX_SIMULATIONS: usize = 1_000_000;

/// Immutable description of one retrofit investment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectParams {
    /// Up-front capital expenditure (today's currency)
    pub capex: f64,

    /// Expected energy saved per year (kWh)
    pub annual_energy_savings: f64,

    /// Yearly O&M cost in today's currency, inflated over the horizon
    pub annual_maintenance_cost: f64,

    /// Evaluation horizon in years (1..=30)
    pub project_lifetime: u32,

    /// Principal borrowed at t = 0 (0 for all-equity financing)
    pub loan_amount: f64,

    /// Loan repayment term in years (0 when there is no loan)
    pub loan_term: u32,

    /// Fixed annual loan interest rate in percent. When set, overrides
    /// market-sampled rates for every trial.
    pub loan_rate: Option<f64>,
}

impl ProjectParams {
    /// All-equity project: no loan, no debt service
    pub fn equity(
        capex: f64,
        annual_energy_savings: f64,
        annual_maintenance_cost: f64,
        project_lifetime: u32,
    ) -> Self {
        Self {
            capex,
            annual_energy_savings,
            annual_maintenance_cost,
            project_lifetime,
            loan_amount: 0.0,
            loan_term: 0,
            loan_rate: None,
        }
    }

    /// Debt-financed project with straight-line principal amortization
    pub fn financed(
        capex: f64,
        annual_energy_savings: f64,
        annual_maintenance_cost: f64,
        project_lifetime: u32,
        loan_amount: f64,
        loan_term: u32,
    ) -> Self {
        Self {
            capex,
            annual_energy_savings,
            annual_maintenance_cost,
            project_lifetime,
            loan_amount,
            loan_term,
            loan_rate: None,
        }
    }

    /// Effective simulation horizon, capped at [`MAX_LIFETIME_YEARS`]
    pub fn horizon(&self) -> usize {
        self.project_lifetime.min(MAX_LIFETIME_YEARS) as usize
    }

    /// Whether the cash-flow projection must include debt service
    pub fn is_financed(&self) -> bool {
        self.loan_amount > 0.0 && self.loan_term > 0
    }

    /// Check every field against the input contract
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.capex < 0.0 {
            return Err(ValidationError::NegativeCapex(self.capex));
        }
        if self.annual_maintenance_cost < 0.0 {
            return Err(ValidationError::NegativeMaintenance(
                self.annual_maintenance_cost,
            ));
        }
        if self.annual_energy_savings < 0.0 {
            return Err(ValidationError::NegativeSavings(self.annual_energy_savings));
        }
        if self.project_lifetime == 0 {
            return Err(ValidationError::LifetimeTooShort(self.project_lifetime));
        }
        if self.project_lifetime > MAX_LIFETIME_YEARS {
            return Err(ValidationError::LifetimeTooLong(self.project_lifetime));
        }
        if self.loan_amount < 0.0 {
            return Err(ValidationError::NegativeLoanAmount(self.loan_amount));
        }
        if self.loan_amount > self.capex {
            return Err(ValidationError::LoanExceedsCapex {
                loan_amount: self.loan_amount,
                capex: self.capex,
            });
        }
        if self.loan_amount > 0.0 && self.loan_term == 0 {
            return Err(ValidationError::MissingLoanTerm {
                loan_amount: self.loan_amount,
            });
        }
        if self.loan_term > self.project_lifetime {
            return Err(ValidationError::LoanTermExceedsLifetime {
                loan_term: self.loan_term,
                project_lifetime: self.project_lifetime,
            });
        }
        Ok(())
    }
}

/// Caller-input contract violations, surfaced before simulation starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("capex must be non-negative, got {0}")]
    NegativeCapex(f64),

    #[error("annual_maintenance_cost must be non-negative, got {0}")]
    NegativeMaintenance(f64),

    #[error("annual_energy_savings must be non-negative, got {0}")]
    NegativeSavings(f64),

    #[error("project_lifetime must be at least 1 year, got {0}")]
    LifetimeTooShort(u32),

    #[error("project_lifetime cannot exceed {MAX_LIFETIME_YEARS} years, got {0}")]
    LifetimeTooLong(u32),

    #[error("loan_amount must be non-negative, got {0}")]
    NegativeLoanAmount(f64),

    #[error("loan_amount ({loan_amount}) cannot exceed capex ({capex})")]
    LoanExceedsCapex { loan_amount: f64, capex: f64 },

    #[error("loan_term must be positive when loan_amount > 0 (loan_amount = {loan_amount})")]
    MissingLoanTerm { loan_amount: f64 },

    #[error("loan_term ({loan_term}) cannot exceed project_lifetime ({project_lifetime})")]
    LoanTermExceedsLifetime { loan_term: u32, project_lifetime: u32 },

    #[error("n_sims must be between 1 and {MAX_SIMULATIONS}, got {0}")]
    SimulationCountOutOfRange(usize),

    #[error("unknown indicator name: {0}")]
    UnknownIndicator(String),

    #[error("unknown comparison operator: {0}")]
    UnknownComparison(String),
}
