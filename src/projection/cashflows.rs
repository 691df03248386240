//! Net cash-flow projection for a retrofit project
//!
//! Both variants share one contract: given the project economics and
//! year-indexed electricity-price and inflation paths of length >= horizon,
//! produce a sequence of horizon + 1 signed currency values. Index 0 is the
//! equity outflow at t = 0; indices 1..=horizon hold each year's net
//! operating result.
//!
//! Failure policy: malformed inputs degrade to a single-element `[NaN]`
//! sequence. The indicator calculators propagate that sentinel, so one
//! pathological trial never aborts a simulation batch.

/// Yearly net cash flows for an all-equity project.
///
/// `flows[0] = -capex`. For year k, maintenance is scaled by the cumulative
/// inflation multiplier over years 0..=k and netted against
/// `annual_energy_savings * electricity_prices[k]`.
pub fn equity_cash_flows(
    capex: f64,
    annual_energy_savings: f64,
    annual_maintenance_cost: f64,
    horizon: usize,
    electricity_prices: &[f64],
    inflation_rates: &[f64],
) -> Vec<f64> {
    if electricity_prices.len() < horizon || inflation_rates.len() < horizon {
        return vec![f64::NAN];
    }

    let mut flows = Vec::with_capacity(horizon + 1);
    flows.push(-capex);

    let mut cumulative_inflation = 1.0;
    for year in 0..horizon {
        cumulative_inflation *= 1.0 + inflation_rates[year] / 100.0;
        let operating = annual_energy_savings * electricity_prices[year]
            - annual_maintenance_cost * cumulative_inflation;
        flows.push(operating);
    }

    flows
}

/// Yearly net cash flows including debt service.
///
/// `flows[0] = -(capex - loan_amount)`. The loan amortizes with constant
/// principal payments of `loan_amount / loan_term`; each year's interest is
/// charged on the principal still outstanding at the start of that year.
pub fn financed_cash_flows(
    capex: f64,
    annual_energy_savings: f64,
    annual_maintenance_cost: f64,
    horizon: usize,
    electricity_prices: &[f64],
    inflation_rates: &[f64],
    loan_amount: f64,
    loan_rates: &[f64],
    loan_term: usize,
) -> Vec<f64> {
    if electricity_prices.len() < horizon
        || inflation_rates.len() < horizon
        || loan_rates.len() < horizon
        || loan_rates.is_empty()
    {
        return vec![f64::NAN];
    }

    let mut flows = Vec::with_capacity(horizon + 1);
    flows.push(-(capex - loan_amount));

    let mut outstanding = loan_amount;
    let principal_payment = if loan_term > 0 {
        loan_amount / loan_term as f64
    } else {
        0.0
    };

    let mut cumulative_inflation = 1.0;
    for year in 0..horizon {
        cumulative_inflation *= 1.0 + inflation_rates[year] / 100.0;
        let operating = annual_energy_savings * electricity_prices[year]
            - annual_maintenance_cost * cumulative_inflation;

        let mut debt_service = 0.0;
        if year <= loan_term && loan_amount > 0.0 {
            // Interest for year k is charged at rates[k - 1]; year 0 wraps
            // to the final element of the rate path. Downstream results
            // depend on this indexing, so it must not be "corrected".
            let rate_index = if year == 0 { loan_rates.len() - 1 } else { year - 1 };
            let interest = outstanding * (loan_rates[rate_index] / 100.0);
            debt_service = principal_payment + interest;
            outstanding -= principal_payment;
        }

        flows.push(operating - debt_service);
    }

    flows
}
