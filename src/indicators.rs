//! Investment-appraisal indicators over a cash-flow sequence
//!
//! Five pure functions: IRR, NPV, PBP, DPP, ROI. The fallible ones return
//! `Result<f64, Unresolvable>` so the reason an indicator could not be
//! resolved stays diagnosable; the Monte Carlo loop collapses every
//! unresolved outcome to the NaN sentinel via [`value_or_nan`] and keeps
//! going.

use thiserror::Error;

/// Why an indicator has no value for a given cash-flow sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Unresolvable {
    /// All flows share one sign, so no discount rate can zero the NPV
    #[error("cash flows have no sign change")]
    NoSignChange,

    /// Neither Newton-Raphson nor bisection found a root
    #[error("root finder did not converge")]
    NoConvergence,

    /// Cumulative inflows never recover the initial investment
    #[error("project never breaks even")]
    NoPayback,

    /// ROI is undefined for a zero initial investment
    #[error("initial investment is zero")]
    ZeroInvestment,

    /// Empty or truncated cash-flow sequence
    #[error("degenerate cash-flow sequence")]
    Degenerate,
}

/// Collapse an unresolved indicator to the NaN sentinel stored per trial
pub fn value_or_nan(result: Result<f64, Unresolvable>) -> f64 {
    result.unwrap_or(f64::NAN)
}

const IRR_TOLERANCE: f64 = 1e-10;
const IRR_MAX_ITERATIONS: usize = 1000;
const IRR_RATE_MIN: f64 = -0.99;
const IRR_RATE_MAX: f64 = 10.0;

/// Internal Rate of Return: the discount rate that zeroes the NPV of
/// `flows`, found by Newton-Raphson with a bisection fallback.
pub fn irr(flows: &[f64]) -> Result<f64, Unresolvable> {
    if flows.is_empty() {
        return Err(Unresolvable::Degenerate);
    }
    if flows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Ok(0.0);
    }

    // A root requires at least one sign change
    let has_positive = flows.iter().any(|&cf| cf > 1e-10);
    let has_negative = flows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(Unresolvable::NoSignChange);
    }

    let mut rate = 0.05;
    for _ in 0..IRR_MAX_ITERATIONS {
        let (value, derivative) = npv_and_derivative(flows, rate);

        if derivative.abs() < 1e-20 {
            return irr_bisection(flows);
        }

        let next = (rate - value / derivative).clamp(IRR_RATE_MIN, IRR_RATE_MAX);
        if (next - rate).abs() < IRR_TOLERANCE {
            return Ok(next);
        }
        rate = next;
    }

    irr_bisection(flows)
}

/// NPV and its derivative with respect to the rate, in one pass
fn npv_and_derivative(flows: &[f64], rate: f64) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    for (t, &cf) in flows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        value += cf / discount;
        if t > 0 {
            derivative -= t as f64 * cf / (1.0 + rate).powi(t as i32 + 1);
        }
    }

    (value, derivative)
}

/// Bisection fallback over the bracket [-99%, 1000%]
fn irr_bisection(flows: &[f64]) -> Result<f64, Unresolvable> {
    let mut low = IRR_RATE_MIN;
    let mut high = IRR_RATE_MAX;

    let npv_low = npv(low, flows);
    let npv_high = npv(high, flows);
    if npv_low * npv_high > 0.0 {
        return Err(Unresolvable::NoConvergence);
    }

    for _ in 0..IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(mid, flows);

        if npv_mid.abs() < IRR_TOLERANCE || (high - low) / 2.0 < IRR_TOLERANCE {
            return Ok(mid);
        }

        if npv_mid * npv(low, flows) < 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Err(Unresolvable::NoConvergence)
}

/// Net Present Value of `flows` at a constant discount rate.
///
/// `rate` must be > -1; the caller guards against values at or below that
/// pole. NaN flows propagate into the result.
pub fn npv(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// Simple (undiscounted) payback period in fractional years.
///
/// Finds the first year whose cumulative inflow reaches the initial
/// investment and interpolates linearly inside it: with shortfall B at the
/// start of crossing year A and year flow F, PBP = A + B / F. A crossing
/// year with zero flow resolves to exactly A. `NoPayback` when the total
/// of `flows[1..]` never covers the investment.
pub fn pbp(flows: &[f64]) -> Result<f64, Unresolvable> {
    let (&initial, inflows) = flows.split_first().ok_or(Unresolvable::Degenerate)?;
    let investment = -initial;

    let total: f64 = inflows.iter().sum();
    if !(total >= investment) {
        // Also catches NaN totals from degraded projections
        return Err(Unresolvable::NoPayback);
    }

    let mut cumulative = 0.0;
    for (year, &flow) in inflows.iter().enumerate() {
        let shortfall = investment - cumulative;
        cumulative += flow;
        if cumulative >= investment {
            if flow == 0.0 {
                return Ok(year as f64);
            }
            return Ok(year as f64 + shortfall / flow);
        }
    }

    Err(Unresolvable::NoPayback)
}

/// Discounted payback period: the PBP algorithm applied after discounting
/// `flows[i]` by `(1 + discount_rate)^-i` for i >= 1. `flows[0]` stays
/// undiscounted.
pub fn dpp(discount_rate: f64, horizon: usize, flows: &[f64]) -> Result<f64, Unresolvable> {
    if flows.len() < horizon + 1 {
        return Err(Unresolvable::Degenerate);
    }

    let mut discounted = Vec::with_capacity(horizon + 1);
    discounted.push(flows[0]);
    for i in 1..=horizon {
        discounted.push(flows[i] * (1.0 + discount_rate).powi(-(i as i32)));
    }

    pbp(&discounted)
}

/// Return on Investment: net profit over the initial investment.
pub fn roi(flows: &[f64]) -> Result<f64, Unresolvable> {
    let (&initial, inflows) = flows.split_first().ok_or(Unresolvable::Degenerate)?;
    let investment = -initial;
    if investment == 0.0 {
        return Err(Unresolvable::ZeroInvestment);
    }

    let net_profit: f64 = inflows.iter().sum();
    Ok((net_profit - investment) / investment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_irr() {
        // 1000 out, 1100 back after one year: exactly 10%
        let flows = [-1000.0, 1100.0];
        let rate = irr(&flows).unwrap();
        assert_relative_eq!(rate, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_irr_npv_round_trip() {
        let flows = [-60_000.0, 5_000.0, 6_000.0, 7_000.0, 8_000.0, 9_000.0,
                     10_000.0, 11_000.0, 12_000.0, 13_000.0, 14_000.0];
        let rate = irr(&flows).unwrap();
        assert!(npv(rate, &flows).abs() < 1e-4);
    }

    #[test]
    fn test_irr_requires_sign_change() {
        assert_eq!(irr(&[100.0, 200.0, 300.0]), Err(Unresolvable::NoSignChange));
        assert_eq!(irr(&[-100.0, -200.0]), Err(Unresolvable::NoSignChange));
    }

    #[test]
    fn test_irr_of_all_zero_flows_is_zero() {
        assert_eq!(irr(&[0.0, 0.0, 0.0]), Ok(0.0));
    }

    #[test]
    fn test_irr_propagates_projection_sentinel() {
        let sentinel = [f64::NAN];
        assert!(irr(&sentinel).is_err());
    }

    #[test]
    fn test_npv_discounts_each_year() {
        let flows = [-100.0, 60.0, 60.0];
        let expected = -100.0 + 60.0 / 1.1 + 60.0 / 1.1_f64.powi(2);
        assert_relative_eq!(npv(0.1, &flows), expected, epsilon = 1e-10);
    }

    #[test]
    fn test_pbp_interpolates_within_crossing_year() {
        // Cumulative: 40, 80, 120; crossing in year 2 with shortfall 20
        let flows = [-100.0, 40.0, 40.0, 40.0];
        assert_relative_eq!(pbp(&flows).unwrap(), 2.5, epsilon = 1e-10);
    }

    #[test]
    fn test_pbp_first_year_crossing() {
        let flows = [-100.0, 400.0];
        assert_relative_eq!(pbp(&flows).unwrap(), 0.25, epsilon = 1e-10);
    }

    #[test]
    fn test_pbp_never_breaking_even() {
        let flows = [-100.0, 10.0, 10.0];
        assert_eq!(pbp(&flows), Err(Unresolvable::NoPayback));
    }

    #[test]
    fn test_pbp_exact_recovery_lands_on_year_boundary() {
        let flows = [-80.0, 80.0, 0.0];
        assert_relative_eq!(pbp(&flows).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pbp_zero_flow_crossing_year_returns_whole_year() {
        // Nothing to recover, and the crossing year contributes nothing:
        // the interpolation denominator is zero, so PBP is the year itself
        let flows = [0.0, 0.0, 5.0];
        assert_relative_eq!(pbp(&flows).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pbp_finite_within_horizon_for_recoverable_projects() {
        let flows = [-100.0, 30.0, 30.0, 30.0, 30.0];
        let value = pbp(&flows).unwrap();
        assert!(value >= 0.0);
        assert!(value <= (flows.len() - 1) as f64);
    }

    #[test]
    fn test_dpp_discounts_before_payback() {
        let flows = [-100.0, 60.0, 60.0, 60.0];
        let simple = pbp(&flows).unwrap();
        let discounted = dpp(0.08, 3, &flows).unwrap();
        // Discounting shrinks inflows, so recovery takes longer
        assert!(discounted > simple);
    }

    #[test]
    fn test_dpp_zero_rate_equals_pbp() {
        let flows = [-100.0, 40.0, 40.0, 40.0];
        assert_relative_eq!(
            dpp(0.0, 3, &flows).unwrap(),
            pbp(&flows).unwrap(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_dpp_rejects_truncated_flows() {
        assert_eq!(dpp(0.05, 5, &[f64::NAN]), Err(Unresolvable::Degenerate));
    }

    #[test]
    fn test_roi_simple() {
        let flows = [-100.0, 60.0, 60.0];
        assert_relative_eq!(roi(&flows).unwrap(), 0.2, epsilon = 1e-10);
    }

    #[test]
    fn test_roi_zero_investment() {
        let flows = [0.0, 100.0, 100.0];
        assert_eq!(roi(&flows), Err(Unresolvable::ZeroInvestment));
    }

    #[test]
    fn test_value_or_nan_collapses_reasons() {
        assert!(value_or_nan(Err(Unresolvable::NoPayback)).is_nan());
        assert_eq!(value_or_nan(Ok(1.5)), 1.5);
    }
}
