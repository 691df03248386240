//! NaN-aware reduction helpers
//!
//! Undefined trials are stored as NaN and must be excluded from summary
//! statistics without aborting the reduction. Percentiles interpolate
//! linearly at rank q/100 * (n - 1) over the sorted, NaN-filtered values.

/// q-th percentile (0..=100) of `values`, ignoring NaN entries. NaN when no
/// valid values remain.
pub fn nan_percentile(values: &[f64], q: f64) -> f64 {
    let mut valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    valid.sort_unstable_by(f64::total_cmp);
    percentile_of_sorted(&valid, q)
}

/// Percentile of an already sorted, NaN-free slice
pub fn percentile_of_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 100.0);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}

/// Mean of the non-NaN entries; NaN when none remain
pub fn nan_mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population standard deviation of the non-NaN entries
pub fn nan_std(values: &[f64]) -> f64 {
    let mean = nan_mean(values);
    if mean.is_nan() {
        return f64::NAN;
    }
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for &v in values {
        if !v.is_nan() {
            sum_sq += (v - mean) * (v - mean);
            count += 1;
        }
    }
    (sum_sq / count as f64).sqrt()
}

/// Median of the non-NaN entries
pub fn nan_median(values: &[f64]) -> f64 {
    nan_percentile(values, 50.0)
}
