//! Arithmetic building blocks shared by the evaluator and rate scenarios.

use super::domain::BorrowerProfile;

pub(crate) const MONTHS_PER_YEAR: u32 = 12;

/// Amount to amortize. A positive requested amount wins; otherwise the gap
/// between price and savings, which may be negative.
pub(crate) fn financing_amount(profile: &BorrowerProfile) -> f64 {
    match profile.requested_financing.map(finite_or_zero) {
        Some(requested) if requested > 0.0 => requested,
        _ => finite_or_zero(profile.property_price) - finite_or_zero(profile.down_payment_savings),
    }
}

/// Monthly annuity payment, with a linear fallback for zero-rate loans.
pub(crate) fn monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    let principal = finite_or_zero(principal);
    let monthly_rate = finite_or_zero(annual_rate_percent) / 100.0 / MONTHS_PER_YEAR as f64;
    let months = term_years.saturating_mul(MONTHS_PER_YEAR);

    if principal <= 0.0 || months == 0 {
        return 0.0;
    }

    // 1 - (1 + r)^-n, computed without cancellation for tiny rates.
    let denominator = -(-(months as f64) * monthly_rate.ln_1p()).exp_m1();
    if monthly_rate > 0.0 && denominator.is_finite() && denominator > 0.0 {
        principal * monthly_rate / denominator
    } else {
        principal / months as f64
    }
}

/// `numerator / denominator`, or zero when the denominator is not positive.
pub(crate) fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub(crate) fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}
