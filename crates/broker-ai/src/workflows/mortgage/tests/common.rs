use crate::workflows::mortgage::{
    ApplicantMode, BorrowerProfile, OperationType, ViabilityConfig, ViabilityEvaluator,
};

pub(super) fn profile(
    price: f64,
    savings: f64,
    income: f64,
    other_debts: f64,
    rate: f64,
    term_years: u32,
) -> BorrowerProfile {
    BorrowerProfile {
        operation_type: OperationType::PrimaryResidence,
        applicant_mode: ApplicantMode::Single,
        age: Some(40),
        monthly_net_income: income,
        property_price: price,
        down_payment_savings: savings,
        requested_financing: None,
        other_monthly_debt_payments: other_debts,
        annual_interest_rate_percent: rate,
        term_years,
    }
}

/// Scenario A: comfortably viable first home.
pub(super) fn viable_profile() -> BorrowerProfile {
    profile(200_000.0, 60_000.0, 3_000.0, 100.0, 2.6, 30)
}

/// Scenario B: small down payment, LTV-Sol of 95%.
pub(super) fn high_ltv_profile() -> BorrowerProfile {
    profile(200_000.0, 10_000.0, 5_000.0, 0.0, 2.6, 30)
}

pub(super) fn evaluator() -> ViabilityEvaluator {
    ViabilityEvaluator::new(ViabilityConfig::default())
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} within {tolerance}, got {actual}"
    );
}
