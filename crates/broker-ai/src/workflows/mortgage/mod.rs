//! Mortgage viability evaluation for broker leads.
//!
//! The evaluator is a pure function of a [`BorrowerProfile`] and a
//! [`ViabilityConfig`]: it performs no I/O and keeps no state between calls,
//! so it can be shared freely across request handlers.

mod config;
mod domain;
pub mod intake;
pub mod jurisdiction;
mod policy;
mod rules;
pub mod scenarios;

#[cfg(test)]
mod tests;

pub use config::ViabilityConfig;
pub use domain::{
    ApplicantMode, BorrowerProfile, OperationStatus, OperationType, ProfileError, ViabilityResult,
};
pub use intake::LeadFinancialsForm;
pub use jurisdiction::{ClosingCosts, Jurisdiction, UnknownJurisdiction};
pub use scenarios::{RateScenario, ScenarioKind, ScenarioRequest};

use policy::{decide_verdict, ViabilitySignals};
use rules::{finite_or_zero, ratio_or_zero, round_to_i64};

/// Stateless evaluator applying a viability rubric to borrower profiles.
#[derive(Debug, Clone, Default)]
pub struct ViabilityEvaluator {
    config: ViabilityConfig,
}

impl ViabilityEvaluator {
    pub fn new(config: ViabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ViabilityConfig {
        &self.config
    }

    pub fn evaluate(&self, profile: &BorrowerProfile) -> ViabilityResult {
        evaluate(profile, &self.config)
    }
}

/// Compute payment, DTI, both LTV variants and the verdict for `profile`.
///
/// Non-finite inputs are treated as zero and zero denominators yield zero
/// ratios, so this never fails.
pub fn evaluate(profile: &BorrowerProfile, config: &ViabilityConfig) -> ViabilityResult {
    let price = finite_or_zero(profile.property_price);
    let savings = finite_or_zero(profile.down_payment_savings);
    let income = finite_or_zero(profile.monthly_net_income);
    let other_debts = finite_or_zero(profile.other_monthly_debt_payments);

    let financing_amount = rules::financing_amount(profile);
    let monthly_payment = rules::monthly_payment(
        financing_amount,
        profile.annual_interest_rate_percent,
        profile.term_years,
    );

    let debt_to_income = ratio_or_zero(monthly_payment + other_debts, income).max(0.0);
    let ltv_requested = (ratio_or_zero(financing_amount, price) * 100.0).max(0.0);

    let operation_cost = price * (1.0 + finite_or_zero(config.taxes_and_fees_rate));
    let financing_needed_for_operation = (operation_cost - savings).max(0.0);
    let ltv_operation = ratio_or_zero(financing_needed_for_operation, price) * 100.0;

    let signals = ViabilitySignals {
        debt_to_income,
        ltv_requested,
        ltv_operation,
        age: profile.age,
    };
    let verdict = decide_verdict(config, &signals);

    ViabilityResult {
        operation_type: profile.operation_type,
        applicant_mode: profile.applicant_mode,
        financing_amount,
        financing_needed_for_operation,
        monthly_payment: round_to_i64(monthly_payment),
        monthly_payment_exact: monthly_payment,
        debt_to_income_ratio: debt_to_income,
        debt_to_income_percent: round_to_i64(debt_to_income * 100.0),
        loan_to_value_requested: ltv_requested,
        loan_to_value_requested_percent: round_to_i64(ltv_requested),
        loan_to_value_operation: ltv_operation,
        loan_to_value_operation_percent: round_to_i64(ltv_operation),
        ltv_threshold: verdict.ltv_threshold,
        requires_manual_review: verdict.requires_manual_review,
        is_viable: verdict.is_viable,
    }
}
