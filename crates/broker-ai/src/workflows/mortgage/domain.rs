use serde::{Deserialize, Serialize};

/// Purpose of the purchase, carried through to reports and message templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[default]
    PrimaryResidence,
    SecondResidence,
    Investment,
}

impl OperationType {
    pub const fn label(self) -> &'static str {
        match self {
            OperationType::PrimaryResidence => "primary_residence",
            OperationType::SecondResidence => "second_residence",
            OperationType::Investment => "investment",
        }
    }
}

/// Whether the mortgage is requested by one applicant or jointly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantMode {
    #[default]
    Single,
    Couple,
}

impl ApplicantMode {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantMode::Single => "single",
            ApplicantMode::Couple => "couple",
        }
    }
}

/// Borrower and property snapshot assembled from a lead before each evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    #[serde(default)]
    pub operation_type: OperationType,
    #[serde(default)]
    pub applicant_mode: ApplicantMode,
    #[serde(default)]
    pub age: Option<u32>,
    pub monthly_net_income: f64,
    pub property_price: f64,
    pub down_payment_savings: f64,
    #[serde(default)]
    pub requested_financing: Option<f64>,
    #[serde(default)]
    pub other_monthly_debt_payments: f64,
    pub annual_interest_rate_percent: f64,
    pub term_years: u32,
}

impl BorrowerProfile {
    /// Boundary check for callers that prefer rejecting bad input over the
    /// evaluator's silent zero fallback.
    pub fn validate(&self) -> Result<(), ProfileError> {
        let fields = [
            ("monthly_net_income", self.monthly_net_income),
            ("property_price", self.property_price),
            ("down_payment_savings", self.down_payment_savings),
            (
                "other_monthly_debt_payments",
                self.other_monthly_debt_payments,
            ),
            (
                "annual_interest_rate_percent",
                self.annual_interest_rate_percent,
            ),
        ];

        for (field, value) in fields {
            check_amount(field, value)?;
        }

        if let Some(requested) = self.requested_financing {
            check_amount("requested_financing", requested)?;
        }

        Ok(())
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ProfileError> {
    if !value.is_finite() {
        return Err(ProfileError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ProfileError::Negative { field, value });
    }
    Ok(())
}

/// Rejection raised by [`BorrowerProfile::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (found {value})")]
    Negative { field: &'static str, value: f64 },
}

/// Verdict label persisted on the lead and shown in study summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationStatus {
    #[serde(rename = "VIABLE")]
    Viable,
    #[serde(rename = "NO_VIABLE")]
    NotViable,
}

impl OperationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OperationStatus::Viable => "VIABLE",
            OperationStatus::NotViable => "NO_VIABLE",
        }
    }
}

/// Numbers and verdict produced by a single evaluation.
///
/// Rounded fields are for display; thresholds were compared against the
/// unrounded values that sit next to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViabilityResult {
    pub operation_type: OperationType,
    pub applicant_mode: ApplicantMode,
    pub financing_amount: f64,
    pub financing_needed_for_operation: f64,
    pub monthly_payment: i64,
    pub monthly_payment_exact: f64,
    pub debt_to_income_ratio: f64,
    pub debt_to_income_percent: i64,
    pub loan_to_value_requested: f64,
    pub loan_to_value_requested_percent: i64,
    pub loan_to_value_operation: f64,
    pub loan_to_value_operation_percent: i64,
    pub ltv_threshold: f64,
    pub requires_manual_review: bool,
    pub is_viable: bool,
}

impl ViabilityResult {
    pub fn status(&self) -> OperationStatus {
        if self.is_viable {
            OperationStatus::Viable
        } else {
            OperationStatus::NotViable
        }
    }

    /// Savings exceed the price and no financing was requested.
    pub fn has_negative_financing(&self) -> bool {
        self.financing_amount < 0.0
    }

    /// One-line summary used for the lead history log.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "Study: {} | Payment: {} | DTI: {}% | LTV: {}%",
            self.status().label(),
            self.monthly_payment,
            self.debt_to_income_percent,
            self.loan_to_value_requested_percent
        );
        if self.requires_manual_review {
            line.push_str(&format!(
                " | LTV-Op {}% above {:.0}%, manual review",
                self.loan_to_value_operation_percent, self.ltv_threshold
            ));
        }
        line
    }
}
