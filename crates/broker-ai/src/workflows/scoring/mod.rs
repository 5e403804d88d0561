//! Commercial lead scoring layered on top of a viability study.

mod config;
mod rules;

pub use config::{IncomeBand, ScoringConfig};

use serde::{Deserialize, Serialize};

use crate::workflows::mortgage::{BorrowerProfile, OperationType, ViabilityResult};

pub const MAX_SCORE: i16 = 100;

/// Signals the scorer reads. Percentages are 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScoreInput {
    pub dti_percent: f64,
    pub ltv_percent: f64,
    #[serde(default)]
    pub bank_score: Option<u16>,
    pub annual_income: f64,
    pub down_payment: f64,
    pub property_value: f64,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub operation_type: Option<OperationType>,
    #[serde(default)]
    pub has_other_credits: Option<bool>,
}

impl LeadScoreInput {
    pub fn from_evaluation(
        profile: &BorrowerProfile,
        result: &ViabilityResult,
        bank_score: Option<u16>,
    ) -> Self {
        Self {
            dti_percent: result.debt_to_income_ratio * 100.0,
            ltv_percent: result.loan_to_value_requested,
            bank_score,
            annual_income: finite_non_negative(profile.monthly_net_income) * 12.0,
            down_payment: finite_non_negative(profile.down_payment_savings),
            property_value: finite_non_negative(profile.property_price),
            age: profile.age,
            operation_type: Some(profile.operation_type),
            has_other_credits: Some(profile.other_monthly_debt_payments > 0.0),
        }
    }
}

fn finite_non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreFactor {
    DebtToIncome,
    LoanToValue,
    BankScore,
    AnnualIncome,
    DownPayment,
    Age,
    EmploymentStability,
    HousingType,
    OtherCredits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: i16,
    pub notes: String,
}

/// Temperature bucket used to prioritise broker follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadCategory {
    Cold,
    Warm,
    Hot,
}

impl LeadCategory {
    pub const fn label(self) -> &'static str {
        match self {
            LeadCategory::Cold => "cold",
            LeadCategory::Warm => "warm",
            LeadCategory::Hot => "hot",
        }
    }

    pub const fn recommended_action(self) -> &'static str {
        match self {
            LeadCategory::Hot => "Call immediately and offer a preferential rate",
            LeadCategory::Warm => "Send a personalised email and follow up on WhatsApp within 24h",
            LeadCategory::Cold => "Add to the weekly newsletter with the home-buying guide",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    pub score: i16,
    pub category: LeadCategory,
    pub recommended_action: String,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer applying a [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct LeadScorer {
    config: ScoringConfig,
}

impl LeadScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, input: &LeadScoreInput) -> LeadScore {
        let components = rules::score_components(input, &self.config);
        let raw: i16 = components.iter().map(|component| component.score).sum();
        let score = raw.clamp(0, MAX_SCORE);
        let category = self.categorize(score);

        LeadScore {
            score,
            category,
            recommended_action: category.recommended_action().to_string(),
            components,
        }
    }

    pub fn categorize(&self, score: i16) -> LeadCategory {
        if score <= self.config.cold_max {
            LeadCategory::Cold
        } else if score <= self.config.warm_max {
            LeadCategory::Warm
        } else {
            LeadCategory::Hot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mortgage::{evaluate, ApplicantMode, ViabilityConfig};

    fn strong_input() -> LeadScoreInput {
        LeadScoreInput {
            dti_percent: 18.0,
            ltv_percent: 55.0,
            bank_score: Some(780),
            annual_income: 72_000_000.0,
            down_payment: 90_000_000.0,
            property_value: 200_000_000.0,
            age: Some(32),
            operation_type: Some(OperationType::PrimaryResidence),
            has_other_credits: Some(false),
        }
    }

    #[test]
    fn strong_profile_is_capped_at_one_hundred() {
        let score = LeadScorer::default().score(&strong_input());

        assert_eq!(score.score, MAX_SCORE);
        assert_eq!(score.category, LeadCategory::Hot);
        assert!(score.recommended_action.contains("Call"));
    }

    #[test]
    fn weak_profile_is_cold() {
        let input = LeadScoreInput {
            dti_percent: 55.0,
            ltv_percent: 95.0,
            bank_score: Some(500),
            annual_income: 10_000_000.0,
            down_payment: 0.0,
            property_value: 200_000_000.0,
            age: Some(60),
            operation_type: Some(OperationType::Investment),
            has_other_credits: Some(true),
        };

        let score = LeadScorer::default().score(&input);

        // Only the employment baseline survives the other-credits penalty.
        assert_eq!(score.score, 0);
        assert_eq!(score.category, LeadCategory::Cold);
        assert!(score
            .components
            .iter()
            .any(|component| component.factor == ScoreFactor::OtherCredits
                && component.score < 0));
    }

    #[test]
    fn category_boundaries() {
        let scorer = LeadScorer::default();

        assert_eq!(scorer.categorize(40), LeadCategory::Cold);
        assert_eq!(scorer.categorize(41), LeadCategory::Warm);
        assert_eq!(scorer.categorize(70), LeadCategory::Warm);
        assert_eq!(scorer.categorize(71), LeadCategory::Hot);
    }

    #[test]
    fn unknown_signals_are_neutral() {
        let mut input = strong_input();
        input.bank_score = None;
        input.age = None;
        input.operation_type = None;
        input.has_other_credits = None;

        let score = LeadScorer::default().score(&input);

        // 30 DTI + 25 LTV + 20 income + 15 down payment + 5 baseline.
        assert_eq!(score.score, 95);
        assert!(!score
            .components
            .iter()
            .any(|component| component.factor == ScoreFactor::Age));
    }

    #[test]
    fn input_derives_from_viability_result() {
        let profile = BorrowerProfile {
            operation_type: OperationType::SecondResidence,
            applicant_mode: ApplicantMode::Couple,
            age: Some(40),
            monthly_net_income: 3_000.0,
            property_price: 200_000.0,
            down_payment_savings: 60_000.0,
            requested_financing: None,
            other_monthly_debt_payments: 100.0,
            annual_interest_rate_percent: 2.6,
            term_years: 30,
        };
        let result = evaluate(&profile, &ViabilityConfig::default());

        let input = LeadScoreInput::from_evaluation(&profile, &result, None);

        assert_eq!(input.annual_income, 36_000.0);
        assert_eq!(input.operation_type, Some(OperationType::SecondResidence));
        assert_eq!(input.has_other_credits, Some(true));
        assert!((input.dti_percent - 22.0).abs() < 0.5);
    }
}
