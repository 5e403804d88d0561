use serde::{Deserialize, Serialize};

use super::rules::{finite_or_zero, monthly_payment, round_to_i64, MONTHS_PER_YEAR};

/// Spread applied above (fixed) or below (variable) the base rate.
pub const SCENARIO_SPREAD_PERCENT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Fixed,
    Mixed,
    Variable,
}

/// Inputs for comparing rate products on the same principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub principal: f64,
    pub base_rate_percent: f64,
    pub term_years: u32,
    /// Reference index (e.g. 12-month Euribor) for variable products.
    #[serde(default)]
    pub reference_index_percent: Option<f64>,
    /// Lender spread over the reference index.
    #[serde(default)]
    pub spread_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateScenario {
    pub kind: ScenarioKind,
    pub annual_rate_percent: f64,
    pub monthly_payment: i64,
    pub total_paid: f64,
    pub total_interest: f64,
}

impl ScenarioRequest {
    pub fn variable_rate_percent(&self) -> f64 {
        let rate = match self.reference_index_percent {
            Some(index) => {
                finite_or_zero(index) + finite_or_zero(self.spread_percent.unwrap_or(0.0))
            }
            None => finite_or_zero(self.base_rate_percent) - SCENARIO_SPREAD_PERCENT,
        };
        rate.max(0.0)
    }

    /// Fixed, mixed and variable payments, in that order.
    pub fn scenarios(&self) -> Vec<RateScenario> {
        let base = finite_or_zero(self.base_rate_percent).max(0.0);
        [
            (ScenarioKind::Fixed, base + SCENARIO_SPREAD_PERCENT),
            (ScenarioKind::Mixed, base),
            (ScenarioKind::Variable, self.variable_rate_percent()),
        ]
        .into_iter()
        .map(|(kind, rate)| self.scenario(kind, rate))
        .collect()
    }

    fn scenario(&self, kind: ScenarioKind, annual_rate_percent: f64) -> RateScenario {
        let payment = monthly_payment(self.principal, annual_rate_percent, self.term_years);
        let months = self.term_years.saturating_mul(MONTHS_PER_YEAR) as f64;
        let total_paid = payment * months;
        let principal = finite_or_zero(self.principal).max(0.0);
        let total_interest = if total_paid > 0.0 {
            (total_paid - principal).max(0.0)
        } else {
            0.0
        };

        RateScenario {
            kind,
            annual_rate_percent,
            monthly_payment: round_to_i64(payment),
            total_paid,
            total_interest,
        }
    }
}
