use serde::{Deserialize, Serialize};

/// Jurisdiction-dependent dials for the viability rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViabilityConfig {
    /// Transfer taxes and fees as a fraction of the price (0.10 = 10%).
    pub taxes_and_fees_rate: f64,
    /// Applicants strictly younger than this get the young LTV threshold.
    pub young_age_threshold: u32,
    pub ltv_threshold_young: f64,
    pub ltv_threshold_other: f64,
    /// Fraction of monthly income (0.40 = 40%).
    pub max_viable_dti: f64,
    /// Percent of the price.
    pub max_viable_ltv: f64,
}

impl ViabilityConfig {
    pub const DEFAULT_TAXES_AND_FEES_RATE: f64 = 0.10;
    pub const DEFAULT_YOUNG_AGE_THRESHOLD: u32 = 35;
    pub const DEFAULT_LTV_THRESHOLD_YOUNG: f64 = 95.0;
    pub const DEFAULT_LTV_THRESHOLD_OTHER: f64 = 90.0;
    pub const DEFAULT_MAX_VIABLE_DTI: f64 = 0.40;
    pub const DEFAULT_MAX_VIABLE_LTV: f64 = 80.0;

    /// LTV-Op ceiling for the applicant's age. Unknown ages get the
    /// conservative threshold.
    pub fn ltv_threshold_for(&self, age: Option<u32>) -> f64 {
        match age {
            Some(age) if age > 0 && age < self.young_age_threshold => self.ltv_threshold_young,
            _ => self.ltv_threshold_other,
        }
    }

    pub fn with_taxes_and_fees_rate(mut self, rate: f64) -> Self {
        self.taxes_and_fees_rate = rate;
        self
    }
}

impl Default for ViabilityConfig {
    fn default() -> Self {
        Self {
            taxes_and_fees_rate: Self::DEFAULT_TAXES_AND_FEES_RATE,
            young_age_threshold: Self::DEFAULT_YOUNG_AGE_THRESHOLD,
            ltv_threshold_young: Self::DEFAULT_LTV_THRESHOLD_YOUNG,
            ltv_threshold_other: Self::DEFAULT_LTV_THRESHOLD_OTHER,
            max_viable_dti: Self::DEFAULT_MAX_VIABLE_DTI,
            max_viable_ltv: Self::DEFAULT_MAX_VIABLE_LTV,
        }
    }
}
