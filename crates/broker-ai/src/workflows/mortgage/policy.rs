use super::config::ViabilityConfig;

/// Unrounded ratios the verdict is decided on.
pub(crate) struct ViabilitySignals {
    pub debt_to_income: f64,
    pub ltv_requested: f64,
    pub ltv_operation: f64,
    pub age: Option<u32>,
}

pub(crate) struct Verdict {
    pub ltv_threshold: f64,
    pub requires_manual_review: bool,
    pub is_viable: bool,
}

pub(crate) fn decide_verdict(config: &ViabilityConfig, signals: &ViabilitySignals) -> Verdict {
    let ltv_threshold = config.ltv_threshold_for(signals.age);

    // Manual review is advisory and never feeds into viability.
    let requires_manual_review = signals.ltv_operation > ltv_threshold;
    let is_viable = signals.debt_to_income <= config.max_viable_dti
        && signals.ltv_requested <= config.max_viable_ltv;

    Verdict {
        ltv_threshold,
        requires_manual_review,
        is_viable,
    }
}
