use serde::{Deserialize, Serialize};

/// Minimum annual income that earns `points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeBand {
    pub min_annual_income: f64,
    pub points: i16,
}

/// Lead scoring dials. Income bands are in the lead's local currency and are
/// checked from the highest threshold down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub income_bands: Vec<IncomeBand>,
    pub cold_max: i16,
    pub warm_max: i16,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            income_bands: vec![
                IncomeBand {
                    min_annual_income: 60_000_000.0,
                    points: 20,
                },
                IncomeBand {
                    min_annual_income: 36_000_000.0,
                    points: 15,
                },
                IncomeBand {
                    min_annual_income: 24_000_000.0,
                    points: 10,
                },
                IncomeBand {
                    min_annual_income: 18_000_000.0,
                    points: 5,
                },
            ],
            cold_max: 40,
            warm_max: 70,
        }
    }
}
