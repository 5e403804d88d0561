use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::ViabilityConfig;

/// Markets the brokerage operates in, each with its own closing-cost profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Jurisdiction {
    Spain,
    Colombia,
    Mexico,
    Argentina,
    Chile,
    Peru,
    Usa,
}

struct Preset {
    currency: &'static str,
    taxes_and_fees_rate: f64,
    minimum_down_payment_rate: f64,
    advisory_max_dti_percent: f64,
}

impl Jurisdiction {
    pub const ALL: [Jurisdiction; 7] = [
        Jurisdiction::Spain,
        Jurisdiction::Colombia,
        Jurisdiction::Mexico,
        Jurisdiction::Argentina,
        Jurisdiction::Chile,
        Jurisdiction::Peru,
        Jurisdiction::Usa,
    ];

    const fn preset(self) -> Preset {
        match self {
            Jurisdiction::Spain => Preset {
                currency: "EUR",
                taxes_and_fees_rate: 0.10,
                minimum_down_payment_rate: 0.20,
                advisory_max_dti_percent: 35.0,
            },
            Jurisdiction::Colombia => Preset {
                currency: "COP",
                taxes_and_fees_rate: 0.04,
                minimum_down_payment_rate: 0.30,
                advisory_max_dti_percent: 30.0,
            },
            Jurisdiction::Mexico => Preset {
                currency: "MXN",
                taxes_and_fees_rate: 0.06,
                minimum_down_payment_rate: 0.20,
                advisory_max_dti_percent: 30.0,
            },
            Jurisdiction::Argentina => Preset {
                currency: "ARS",
                taxes_and_fees_rate: 0.08,
                minimum_down_payment_rate: 0.25,
                advisory_max_dti_percent: 25.0,
            },
            Jurisdiction::Chile => Preset {
                currency: "CLP",
                taxes_and_fees_rate: 0.03,
                minimum_down_payment_rate: 0.20,
                advisory_max_dti_percent: 35.0,
            },
            Jurisdiction::Peru => Preset {
                currency: "PEN",
                taxes_and_fees_rate: 0.05,
                minimum_down_payment_rate: 0.10,
                advisory_max_dti_percent: 30.0,
            },
            Jurisdiction::Usa => Preset {
                currency: "USD",
                taxes_and_fees_rate: 0.03,
                minimum_down_payment_rate: 0.20,
                advisory_max_dti_percent: 43.0,
            },
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Jurisdiction::Spain => "es",
            Jurisdiction::Colombia => "co",
            Jurisdiction::Mexico => "mx",
            Jurisdiction::Argentina => "ar",
            Jurisdiction::Chile => "cl",
            Jurisdiction::Peru => "pe",
            Jurisdiction::Usa => "us",
        }
    }

    pub const fn currency(self) -> &'static str {
        self.preset().currency
    }

    pub const fn taxes_and_fees_rate(self) -> f64 {
        self.preset().taxes_and_fees_rate
    }

    pub const fn minimum_down_payment_rate(self) -> f64 {
        self.preset().minimum_down_payment_rate
    }

    /// Lender rule of thumb shown to brokers; the rubric keeps its own cutoff.
    pub const fn advisory_max_dti_percent(self) -> f64 {
        self.preset().advisory_max_dti_percent
    }

    /// Default rubric with this market's taxes-and-fees overhead.
    pub fn viability_config(self) -> ViabilityConfig {
        ViabilityConfig::default().with_taxes_and_fees_rate(self.taxes_and_fees_rate())
    }

    pub fn closing_costs(self, property_price: f64) -> ClosingCosts {
        let price = if property_price.is_finite() {
            property_price.max(0.0)
        } else {
            0.0
        };
        let down_payment_required = price * self.minimum_down_payment_rate();
        let taxes_and_fees = price * self.taxes_and_fees_rate();

        ClosingCosts {
            jurisdiction: self,
            down_payment_required,
            taxes_and_fees,
            cash_to_close: down_payment_required + taxes_and_fees,
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Jurisdiction {
    type Err = UnknownJurisdiction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "es" | "spain" | "españa" | "espana" => Ok(Jurisdiction::Spain),
            "co" | "colombia" => Ok(Jurisdiction::Colombia),
            "mx" | "mexico" | "méxico" => Ok(Jurisdiction::Mexico),
            "ar" | "argentina" => Ok(Jurisdiction::Argentina),
            "cl" | "chile" => Ok(Jurisdiction::Chile),
            "pe" | "peru" | "perú" => Ok(Jurisdiction::Peru),
            "us" | "usa" | "united states" => Ok(Jurisdiction::Usa),
            _ => Err(UnknownJurisdiction(value.to_string())),
        }
    }
}

impl TryFrom<String> for Jurisdiction {
    type Error = UnknownJurisdiction;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown jurisdiction '{0}'")]
pub struct UnknownJurisdiction(pub String);

/// Up-front cash a buyer needs on top of the financed amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCosts {
    pub jurisdiction: Jurisdiction,
    pub down_payment_required: f64,
    pub taxes_and_fees: f64,
    pub cash_to_close: f64,
}
