//! Conversion of free-text lead fields into a typed [`BorrowerProfile`].
//!
//! Lead records keep their financial fields as the strings brokers typed into
//! the CRM. Everything here is lenient: unreadable input collapses to zero or
//! to the documented default instead of failing.

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantMode, BorrowerProfile, OperationType};

pub const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 3.5;
pub const DEFAULT_TERM_YEARS: u32 = 30;

/// Raw financial fields as stored on a lead record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadFinancialsForm {
    pub tipo_operacion: String,
    pub modalidad_compra: String,
    pub edad: String,
    pub ingresos_netos: String,
    pub precio_real: String,
    pub aportacion_real: String,
    pub otras_cuotas: String,
    pub financiacion_solicitada: String,
    pub tasa_interes: String,
    pub plazo_anos: String,
}

impl LeadFinancialsForm {
    pub fn to_profile(&self) -> BorrowerProfile {
        let requested = parse_currency(&self.financiacion_solicitada);

        BorrowerProfile {
            operation_type: parse_operation_type(&self.tipo_operacion),
            applicant_mode: parse_applicant_mode(&self.modalidad_compra),
            age: parse_age(&self.edad),
            monthly_net_income: parse_currency(&self.ingresos_netos),
            property_price: parse_currency(&self.precio_real),
            down_payment_savings: parse_currency(&self.aportacion_real),
            requested_financing: (requested > 0.0).then_some(requested),
            other_monthly_debt_payments: parse_currency(&self.otras_cuotas),
            annual_interest_rate_percent: parse_rate(&self.tasa_interes),
            term_years: parse_term(&self.plazo_anos),
        }
    }
}

impl From<&LeadFinancialsForm> for BorrowerProfile {
    fn from(form: &LeadFinancialsForm) -> Self {
        form.to_profile()
    }
}

/// Keep ASCII digits only, so "200.000 €" and "200,000" both read as 200000.
/// Separators and minus signs are dropped, which means the result is never
/// negative.
pub fn parse_currency(raw: &str) -> f64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return 0.0;
    }
    digits.parse::<f64>().unwrap_or(0.0)
}

/// Annual rate in percent; accepts a comma decimal separator.
pub fn parse_rate(raw: &str) -> f64 {
    let normalized = raw.trim().trim_end_matches('%').trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => DEFAULT_ANNUAL_RATE_PERCENT,
    }
}

pub fn parse_term(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(term) if term > 0 => term,
        _ => DEFAULT_TERM_YEARS,
    }
}

pub fn parse_age(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|age| *age > 0)
}

pub fn parse_operation_type(raw: &str) -> OperationType {
    match raw.trim().to_lowercase().as_str() {
        "segunda" | "segunda_vivienda" | "second" | "second_residence" => {
            OperationType::SecondResidence
        }
        "inversion" | "inversión" | "investment" => OperationType::Investment,
        _ => OperationType::PrimaryResidence,
    }
}

pub fn parse_applicant_mode(raw: &str) -> ApplicantMode {
    match raw.trim().to_lowercase().as_str() {
        "pareja" | "conjunta" | "couple" | "joint" => ApplicantMode::Couple,
        _ => ApplicantMode::Single,
    }
}
