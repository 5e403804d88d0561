use super::config::ScoringConfig;
use super::{LeadScoreInput, ScoreComponent, ScoreFactor};
use crate::workflows::mortgage::OperationType;

const EMPLOYMENT_BASELINE: i16 = 5;

pub(crate) fn score_components(
    input: &LeadScoreInput,
    config: &ScoringConfig,
) -> Vec<ScoreComponent> {
    let mut components = Vec::new();

    let dti = input.dti_percent;
    let dti_points = match dti {
        d if d < 20.0 => 30,
        d if d < 30.0 => 20,
        d if d < 40.0 => 10,
        d if d < 50.0 => 5,
        _ => 0,
    };
    components.push(component(
        ScoreFactor::DebtToIncome,
        dti_points,
        format!("DTI {dti:.1}%"),
    ));

    let ltv = input.ltv_percent;
    let ltv_points = match ltv {
        l if l < 60.0 => 25,
        l if l < 70.0 => 20,
        l if l < 80.0 => 15,
        l if l < 90.0 => 10,
        _ => 0,
    };
    components.push(component(
        ScoreFactor::LoanToValue,
        ltv_points,
        format!("LTV {ltv:.1}%"),
    ));

    match input.bank_score {
        Some(score) => {
            let points = match score {
                s if s >= 750 => 25,
                s if s >= 700 => 20,
                s if s >= 650 => 15,
                s if s >= 600 => 10,
                s if s >= 550 => 5,
                _ => 0,
            };
            components.push(component(
                ScoreFactor::BankScore,
                points,
                format!("bank score {score}"),
            ));
        }
        None => components.push(component(
            ScoreFactor::BankScore,
            0,
            "no bank score on file".to_string(),
        )),
    }

    let income_points = config
        .income_bands
        .iter()
        .filter(|band| input.annual_income >= band.min_annual_income)
        .map(|band| band.points)
        .max()
        .unwrap_or(0);
    components.push(component(
        ScoreFactor::AnnualIncome,
        income_points,
        format!("annual income {:.0}", input.annual_income),
    ));

    let down_payment_share = if input.property_value > 0.0 {
        input.down_payment / input.property_value
    } else {
        0.0
    };
    let down_payment_points = match down_payment_share {
        s if s >= 0.4 => 15,
        s if s >= 0.3 => 10,
        s if s >= 0.2 => 5,
        _ => 0,
    };
    components.push(component(
        ScoreFactor::DownPayment,
        down_payment_points,
        format!("down payment covers {:.0}% of price", down_payment_share * 100.0),
    ));

    if let Some(age) = input.age {
        let points = match age {
            25..=45 => 10,
            22..=55 => 5,
            _ => 0,
        };
        components.push(component(ScoreFactor::Age, points, format!("age {age}")));
    }

    components.push(component(
        ScoreFactor::EmploymentStability,
        EMPLOYMENT_BASELINE,
        "stable income assumed".to_string(),
    ));

    if let Some(operation) = input.operation_type {
        let points = match operation {
            OperationType::PrimaryResidence => 10,
            OperationType::SecondResidence => 5,
            OperationType::Investment => 0,
        };
        components.push(component(
            ScoreFactor::HousingType,
            points,
            operation.label().to_string(),
        ));
    }

    match input.has_other_credits {
        Some(false) => components.push(component(
            ScoreFactor::OtherCredits,
            10,
            "no other credits".to_string(),
        )),
        Some(true) => components.push(component(
            ScoreFactor::OtherCredits,
            -5,
            "carries other credits".to_string(),
        )),
        None => {}
    }

    components
}

fn component(factor: ScoreFactor, score: i16, notes: String) -> ScoreComponent {
    ScoreComponent {
        factor,
        score,
        notes,
    }
}
