use crate::infra::{InMemoryLeadRepository, InMemoryNotificationPublisher};
use broker_ai::config::AppConfig;
use broker_ai::error::AppError;
use broker_ai::workflows::leads::{LeadCsvImporter, LeadStudyService, StudyRecord};
use broker_ai::workflows::mortgage::intake::{parse_applicant_mode, parse_operation_type};
use broker_ai::workflows::mortgage::{
    evaluate, BorrowerProfile, ClosingCosts, Jurisdiction, RateScenario, ScenarioRequest,
    ViabilityConfig, ViabilityResult,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// habitual, segunda or inversion (primary residence when omitted)
    #[arg(long, default_value = "habitual")]
    pub(crate) operation_type: String,
    /// solo or pareja
    #[arg(long, default_value = "solo")]
    pub(crate) applicant_mode: String,
    #[arg(long)]
    pub(crate) age: Option<u32>,
    /// Net monthly income
    #[arg(long)]
    pub(crate) income: f64,
    /// Property price
    #[arg(long)]
    pub(crate) price: f64,
    /// Savings contributed as down payment
    #[arg(long)]
    pub(crate) savings: f64,
    /// Explicit financing request; defaults to price minus savings
    #[arg(long)]
    pub(crate) requested_financing: Option<f64>,
    /// Other monthly debt payments
    #[arg(long, default_value_t = 0.0)]
    pub(crate) other_debts: f64,
    /// Annual interest rate in percent
    #[arg(long, default_value_t = 3.5)]
    pub(crate) rate: f64,
    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    pub(crate) term: u32,
    /// Market preset (es, co, mx, ar, cl, pe, us) for taxes and closing costs
    #[arg(long)]
    pub(crate) jurisdiction: Option<Jurisdiction>,
    /// Print the study as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl EvaluateArgs {
    fn profile(&self) -> BorrowerProfile {
        BorrowerProfile {
            operation_type: parse_operation_type(&self.operation_type),
            applicant_mode: parse_applicant_mode(&self.applicant_mode),
            age: self.age,
            monthly_net_income: self.income,
            property_price: self.price,
            down_payment_savings: self.savings,
            requested_financing: self.requested_financing,
            other_monthly_debt_payments: self.other_debts,
            annual_interest_rate_percent: self.rate,
            term_years: self.term,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ScenarioArgs {
    /// Amount to finance
    #[arg(long)]
    pub(crate) principal: f64,
    /// Base annual rate in percent
    #[arg(long, default_value_t = 3.5)]
    pub(crate) rate: f64,
    #[arg(long, default_value_t = 30)]
    pub(crate) term: u32,
    /// Reference index for the variable product (e.g. Euribor)
    #[arg(long)]
    pub(crate) index: Option<f64>,
    /// Spread over the reference index
    #[arg(long)]
    pub(crate) spread: Option<f64>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CRM lead export to study
    #[arg(long)]
    pub(crate) csv: PathBuf,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct EvaluationReport {
    summary: String,
    result: ViabilityResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    closing_costs: Option<ClosingCosts>,
}

#[derive(Debug, Serialize)]
struct ImportedStudy {
    lead_id: String,
    name: String,
    study: StudyRecord,
}

fn resolve_config(jurisdiction: Option<Jurisdiction>) -> Result<ViabilityConfig, AppError> {
    let config = AppConfig::load()?.viability;
    Ok(match jurisdiction {
        Some(jurisdiction) => config.with_taxes_and_fees_rate(jurisdiction.taxes_and_fees_rate()),
        None => config,
    })
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let profile = args.profile();
    profile.validate()?;

    let config = resolve_config(args.jurisdiction)?;
    let result = evaluate(&profile, &config);
    let report = EvaluationReport {
        summary: result.summary(),
        closing_costs: args
            .jurisdiction
            .map(|jurisdiction| jurisdiction.closing_costs(profile.property_price)),
        result,
    };

    if args.json {
        print_json(&report);
    } else {
        for line in render_evaluation(&report) {
            println!("{line}");
        }
    }
    Ok(())
}

fn render_evaluation(report: &EvaluationReport) -> Vec<String> {
    let result = &report.result;
    let mut lines = vec![
        format!(
            "Operation: {} ({})",
            result.operation_type.label(),
            result.applicant_mode.label()
        ),
        format!("Financing: {:.0}", result.financing_amount),
        format!("Monthly payment: {}", result.monthly_payment),
        format!("DTI: {}%", result.debt_to_income_percent),
        format!(
            "LTV requested: {}% | LTV operation: {}% (threshold {:.0}%)",
            result.loan_to_value_requested_percent,
            result.loan_to_value_operation_percent,
            result.ltv_threshold
        ),
    ];

    if result.has_negative_financing() {
        lines.push("Warning: savings exceed the property price".to_string());
    }
    if let Some(costs) = &report.closing_costs {
        lines.push(format!(
            "Closing costs ({}): down payment {:.0} + taxes and fees {:.0} = {:.0}",
            costs.jurisdiction.currency(),
            costs.down_payment_required,
            costs.taxes_and_fees,
            costs.cash_to_close
        ));
    }
    lines.push(report.summary.clone());
    lines
}

pub(crate) fn run_scenarios(args: ScenarioArgs) -> Result<(), AppError> {
    let request = ScenarioRequest {
        principal: args.principal,
        base_rate_percent: args.rate,
        term_years: args.term,
        reference_index_percent: args.index,
        spread_percent: args.spread,
    };
    let scenarios = request.scenarios();

    if args.json {
        print_json(&scenarios);
    } else {
        println!(
            "Rate scenarios for {:.0} over {} years",
            request.principal, request.term_years
        );
        for line in render_scenarios(&scenarios) {
            println!("{line}");
        }
    }
    Ok(())
}

fn render_scenarios(scenarios: &[RateScenario]) -> Vec<String> {
    scenarios
        .iter()
        .map(|scenario| {
            format!(
                "- {:?}: {:.2}% -> {} / month | total {:.0} | interest {:.0}",
                scenario.kind,
                scenario.annual_rate_percent,
                scenario.monthly_payment,
                scenario.total_paid,
                scenario.total_interest
            )
        })
        .collect()
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let submissions = LeadCsvImporter::from_path(&args.csv)?;

    let repository = Arc::new(InMemoryLeadRepository::default());
    let notifications = Arc::new(InMemoryNotificationPublisher::default());
    let service = LeadStudyService::new(repository, notifications.clone(), config.viability);

    let mut studies = Vec::with_capacity(submissions.len());
    let mut rejected = Vec::new();
    for submission in submissions {
        let name = submission.name.clone();
        let outcome = service
            .create(submission)
            .and_then(|record| service.run_study(&record.id).map(|study| (record, study)));
        match outcome {
            Ok((record, study)) => studies.push(ImportedStudy {
                lead_id: record.id.0,
                name: record.name,
                study,
            }),
            Err(err) => rejected.push(format!("{name}: {err}")),
        }
    }

    if args.json {
        print_json(&studies);
        return Ok(());
    }

    println!(
        "Imported {} leads from {}",
        studies.len(),
        args.csv.display()
    );
    for imported in &studies {
        println!(
            "- {} {} | score {} ({}) | {}",
            imported.lead_id,
            imported.name,
            imported.study.score.score,
            imported.study.score.category.label(),
            imported.study.result.summary()
        );
    }
    if !rejected.is_empty() {
        println!("\nRejected rows");
        for line in &rejected {
            println!("- {line}");
        }
    }
    println!(
        "\n{} follow-up notifications queued",
        notifications.events().len()
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("unable to render JSON output: {err}"),
    }
}
