use crate::commands::{
    run_evaluate, run_import, run_scenarios, EvaluateArgs, ImportArgs, ScenarioArgs,
};
use crate::server;
use broker_ai::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Broker AI",
    about = "Mortgage viability studies and lead scoring for real-estate brokers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a viability study for a single borrower profile
    Evaluate(EvaluateArgs),
    /// Compare fixed, mixed and variable rate payments
    Scenarios(ScenarioArgs),
    /// Study and score every lead in a CRM CSV export
    Import(ImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Scenarios(args) => run_scenarios(args),
        Command::Import(args) => run_import(args),
    }
}
