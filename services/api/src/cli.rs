use crate::assess::{run_assess, run_status, AssessArgs, StatusArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use creditpath::error::AppError;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "CreditPath",
    about = "Serve and exercise the CreditPath borrower risk dashboard from the command line",
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
    /// Assess one borrower, or a CSV batch of borrowers, against the prediction service
    Assess(AssessArgs),
    /// Check that the prediction service is up and list its models
    Status(StatusArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the prediction service base URL
    #[arg(long)]
    pub(crate) prediction_url: Option<String>,
}

pub(crate) async fn run() -> Result<ExitCode, AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await.map(|()| ExitCode::SUCCESS),
        Command::Assess(args) => run_assess(args).await,
        Command::Status(args) => run_status(args).await,
    }
}
