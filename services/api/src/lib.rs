mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use std::process::ExitCode;

use creditpath::error::AppError;

pub async fn run() -> Result<ExitCode, AppError> {
    cli::run().await
}
