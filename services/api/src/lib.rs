mod cli;
mod commands;
mod demo;
mod infra;
mod routes;
mod server;

use std::process::ExitCode;
use usmca_compliance::error::AppError;

pub async fn run() -> Result<ExitCode, AppError> {
    cli::run().await
}
