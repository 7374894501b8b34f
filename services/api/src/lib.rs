mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use solar_economics::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
