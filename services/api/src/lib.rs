mod cli;
mod console;
mod infra;
mod routes;
mod server;

use staffing_pipeline::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
