mod cli;
mod infra;
mod report;
mod routes;
mod server;

use learner_progress::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
