mod batch;
mod cli;
mod infra;
mod routes;
mod server;

use admission_ranker::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
