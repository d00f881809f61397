use std::{process::ExitCode, sync::Arc};

use dotenv::dotenv;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::FmtSubscriber;

use crate::{
    common::{app_state::AppState, error::AppError},
    config::config::AppConfig,
    health::handlers::run_health_checks,
};

mod client;
mod common;
mod config;
mod health;

#[cfg(test)]
mod tests;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize .env
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing");

    // Initialize state, before any query is sent
    let state = match setup() {
        Ok(state) => state,
        Err(e @ AppError::Config(_)) => {
            error!("{}", e);
            return ExitCode::from(2);
        }
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Running health checks against table '{}'",
        state.get_config().table
    );
    let report = run_health_checks(state).await;

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize health report: {}", e),
    }

    match report.is_healthy() {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}

fn setup() -> Result<Arc<AppState>, AppError> {
    let config = AppConfig::from_env()?;
    AppState::from_config(config)
}
