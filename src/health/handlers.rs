use std::{sync::Arc, time::Instant};

use tracing::{error, info};

use crate::{
    common::app_state::AppState,
    health::{
        db,
        models::{CheckError, CheckName, CheckOutcome, HealthReport},
    },
};

/// Runs every check in order against the configured table. A failing check does not stop the rest.
pub async fn run_health_checks(state: Arc<AppState>) -> HealthReport {
    let config = state.get_config();
    let rest = state.get_rest_client();
    let client = state.get_client();
    let table = config.table.as_str();
    let primary_key = config.primary_key.as_str();

    let mut report = HealthReport::new(table);

    let (outcome, _) = timed(
        CheckName::SingleRow,
        db::check_single_row(rest, client, table, primary_key),
    )
    .await;
    report.checks.push(outcome);

    let (outcome, _) = timed(
        CheckName::KeyColumn,
        db::check_key_column(rest, client, table, primary_key),
    )
    .await;
    report.checks.push(outcome);

    let (outcome, count) = timed(
        CheckName::RowCount,
        db::check_row_count(rest, client, table),
    )
    .await;
    report.checks.push(outcome);
    report.row_count = count;

    match report.is_healthy() {
        true => info!("Table '{}' is healthy", table),
        false => error!(
            "Table '{}' failed {} of {} health checks",
            table,
            report.failed().count(),
            report.checks.len()
        ),
    }

    report
}

async fn timed<T, F>(name: CheckName, check: F) -> (CheckOutcome, Option<T>)
where
    F: Future<Output = Result<T, CheckError>>,
{
    let started = Instant::now();
    let result = check.await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(value) => {
            info!("Health check {} passed in {}ms", name, duration_ms);
            let outcome = CheckOutcome {
                name,
                passed: true,
                duration_ms,
                detail: None,
            };
            (outcome, Some(value))
        }
        Err(e) => {
            error!("Health check {} failed: {}", name, e);
            let outcome = CheckOutcome {
                name,
                passed: false,
                duration_ms,
                detail: Some(e.to_string()),
            };
            (outcome, None)
        }
    }
}
