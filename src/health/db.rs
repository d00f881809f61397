use reqwest::Client;
use tracing::debug;

use crate::{
    client::{
        query::{CountMethod, SelectQuery},
        rest_client::RestClient,
    },
    health::models::CheckError,
};

/// Selects up to one full row; a returned row must carry the primary-key field.
pub async fn check_single_row(
    rest: &RestClient,
    client: &Client,
    table: &str,
    primary_key: &str,
) -> Result<(), CheckError> {
    let query = SelectQuery::from(table)
        .select("*")
        .count(CountMethod::Exact)
        .limit(1);

    let response = rest.select(client, &query).await?;
    debug!("Single row select returned {}", response.status);

    if let Some(row) = response.rows.first() {
        if !row.contains_key(primary_key) {
            return Err(CheckError::MissingKeyField(primary_key.to_string()));
        }
    }

    Ok(())
}

pub async fn check_key_column(
    rest: &RestClient,
    client: &Client,
    table: &str,
    primary_key: &str,
) -> Result<(), CheckError> {
    let query = SelectQuery::from(table).select(primary_key).limit(1);
    let response = rest.select(client, &query).await?;
    debug!("Key column select returned {}", response.status);

    Ok(())
}

/// Returns the exact number of rows in the table.
pub async fn check_row_count(
    rest: &RestClient,
    client: &Client,
    table: &str,
) -> Result<u64, CheckError> {
    let query = SelectQuery::from(table)
        .select("*")
        .count(CountMethod::Exact)
        .head(true);

    let response = rest.select(client, &query).await?;
    response.count.ok_or(CheckError::MissingCount)
}
