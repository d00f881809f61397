use core::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::rest_client_error::RestClientError;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Query failed: {0}")]
    Query(#[from] RestClientError),

    #[error("Returned row is missing the primary key field '{0}'")]
    MissingKeyField(String),

    #[error("Count query returned no row count")]
    MissingCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    SingleRow,
    KeyColumn,
    RowCount,
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckName::SingleRow => write!(f, "single_row"),
            CheckName::KeyColumn => write!(f, "key_column"),
            CheckName::RowCount => write!(f, "row_count"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: CheckName,
    pub passed: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub table: String,
    pub checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,
    pub checks: Vec<CheckOutcome>,
}

impl HealthReport {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            checked_at: Utc::now(),
            row_count: None,
            checks: Vec::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|check| !check.passed)
    }
}
