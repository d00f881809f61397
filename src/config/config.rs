use std::{ffi::OsString, time::Duration};

use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

pub const URL_VAR: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const KEY_VAR: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const TABLE_VAR: &str = "DB_TABLE_NAME";
pub const PRIMARY_KEY_VAR: &str = "DB_PRIMARY_KEY";
pub const TIMEOUT_VAR: &str = "DB_HEALTH_TIMEOUT_SECS";

const KNOWN_VARS: [&str; 5] = [URL_VAR, KEY_VAR, TABLE_VAR, PRIMARY_KEY_VAR, TIMEOUT_VAR];

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("Invalid service url '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),

    #[error("Invalid value '{1}' for {0}: expected a whole number of seconds above zero")]
    InvalidTimeout(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}

// The environment source may lowercase the keys it reads.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(alias = "NEXT_PUBLIC_SUPABASE_URL")]
    next_public_supabase_url: Option<String>,
    #[serde(alias = "NEXT_PUBLIC_SUPABASE_ANON_KEY")]
    next_public_supabase_anon_key: Option<String>,
    #[serde(alias = "DB_TABLE_NAME")]
    db_table_name: Option<String>,
    #[serde(alias = "DB_PRIMARY_KEY")]
    db_primary_key: Option<String>,
    #[serde(alias = "DB_HEALTH_TIMEOUT_SECS")]
    db_health_timeout_secs: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub service_url: String,
    pub anon_key: String,
    pub table: String,
    pub primary_key: String,
    pub timeout: Duration,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_os_vars(std::env::vars_os())
    }

    /// Keeps only our own variables; unrelated keys may be neither unicode nor valid config paths.
    pub fn from_os_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut known = Vec::new();
        for (key, value) in vars {
            let Some(name) = KNOWN_VARS
                .iter()
                .copied()
                .find(|name| key.to_str() == Some(*name))
            else {
                continue;
            };

            let value = value
                .into_string()
                .map_err(|_| ConfigError::NotUnicode(name))?;
            known.push((name, value));
        }

        Self::from_vars(known)
    }

    /// Reads an explicit set of variables instead of the process environment.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let raw: RawConfig = ::config::Config::builder()
            .add_source(::config::Environment::default().source(Some(source)))
            .build()?
            .try_deserialize()?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let service_url = required(raw.next_public_supabase_url, URL_VAR, &mut missing);
        let anon_key = required(raw.next_public_supabase_anon_key, KEY_VAR, &mut missing);
        let table = required(raw.db_table_name, TABLE_VAR, &mut missing);
        let primary_key = required(raw.db_primary_key, PRIMARY_KEY_VAR, &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let parsed = Url::parse(&service_url)
            .map_err(|e| ConfigError::InvalidUrl(service_url.clone(), e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(
                service_url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }

        let timeout = parse_timeout(raw.db_health_timeout_secs)?;

        debug!(
            "Loaded configuration for table '{}' on {} (timeout {:?})",
            table, service_url, timeout
        );

        Ok(Self {
            service_url,
            anon_key,
            table,
            primary_key,
            timeout,
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> String {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => v,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

// Blank counts as unset, like the required values.
fn parse_timeout(value: Option<String>) -> Result<Duration, ConfigError> {
    let value = match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
    };

    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(TIMEOUT_VAR, value.to_string())),
    }
}
