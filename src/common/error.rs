use crate::config::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}
