use std::sync::Arc;

use reqwest::Client;

use crate::{
    client::rest_client::RestClient, common::error::AppError, config::config::AppConfig,
};

pub struct AppState {
    config: AppConfig,
    client: Client,
    rest_client: RestClient,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Arc<Self>, AppError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        let rest_client = RestClient::new(&config.service_url, &config.anon_key);

        let state = Arc::new(Self {
            config,
            client,
            rest_client,
        });

        Ok(state)
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }

    pub fn get_rest_client(&self) -> &RestClient {
        &self.rest_client
    }
}
