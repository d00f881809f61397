use reqwest::{
    Client, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, CONTENT_RANGE},
};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::client::{
    query::SelectQuery,
    rest_client_error::{ApiError, RestClientError},
};

/// A single record, keyed by field name.
pub type Row = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct QueryResponse {
    pub status: StatusCode,
    pub rows: Vec<Row>,
    pub count: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    domain: String,
    api_key: String,
}

impl RestClient {
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        let domain = domain.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();

        Self { domain, api_key }
    }

    /// The table name is percent-encoded as a single path segment.
    pub fn table_url(&self, table: &str) -> Result<Url, RestClientError> {
        let invalid = || RestClientError::InvalidUrl(self.domain.clone());
        let mut url = Url::parse(&self.domain).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["rest", "v1", table]);

        Ok(url)
    }

    pub async fn select(
        &self,
        client: &Client,
        query: &SelectQuery,
    ) -> Result<QueryResponse, RestClientError> {
        let url = self.table_url(query.table())?;
        let params = query.params();
        info!("RestClient sending {} request to: {}", query.method(), url);
        debug!("Query params for '{}': {:?}", query.table(), params);

        let mut request = client
            .request(query.method(), url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(ACCEPT, "application/json")
            .query(&params);

        if let Some(prefer) = query.prefer() {
            request = request.header("Prefer", prefer);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match query.is_head() {
                true => String::new(),
                false => response.text().await.unwrap_or_default(),
            };
            let api_error = parse_api_error(status, &body);
            error!("RestClient request failed: {} - {}", status, api_error);
            return Err(RestClientError::Api(status, api_error));
        }

        let count = match query.wants_count() {
            true => match response.headers().get(CONTENT_RANGE) {
                Some(value) => {
                    let value = value
                        .to_str()
                        .map_err(|_| RestClientError::InvalidContentRange("<non-ascii>".into()))?;
                    parse_content_range(value)?
                }
                None => None,
            },
            false => None,
        };

        let rows = match query.is_head() {
            true => Vec::new(),
            false => {
                let body = response.bytes().await?;
                serde_json::from_slice::<Vec<Row>>(&body)?
            }
        };

        debug!(
            "RestClient received {} rows (count: {:?}) from '{}'",
            rows.len(),
            count,
            query.table()
        );

        Ok(QueryResponse {
            status,
            rows,
            count,
        })
    }
}

/// Total from a `Content-Range` header such as `0-0/42` or `*/42`. A `*` total means unknown.
pub fn parse_content_range(value: &str) -> Result<Option<u64>, RestClientError> {
    let invalid = || RestClientError::InvalidContentRange(value.to_string());
    let (_, total) = value.trim().rsplit_once('/').ok_or_else(invalid)?;

    match total {
        "*" => Ok(None),
        total => total.parse::<u64>().map(Some).map_err(|_| invalid()),
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> ApiError {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(body) {
        return api_error;
    }

    let message = match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        body => body.to_string(),
    };

    ApiError {
        message,
        ..Default::default()
    }
}
