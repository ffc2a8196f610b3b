use crate::domain::model::{Entry, ProviderConfig, SearchResult};
use crate::domain::ports::{ConfigSchema, SearchProvider, ValueKind};
use crate::utils::error::{ProviderError, ResolverError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Searches a JSON endpoint: `GET <endpoint>?q=<query>` answering with an
/// array of `{title, url, sort_weight?}`.
///
/// A table configuration adds its keys as extra query parameters, e.g.
/// `{ beta = { category = "tv" } }` sends `&category=tv`.
#[derive(Debug, Clone)]
pub struct HttpSearchProvider {
    name: String,
    endpoint: String,
    timeout_seconds: u64,
    client: Client,
}

impl HttpSearchProvider {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(name, endpoint, DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn with_timeout(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(ResolverError::Http)?;

        Ok(Self {
            name: name.into(),
            endpoint: endpoint.into(),
            timeout_seconds,
            client,
        })
    }

    fn query_params(&self, query: &str, config: Option<&ProviderConfig>) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), query.to_string())];
        if let Some(serde_json::Value::Object(extra)) = config {
            for (key, value) in extra {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                params.push((key.clone(), value));
            }
        }
        params
    }

    async fn fetch(
        &self,
        query: &str,
        config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        tracing::debug!("GET {} q={}", self.endpoint, query);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&self.query_params(query, config))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable {
                provider: self.name.clone(),
                message: format!("HTTP {}", status),
            }
            .into());
        }

        let results = response
            .json::<Vec<SearchResult>>()
            .await
            .map_err(|e| ProviderError::BadResponse {
                provider: self.name.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!("{} returned {} results for `{}`", self.name, results.len(), query);
        Ok(results)
    }

    fn request_error(&self, error: reqwest::Error) -> ResolverError {
        if error.is_timeout() {
            ProviderError::Timeout {
                provider: self.name.clone(),
                seconds: self.timeout_seconds,
            }
            .into()
        } else {
            ProviderError::Request(error).into()
        }
    }
}

#[async_trait]
impl SearchProvider for HttpSearchProvider {
    async fn search(
        &self,
        entry: &Entry,
        config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        let mut results = Vec::new();
        for query in entry.search_strings() {
            results.extend(self.fetch(&query, config).await?);
        }
        Ok(results)
    }

    fn config_schema(&self) -> Option<ConfigSchema> {
        Some(ConfigSchema::optional(ValueKind::Table))
    }
}
