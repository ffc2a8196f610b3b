use crate::domain::model::{Entry, ProviderConfig, SearchResult};
use crate::domain::ports::{ConfigSchema, SearchProvider, ValueKind};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Answers every search with the same fixed results. Any configuration is
/// accepted and ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    results: Vec<SearchResult>,
}

impl StaticProvider {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self { results }
    }
}

#[async_trait]
impl SearchProvider for StaticProvider {
    async fn search(
        &self,
        _entry: &Entry,
        _config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        Ok(self.results.clone())
    }

    fn config_schema(&self) -> Option<ConfigSchema> {
        Some(ConfigSchema::optional(ValueKind::Any))
    }
}
