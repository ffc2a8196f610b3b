use crate::domain::model::{Entry, ProviderConfig, ProviderEntry, SearchResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn providers(&self) -> &[ProviderEntry];
    fn test_mode(&self) -> bool;
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
    Table,
    Array,
    Any,
}

impl ValueKind {
    pub fn matches(&self, value: &ProviderConfig) -> bool {
        match self {
            ValueKind::String => value.is_string(),
            ValueKind::Integer => value.is_i64() || value.is_u64(),
            ValueKind::Boolean => value.is_boolean(),
            ValueKind::Table => value.is_object(),
            ValueKind::Array => value.is_array(),
            ValueKind::Any => true,
        }
    }
}

/// Shape of the configuration a provider accepts in the priority list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSchema {
    pub kind: ValueKind,
    pub required: bool,
}

impl ConfigSchema {
    pub fn optional(kind: ValueKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    pub fn required(kind: ValueKind) -> Self {
        Self {
            kind,
            required: true,
        }
    }
}

/// A remote catalog able to look up download locations for an entry.
///
/// Return `ResolverError::Provider` for anything that only means "this
/// provider cannot serve this request"; the resolver moves on to the next
/// provider. Any other error aborts the whole pass.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(
        &self,
        entry: &Entry,
        config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>>;

    fn config_schema(&self) -> Option<ConfigSchema> {
        None
    }
}
