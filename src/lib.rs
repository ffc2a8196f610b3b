pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::adapters::{HttpSearchProvider, LocalStorage, StaticProvider};
pub use crate::config::ResolverConfig;
pub use crate::core::{
    catalog::{ProviderCatalog, ProviderRegistry},
    engine::ResolutionEngine,
    resolver::EntryResolver,
    similarity::{ratio, ACCEPTANCE_THRESHOLD},
};
pub use crate::domain::model::{Entry, ProviderEntry, Resolution, ResolutionReport, SearchResult};
pub use crate::domain::ports::{ConfigSchema, SearchProvider, ValueKind};
pub use crate::utils::error::{ProviderError, ResolverError, Result};
