pub mod catalog;
pub mod engine;
pub mod resolver;
pub mod similarity;

pub use crate::domain::model::{Entry, ProviderEntry, SearchResult};
pub use crate::domain::ports::{ConfigProvider, SearchProvider, Storage};
pub use crate::utils::error::Result;
