// Adapters layer: concrete search providers and storage backends.

pub mod http;
pub mod static_provider;
pub mod storage;

pub use http::HttpSearchProvider;
pub use static_provider::StaticProvider;
pub use storage::LocalStorage;
