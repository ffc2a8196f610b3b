use thiserror::Error;

/// Failure of a single provider to serve a single search request.
///
/// Always recoverable from the resolver's point of view: the provider is
/// skipped for the current entry and the next one in the catalog is tried.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider `{provider}` unavailable: {message}")]
    Unavailable { provider: String, message: String },

    #[error("provider `{provider}` timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    #[error("provider `{provider}` returned a bad response: {message}")]
    BadResponse { provider: String, message: String },

    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Unknown provider: {name}")]
    UnknownProvider { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(reqwest::Error),

    #[error("Configuration error in `{field}`: {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration `{field}`")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Provider,
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ResolverError {
    /// Errors the resolver swallows by moving on to the next provider.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ResolverError::Provider(_) | ResolverError::UnknownProvider { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolverError::Provider(_) | ResolverError::UnknownProvider { .. } => {
                ErrorCategory::Provider
            }
            ResolverError::Http(_) | ResolverError::Io(_) => ErrorCategory::Io,
            ResolverError::Serialization(_) => ErrorCategory::Data,
            ResolverError::ConfigValidation { .. }
            | ResolverError::InvalidConfigValue { .. }
            | ResolverError::MissingConfig { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Provider => ErrorSeverity::Low,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ResolverError::Provider(_) => "Check that the provider's endpoint is reachable",
            ResolverError::UnknownProvider { .. } => {
                "Add a [sources.<name>] section for every provider listed in resolver.providers"
            }
            ResolverError::Io(_) => "Check that the input and output paths exist and are writable",
            ResolverError::Serialization(_) => {
                "Make sure the entry file is a JSON array of entries"
            }
            ResolverError::Http(_) => "Check TLS and proxy settings of the host",
            ResolverError::ConfigValidation { .. }
            | ResolverError::InvalidConfigValue { .. }
            | ResolverError::MissingConfig { .. } => "Fix the configuration file and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Io => format!("Could not read or write data: {}", self),
            ErrorCategory::Data => format!("Entry data is malformed: {}", self),
            ErrorCategory::Provider => format!("Search provider failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
