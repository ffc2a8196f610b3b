use crate::adapters::http::DEFAULT_TIMEOUT_SECONDS;
use crate::adapters::{HttpSearchProvider, StaticProvider};
use crate::core::catalog::{ProviderCatalog, ProviderRegistry};
use crate::core::ConfigProvider;
use crate::domain::model::{ProviderEntry, SearchResult};
use crate::utils::error::{ResolverError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub resolver: ResolverSection,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
    pub io: IoConfig,
    pub monitoring: Option<MonitoringConfig>,
    #[serde(skip)]
    catalog: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSection {
    pub name: String,
    #[serde(default)]
    pub test_mode: bool,
    /// Bare names or single-key `{ name = config }` tables, highest priority first.
    #[serde(default)]
    pub providers: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceConfig {
    Http {
        endpoint: String,
        timeout_seconds: Option<u64>,
    },
    Static {
        #[serde(default)]
        results: Vec<SearchResult>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IoConfig {
    pub input_path: String,
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl ResolverConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| ResolverError::ConfigValidation {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        config.catalog = ProviderCatalog::from_config_list(&config.resolver.providers)?
            .entries()
            .to_vec();
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ResolverError::ConfigValidation {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_name("resolver.name", &self.resolver.name)?;
        validation::validate_batch_path("io.input_path", &self.io.input_path)?;
        validation::validate_batch_path("io.output_path", &self.io.output_path)?;

        for (name, source) in &self.sources {
            validation::validate_name("sources", name)?;
            if let SourceConfig::Http {
                endpoint,
                timeout_seconds,
            } = source
            {
                validation::validate_endpoint(&format!("sources.{}.endpoint", name), endpoint)?;
                if let Some(timeout) = timeout_seconds {
                    let field = format!("sources.{}.timeout_seconds", name);
                    validation::validate_timeout(&field, *timeout)?;
                }
            }
        }

        Ok(())
    }

    /// Instantiates one provider per `[sources.<name>]` section.
    pub fn build_registry(&self) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for (name, source) in &self.sources {
            match source {
                SourceConfig::Http {
                    endpoint,
                    timeout_seconds,
                } => {
                    let timeout = timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS);
                    let provider =
                        HttpSearchProvider::with_timeout(name.clone(), endpoint.clone(), timeout)?;
                    registry.register(name.clone(), provider);
                }
                SourceConfig::Static { results } => {
                    registry.register(name.clone(), StaticProvider::new(results.clone()));
                }
            }
        }
        Ok(registry)
    }

    pub fn catalog(&self) -> ProviderCatalog {
        ProviderCatalog::new(self.catalog.clone())
    }

    /// Problems `--check` reports: unknown provider names and configurations
    /// the named source does not accept.
    pub fn provider_issues(&self, registry: &ProviderRegistry) -> Vec<ResolverError> {
        self.catalog().check(registry)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for ResolverConfig {
    fn providers(&self) -> &[ProviderEntry] {
        &self.catalog
    }

    fn test_mode(&self) -> bool {
        self.resolver.test_mode
    }

    fn input_path(&self) -> &str {
        &self.io.input_path
    }

    fn output_path(&self) -> &str {
        &self.io.output_path
    }
}

impl Validate for ResolverConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
