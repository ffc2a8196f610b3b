use crate::domain::model::{ProviderConfig, ProviderEntry};
use crate::domain::ports::SearchProvider;
use crate::utils::error::{ResolverError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Named search providers available to a run.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: SearchProvider + 'static>(&mut self, name: impl Into<String>, provider: P) {
        self.register_arc(name, Arc::new(provider));
    }

    pub fn register_arc(&mut self, name: impl Into<String>, provider: Arc<dyn SearchProvider>) {
        let name = name.into();
        if self.providers.insert(name.clone(), provider).is_some() {
            tracing::warn!("Provider `{}` registered twice, keeping the latest", name);
        }
    }

    pub fn with<P: SearchProvider + 'static>(
        mut self,
        name: impl Into<String>,
        provider: P,
    ) -> Self {
        self.register(name, provider);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn SearchProvider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| ResolverError::UnknownProvider {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Priority-ordered providers to try for each entry, earliest first.
///
/// Names are looked up in the registry only when a step is reached, so
/// building a catalog never fails because of a missing provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderCatalog {
    entries: Vec<ProviderEntry>,
}

impl ProviderCatalog {
    pub fn new(entries: Vec<ProviderEntry>) -> Self {
        Self { entries }
    }

    /// Normalizes a configured list where every item is either a bare
    /// provider name or a single-key table `{ name = config }`.
    pub fn from_config_list(items: &[ProviderConfig]) -> Result<Self> {
        let entries = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_entry(index, item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up-front check of every step against the registry: unknown names and
    /// configurations that do not fit the provider's schema.
    pub fn check(&self, registry: &ProviderRegistry) -> Vec<ResolverError> {
        let mut issues = Vec::new();

        for (index, step) in self.entries.iter().enumerate() {
            let field = format!("resolver.providers[{}]", index);
            let provider = match registry.get(step.name()) {
                Ok(provider) => provider,
                Err(e) => {
                    issues.push(e);
                    continue;
                }
            };

            match (provider.config_schema(), step.config()) {
                (None, Some(config)) => issues.push(ResolverError::InvalidConfigValue {
                    field,
                    value: config.to_string(),
                    reason: format!("provider `{}` takes no configuration", step.name()),
                }),
                (Some(schema), None) if schema.required => {
                    issues.push(ResolverError::MissingConfig {
                        field: format!("{}.{}", field, step.name()),
                    })
                }
                (Some(schema), Some(config)) if !schema.kind.matches(config) => {
                    issues.push(ResolverError::InvalidConfigValue {
                        field,
                        value: config.to_string(),
                        reason: format!(
                            "provider `{}` expects a {:?} configuration",
                            step.name(),
                            schema.kind
                        ),
                    })
                }
                _ => {}
            }
        }

        issues
    }
}

impl FromIterator<ProviderEntry> for ProviderCatalog {
    fn from_iter<I: IntoIterator<Item = ProviderEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn parse_entry(index: usize, item: &ProviderConfig) -> Result<ProviderEntry> {
    let field = format!("resolver.providers[{}]", index);
    match item {
        serde_json::Value::String(name) if !name.trim().is_empty() => {
            Ok(ProviderEntry::Bare(name.clone()))
        }
        serde_json::Value::Object(map) if map.len() == 1 => {
            let (name, config) = map.iter().next().ok_or_else(|| ResolverError::MissingConfig {
                field: field.clone(),
            })?;
            Ok(ProviderEntry::Configured(name.clone(), config.clone()))
        }
        serde_json::Value::Object(map) => Err(ResolverError::InvalidConfigValue {
            field,
            value: item.to_string(),
            reason: format!("expected exactly one provider name per table, found {}", map.len()),
        }),
        _ => Err(ResolverError::InvalidConfigValue {
            field,
            value: item.to_string(),
            reason: "expected a provider name or a { name = config } table".to_string(),
        }),
    }
}
