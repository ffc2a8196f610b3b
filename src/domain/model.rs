use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Provider-specific configuration, passed through untouched to the provider.
pub type ProviderConfig = serde_json::Value;

/// Rejection reason recorded when no provider yields a match.
pub const SEARCH_FAILED: &str = "search failed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub immortal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl Entry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            immortal: false,
            rejection: None,
            fields: HashMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_immortal(mut self, immortal: bool) -> Self {
        self.immortal = immortal;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
        self.rejection = None;
    }

    pub fn reject(&mut self, reason: impl Into<String>) {
        self.url = None;
        self.rejection = Some(reason.into());
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// Query strings a provider should use for this entry. Falls back to the
    /// title when upstream did not supply a `search_strings` list.
    pub fn search_strings(&self) -> Vec<String> {
        let strings: Vec<String> = self
            .fields
            .get("search_strings")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|s| s.as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if strings.is_empty() {
            vec![self.title.clone()]
        } else {
            strings
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_weight: Option<f64>,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            sort_weight: None,
        }
    }

    pub fn weighted(title: impl Into<String>, url: impl Into<String>, weight: f64) -> Self {
        Self {
            sort_weight: Some(weight),
            ..Self::new(title, url)
        }
    }

    /// Descending by weight, unweighted results last. Meant for a stable sort.
    pub fn by_weight_desc(a: &SearchResult, b: &SearchResult) -> Ordering {
        match (a.sort_weight, b.sort_weight) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// One step of the provider priority list.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEntry {
    Bare(String),
    Configured(String, ProviderConfig),
}

impl ProviderEntry {
    pub fn name(&self) -> &str {
        match self {
            ProviderEntry::Bare(name) | ProviderEntry::Configured(name, _) => name,
        }
    }

    pub fn config(&self) -> Option<&ProviderConfig> {
        match self {
            ProviderEntry::Bare(_) => None,
            ProviderEntry::Configured(_, config) => Some(config),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Resolution {
    Resolved {
        title: String,
        provider: String,
        url: String,
        score: f64,
    },
    Rejected {
        title: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<Resolution>,
    pub provider_failures: usize,
    pub skipped: bool,
    pub aborted: bool,
}

impl ResolutionReport {
    pub fn begin() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            outcomes: Vec::new(),
            provider_failures: 0,
            skipped: false,
            aborted: false,
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    pub fn resolved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Resolution::Resolved { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, Resolution::Rejected { .. }))
            .count()
    }
}
