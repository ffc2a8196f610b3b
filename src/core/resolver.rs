use crate::core::catalog::{ProviderCatalog, ProviderRegistry};
use crate::core::similarity::{TitleMatcher, ACCEPTANCE_THRESHOLD};
use crate::domain::model::{
    Entry, ProviderEntry, Resolution, ResolutionReport, SearchResult, SEARCH_FAILED,
};
use crate::utils::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Finds a download URL for entries by asking providers in catalog order.
///
/// Entries are handled one after another, and providers for an entry one
/// after another; the first provider that yields a close enough title wins.
/// Entries nobody can match are rejected with `"search failed"` and lose
/// their immortal flag.
#[derive(Debug, Clone)]
pub struct EntryResolver {
    registry: ProviderRegistry,
    abort: Option<Arc<AtomicBool>>,
}

impl EntryResolver {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            abort: None,
        }
    }

    /// Flag checked between entries; once set, remaining entries are left as they are.
    pub fn with_abort_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abort = Some(flag);
        self
    }

    /// Resolves every entry in place. Only non-recoverable provider errors
    /// are returned; anything else ends up in the entries and the report.
    pub async fn resolve(
        &self,
        entries: &mut [Entry],
        catalog: &ProviderCatalog,
        test_mode: bool,
    ) -> Result<ResolutionReport> {
        let mut report = ResolutionReport::begin();

        if test_mode {
            tracing::info!("Test mode, not searching for {} entries", entries.len());
            report.skipped = true;
            return Ok(report.finish());
        }

        let total = entries.len();
        for entry in entries.iter_mut() {
            if self.is_aborted() {
                tracing::warn!(
                    "Resolution aborted after {} of {} entries",
                    report.outcomes.len(),
                    total
                );
                report.aborted = true;
                break;
            }

            let outcome = self
                .resolve_entry(entry, catalog, &mut report.provider_failures)
                .await?;
            report.outcomes.push(outcome);
        }

        let report = report.finish();
        tracing::info!(
            "Resolved {} entries, rejected {} ({} provider failures skipped)",
            report.resolved(),
            report.rejected(),
            report.provider_failures
        );
        Ok(report)
    }

    async fn resolve_entry(
        &self,
        entry: &mut Entry,
        catalog: &ProviderCatalog,
        failures: &mut usize,
    ) -> Result<Resolution> {
        let matcher = TitleMatcher::new(&entry.title);

        for step in catalog.iter() {
            tracing::debug!("Searching `{}` from {}", entry.title, step.name());

            let results = match self.search(step, entry).await {
                Ok(results) => results,
                Err(e) if e.is_recoverable() => {
                    tracing::debug!("Failed: {}", e);
                    *failures += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if let Some((result, score)) = select_match(&matcher, results) {
                tracing::debug!("Found url: {} (similarity {:.3})", result.url, score);
                entry.set_url(result.url.clone());
                return Ok(Resolution::Resolved {
                    title: entry.title.clone(),
                    provider: step.name().to_string(),
                    url: result.url,
                    score,
                });
            }
        }

        entry.immortal = false;
        entry.reject(SEARCH_FAILED);
        tracing::info!("Rejecting `{}`: {}", entry.title, SEARCH_FAILED);
        Ok(Resolution::Rejected {
            title: entry.title.clone(),
        })
    }

    async fn search(&self, step: &ProviderEntry, entry: &Entry) -> Result<Vec<SearchResult>> {
        let provider = self.registry.get(step.name())?;
        provider.search(entry, step.config()).await
    }

    fn is_aborted(&self) -> bool {
        self.abort
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

/// Picks the first result, in descending weight order, whose title clears
/// the acceptance threshold. Similarity filters; it does not rank.
pub fn select_match(
    matcher: &TitleMatcher,
    mut results: Vec<SearchResult>,
) -> Option<(SearchResult, f64)> {
    results.sort_by(SearchResult::by_weight_desc);
    results.into_iter().find_map(|result| {
        let score = matcher.ratio(&result.title);
        (score > ACCEPTANCE_THRESHOLD).then_some((result, score))
    })
}
