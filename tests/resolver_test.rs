use async_trait::async_trait;
use entry_resolver::domain::model::{ProviderConfig, SEARCH_FAILED};
use entry_resolver::{
    Entry, EntryResolver, ProviderCatalog, ProviderEntry, ProviderError, ProviderRegistry,
    Resolution, ResolverError, Result, SearchProvider, SearchResult, StaticProvider,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

type CallLog = Arc<Mutex<Vec<String>>>;

/// Records every call, then answers with fixed results.
struct RecordingProvider {
    name: String,
    log: CallLog,
    results: Vec<SearchResult>,
}

impl RecordingProvider {
    fn new(name: &str, log: &CallLog, results: Vec<SearchResult>) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            results,
        }
    }
}

#[async_trait]
impl SearchProvider for RecordingProvider {
    async fn search(
        &self,
        entry: &Entry,
        config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        let suffix = config.map(|c| format!(" {}", c)).unwrap_or_default();
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}{}", self.name, entry.title, suffix));
        Ok(self.results.clone())
    }
}

struct FailingProvider {
    log: CallLog,
}

#[async_trait]
impl SearchProvider for FailingProvider {
    async fn search(
        &self,
        entry: &Entry,
        _config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        self.log.lock().unwrap().push(format!("failing:{}", entry.title));
        Err(ProviderError::Unavailable {
            provider: "failing".to_string(),
            message: "connection refused".to_string(),
        }
        .into())
    }
}

struct MisconfiguredProvider;

#[async_trait]
impl SearchProvider for MisconfiguredProvider {
    async fn search(
        &self,
        _entry: &Entry,
        _config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        Err(ResolverError::MissingConfig {
            field: "sources.broken.endpoint".to_string(),
        })
    }
}

/// Raises the abort flag while serving its first search.
struct AbortingProvider {
    flag: Arc<AtomicBool>,
}

#[async_trait]
impl SearchProvider for AbortingProvider {
    async fn search(
        &self,
        entry: &Entry,
        _config: Option<&ProviderConfig>,
    ) -> Result<Vec<SearchResult>> {
        self.flag.store(true, Ordering::SeqCst);
        Ok(vec![SearchResult::new(entry.title.clone(), "http://x/aborting")])
    }
}

fn bare(names: &[&str]) -> ProviderCatalog {
    names
        .iter()
        .map(|n| ProviderEntry::Bare(n.to_string()))
        .collect()
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn assert_terminal_state(entry: &Entry) {
    let resolved = entry.url.is_some() && entry.rejection.is_none();
    let rejected = entry.url.is_none()
        && entry.rejection.as_deref() == Some(SEARCH_FAILED)
        && !entry.immortal;
    assert!(
        resolved ^ rejected,
        "entry `{}` in mixed state: {:?}",
        entry.title,
        entry
    );
}

#[tokio::test]
async fn test_empty_first_provider_falls_through() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new()
        .with("a", RecordingProvider::new("a", &log, vec![]))
        .with(
            "b",
            RecordingProvider::new("b", &log, vec![SearchResult::new("Exact.Title", "http://x/1")]),
        );

    let mut entries = vec![Entry::new("Exact.Title")];
    let report = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a", "b"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://x/1"));
    assert_eq!(calls(&log), vec!["a:Exact.Title", "b:Exact.Title"]);
    assert_eq!(
        report.outcomes,
        vec![Resolution::Resolved {
            title: "Exact.Title".to_string(),
            provider: "b".to_string(),
            url: "http://x/1".to_string(),
            score: 1.0,
        }]
    );
}

#[tokio::test]
async fn test_provider_error_is_skipped() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new()
        .with("a", FailingProvider { log: log.clone() })
        .with(
            "b",
            RecordingProvider::new(
                "b",
                &log,
                vec![SearchResult::new("Some.Movie.2016.1080p.", "http://x/movie")],
            ),
        );

    let mut entries = vec![Entry::new("Some.Movie.2016.1080p")];
    let report = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a", "b"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://x/movie"));
    assert_eq!(entries[0].rejection, None);
    assert_eq!(report.provider_failures, 1);
    assert_eq!(calls(&log).len(), 2);
}

#[tokio::test]
async fn test_unknown_provider_is_skipped() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new().with(
        "known",
        RecordingProvider::new("known", &log, vec![SearchResult::new("Title", "http://x/t")]),
    );

    let mut entries = vec![Entry::new("Title")];
    let report = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["ghost", "known"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://x/t"));
    assert_eq!(report.provider_failures, 1);
}

#[tokio::test]
async fn test_first_match_stops_the_search() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new()
        .with(
            "a",
            RecordingProvider::new("a", &log, vec![SearchResult::new("Title", "http://a/1")]),
        )
        .with(
            "b",
            RecordingProvider::new("b", &log, vec![SearchResult::new("Title", "http://b/1")]),
        );

    let mut entries = vec![Entry::new("Title")];
    EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a", "b"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://a/1"));
    assert_eq!(calls(&log), vec!["a:Title"]);
}

#[tokio::test]
async fn test_no_match_rejects_and_clears_immortal() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new().with(
        "a",
        RecordingProvider::new(
            "a",
            &log,
            vec![SearchResult::new("Completely Different Title", "http://x/1")],
        ),
    );

    let mut entries = vec![Entry::new("Movie.720p.WEB-DL.X264.AC3").with_immortal(true)];
    let report = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url, None);
    assert_eq!(entries[0].rejection.as_deref(), Some(SEARCH_FAILED));
    assert!(!entries[0].immortal);
    assert_eq!(report.rejected(), 1);
}

#[tokio::test]
async fn test_weight_order_beats_similarity() {
    let log = CallLog::default();
    // Returned in ascending weight; the heavier one is the slightly worse title.
    let results = vec![
        SearchResult::weighted("Exact.Title.2016", "http://x/identical", 1.0),
        SearchResult::weighted("Exact.Title.2016.", "http://x/heavier", 2.0),
    ];
    let registry = ProviderRegistry::new().with("a", RecordingProvider::new("a", &log, results));

    let mut entries = vec![Entry::new("Exact.Title.2016")];
    EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://x/heavier"));
}

#[tokio::test]
async fn test_unweighted_results_are_tried_last() {
    let log = CallLog::default();
    let results = vec![
        SearchResult::new("Exact.Title", "http://x/unweighted"),
        SearchResult::weighted("Exact.Title", "http://x/weighted", 0.5),
    ];
    let registry = ProviderRegistry::new().with("a", RecordingProvider::new("a", &log, results));

    let mut entries = vec![Entry::new("Exact.Title")];
    EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://x/weighted"));
}

#[tokio::test]
async fn test_test_mode_touches_nothing() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new().with(
        "a",
        RecordingProvider::new("a", &log, vec![SearchResult::new("Title", "http://x/1")]),
    );

    let original = vec![
        Entry::new("Title").with_immortal(true),
        Entry::new("Other").with_url("http://old/2"),
    ];
    let mut entries = original.clone();
    let report = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a"]), true)
        .await
        .unwrap();

    assert!(report.skipped);
    assert_eq!(entries, original);
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn test_empty_catalog_rejects_everything() {
    let mut entries = vec![
        Entry::new("One").with_immortal(true),
        Entry::new("Two").with_url("http://old/2"),
    ];
    let report = EntryResolver::new(ProviderRegistry::new())
        .resolve(&mut entries, &ProviderCatalog::default(), false)
        .await
        .unwrap();

    assert_eq!(report.rejected(), 2);
    for entry in &entries {
        assert_eq!(entry.rejection.as_deref(), Some(SEARCH_FAILED));
        assert_terminal_state(entry);
    }
}

#[tokio::test]
async fn test_existing_url_is_re_resolved() {
    let registry = ProviderRegistry::new().with(
        "a",
        StaticProvider::new(vec![SearchResult::new("Title", "http://new/1")]),
    );

    let mut entries = vec![Entry::new("Title").with_url("http://old/1")];
    EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["a"]), false)
        .await
        .unwrap();

    assert_eq!(entries[0].url.as_deref(), Some("http://new/1"));
}

#[tokio::test]
async fn test_every_entry_ends_in_one_terminal_state() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new()
        .with("failing", FailingProvider { log: log.clone() })
        .with(
            "a",
            RecordingProvider::new(
                "a",
                &log,
                vec![
                    SearchResult::weighted("Show.S01E01.720p", "http://x/s01e01", 3.0),
                    SearchResult::weighted("Show.S02E05.720p", "http://x/s02e05", 2.0),
                    SearchResult::new("Film.2019.1080p", "http://x/film"),
                ],
            ),
        );

    let mut entries = vec![
        Entry::new("Show.S02E05.720p"),
        Entry::new("Film.2019.1080p").with_immortal(true),
        Entry::new("Nothing.Like.It").with_immortal(true),
        Entry::new("").with_url("http://old/empty"),
    ];
    let report = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["failing", "a"]), false)
        .await
        .unwrap();

    for entry in &entries {
        assert_terminal_state(entry);
    }
    assert_eq!(entries[0].url.as_deref(), Some("http://x/s02e05"));
    assert_eq!(entries[1].url.as_deref(), Some("http://x/film"));
    assert!(entries[1].immortal);
    assert!(entries[2].is_rejected());
    assert!(entries[3].is_rejected());
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.provider_failures, 4);
}

#[tokio::test]
async fn test_provider_order_is_deterministic() {
    let log = CallLog::default();
    let registry = ProviderRegistry::new()
        .with("z", RecordingProvider::new("z", &log, vec![]))
        .with("a", RecordingProvider::new("a", &log, vec![]))
        .with("m", RecordingProvider::new("m", &log, vec![]));
    let catalog = ProviderCatalog::new(vec![
        ProviderEntry::Bare("z".to_string()),
        ProviderEntry::Configured("a".to_string(), json!({"category": "tv"})),
        ProviderEntry::Bare("m".to_string()),
    ]);
    let resolver = EntryResolver::new(registry);

    let mut first = vec![Entry::new("One"), Entry::new("Two")];
    resolver.resolve(&mut first, &catalog, false).await.unwrap();
    let first_calls = calls(&log);
    log.lock().unwrap().clear();

    let mut second = vec![Entry::new("One"), Entry::new("Two")];
    resolver.resolve(&mut second, &catalog, false).await.unwrap();

    assert_eq!(first_calls, calls(&log));
    assert_eq!(
        first_calls,
        vec![
            "z:One",
            r#"a:One {"category":"tv"}"#,
            "m:One",
            "z:Two",
            r#"a:Two {"category":"tv"}"#,
            "m:Two",
        ]
    );
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_non_recoverable_error_aborts_pass() {
    let registry = ProviderRegistry::new().with("broken", MisconfiguredProvider);

    let mut entries = vec![Entry::new("Title")];
    let result = EntryResolver::new(registry)
        .resolve(&mut entries, &bare(&["broken"]), false)
        .await;

    assert!(matches!(result, Err(ResolverError::MissingConfig { .. })));
    assert!(!entries[0].is_rejected());
}

#[tokio::test]
async fn test_abort_flag_stops_between_entries() {
    let flag = Arc::new(AtomicBool::new(false));
    let registry = ProviderRegistry::new().with("a", AbortingProvider { flag: flag.clone() });

    let mut entries = vec![Entry::new("First"), Entry::new("Second")];
    let report = EntryResolver::new(registry)
        .with_abort_flag(flag)
        .resolve(&mut entries, &bare(&["a"]), false)
        .await
        .unwrap();

    assert!(report.aborted);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(entries[0].url.as_deref(), Some("http://x/aborting"));
    assert_eq!(entries[1], Entry::new("Second"));
}
