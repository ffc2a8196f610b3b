use crate::core::catalog::{ProviderCatalog, ProviderRegistry};
use crate::core::resolver::EntryResolver;
use crate::core::{ConfigProvider, Entry, Storage};
use crate::domain::model::ResolutionReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Loads a batch of entries, resolves it and writes the batch back out.
pub struct ResolutionEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    resolver: EntryResolver,
    monitor: SystemMonitor,
}

impl<S: Storage, C: ConfigProvider> ResolutionEngine<S, C> {
    pub fn new(storage: S, config: C, registry: ProviderRegistry) -> Self {
        Self::new_with_monitoring(storage, config, registry, false)
    }

    pub fn new_with_monitoring(
        storage: S,
        config: C,
        registry: ProviderRegistry,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            storage,
            config,
            resolver: EntryResolver::new(registry),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_abort_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.resolver = self.resolver.with_abort_flag(flag);
        self
    }

    pub async fn run(&self) -> Result<ResolutionReport> {
        self.monitor.log_phase("Resolution started");

        let raw = self.storage.read_file(self.config.input_path()).await?;
        let mut entries: Vec<Entry> = serde_json::from_slice(&raw)?;
        tracing::info!(
            "Loaded {} entries from {}",
            entries.len(),
            self.config.input_path()
        );

        let catalog = ProviderCatalog::new(self.config.providers().to_vec());
        let report = self
            .resolver
            .resolve(&mut entries, &catalog, self.config.test_mode())
            .await?;

        if report.skipped {
            tracing::info!("Test mode, leaving {} untouched", self.config.output_path());
        } else {
            let output = serde_json::to_vec_pretty(&entries)?;
            self.storage
                .write_file(self.config.output_path(), &output)
                .await?;
            tracing::info!(
                "Wrote {} entries to {}",
                entries.len(),
                self.config.output_path()
            );
        }

        self.monitor.log_report(&report);
        Ok(report)
    }
}
