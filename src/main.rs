use clap::Parser;
use entry_resolver::utils::error::ErrorSeverity;
use entry_resolver::utils::{logger, validation::Validate};
use entry_resolver::{CliArgs, LocalStorage, ResolutionEngine, ResolverConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    logger::init_logger(args.log_format, args.verbose);
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = match ResolverConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if args.test_mode {
        config.resolver.test_mode = true;
        tracing::info!("🔧 Test mode enabled from command line");
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let registry = config.build_registry()?;
    let issues = config.provider_issues(&registry);
    for issue in &issues {
        tracing::warn!("⚠️ {}", issue);
    }

    if args.check {
        if issues.is_empty() {
            println!("✅ Configuration OK ({} providers)", config.catalog().len());
            return Ok(());
        }
        eprintln!("❌ {} problem(s) in resolver.providers", issues.len());
        std::process::exit(1);
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let abort = Arc::new(AtomicBool::new(false));
    {
        let abort = abort.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping after the current entry");
                abort.store(true, Ordering::SeqCst);
            }
        });
    }

    let storage = LocalStorage::new(".");
    let engine = ResolutionEngine::new_with_monitoring(storage, config, registry, monitor_enabled)
        .with_abort_flag(abort);

    match engine.run().await {
        Ok(report) => {
            println!(
                "✅ Resolved {}, rejected {}{}",
                report.resolved(),
                report.rejected(),
                if report.aborted { " (aborted)" } else { "" }
            );
            if report.aborted {
                std::process::exit(130);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Resolution failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
