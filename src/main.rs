use anyhow::Context;
use clap::Parser;
use site_watch::adapters::site_lists::{load_recipients_from_file, load_urls_from_file};
use site_watch::utils::{logger, validation::Validate};
use site_watch::{
    CliConfig, FileSnapshotStore, HttpFetcher, MailerConfig, MonitorError, MonitorSettings,
    SiteMonitor, SmtpNotifier,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting site-watch");
    tracing::debug!("CLI config: {:?}", config);

    match run(config).await {
        Ok(true) => {
            tracing::info!("✅ Monitoring pass completed");
        }
        Ok(false) => {
            tracing::error!("❌ Monitoring pass completed with failed sites");
            std::process::exit(1);
        }
        Err(e) => {
            if let Some(monitor_error) = e.downcast_ref::<MonitorError>() {
                tracing::error!(
                    "❌ Monitoring pass failed: {:#} (Category: {:?})",
                    e,
                    monitor_error.category()
                );
                tracing::error!("💡 Suggestion: {}", monitor_error.recovery_suggestion());
            } else {
                tracing::error!("❌ Monitoring pass failed: {:#}", e);
            }
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the pass finished but some sites could not be stored.
async fn run(config: CliConfig) -> anyhow::Result<bool> {
    // .env 不存在也沒關係
    let _ = dotenvy::dotenv();

    let mut settings = MonitorSettings::load_or_default(&config.config)
        .with_context(|| format!("Failed to load settings from '{}'", config.config))?;
    if let Some(dir) = config.snapshot_dir {
        settings.storage.snapshot_dir = dir;
    }
    settings.validate().context("Invalid monitor settings")?;

    let mailer_config = MailerConfig::from_env().context("SMTP configuration is incomplete")?;
    mailer_config.validate()?;
    tracing::debug!("Mailer config: {:?}", mailer_config);

    let urls = load_urls_from_file(&config.websites)
        .with_context(|| format!("Failed to read URL list '{}'", config.websites))?;
    let recipients = load_recipients_from_file(&config.recipients)
        .with_context(|| format!("Failed to read recipient list '{}'", config.recipients))?;
    tracing::info!(
        "📋 {} website(s), {} recipient(s)",
        urls.len(),
        recipients.len()
    );

    let fetcher = HttpFetcher::new(&settings.fetch.user_agent, settings.fetch_timeout())?;
    let store = FileSnapshotStore::new(&settings.storage.snapshot_dir);
    let notifier =
        SmtpNotifier::new(mailer_config)?.with_keywords(settings.detector.report_keywords);

    let monitor = SiteMonitor::new(fetcher, store, notifier)
        .with_detector(settings.detector())
        .with_delay(settings.delay()?);

    let summary = monitor.run(&urls, &recipients).await?;
    Ok(!summary.has_failures())
}
