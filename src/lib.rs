pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::fetcher::HttpFetcher;
pub use adapters::mailer::SmtpNotifier;
pub use adapters::snapshot_store::FileSnapshotStore;
pub use config::{mailer::MailerConfig, toml_config::MonitorSettings};
pub use crate::core::{detector::ChangeDetector, monitor::SiteMonitor};
pub use utils::error::{FetchFailure, MonitorError, Result};
