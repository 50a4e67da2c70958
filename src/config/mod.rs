pub mod mailer;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::site_lists::{DEFAULT_RECIPIENTS_FILE, DEFAULT_WEBSITES_FILE};
#[cfg(feature = "cli")]
use crate::config::toml_config::DEFAULT_CONFIG_FILE;
#[cfg(feature = "cli")]
use clap::Parser;

/// Invoked with no flags, reads `websites.txt` and `recipients.txt` from the
/// working directory and performs one pass.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "site-watch")]
#[command(about = "Watch web pages for textual changes and email a recipient list")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_WEBSITES_FILE)]
    pub websites: String,

    #[arg(long, default_value = DEFAULT_RECIPIENTS_FILE)]
    pub recipients: String,

    #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Optional TOML settings file")]
    pub config: String,

    #[arg(long, help = "Override storage.snapshot_dir from the settings file")]
    pub snapshot_dir: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_uses_working_directory_files() {
        let config = CliConfig::parse_from(["site-watch"]);
        assert_eq!(config.websites, "websites.txt");
        assert_eq!(config.recipients, "recipients.txt");
        assert_eq!(config.config, "monitor.toml");
        assert!(config.snapshot_dir.is_none());
        assert!(!config.verbose);
        assert!(!config.json_logs);
    }

    #[test]
    fn test_overrides() {
        let config = CliConfig::parse_from([
            "site-watch",
            "--websites",
            "lists/urls.txt",
            "--snapshot-dir",
            "/tmp/snaps",
            "--verbose",
            "--json-logs",
        ]);
        assert_eq!(config.websites, "lists/urls.txt");
        assert_eq!(config.snapshot_dir.as_deref(), Some("/tmp/snaps"));
        assert!(config.verbose);
        assert!(config.json_logs);
    }
}
