use std::path::PathBuf;
use thiserror::Error;

/// 單一網址抓取失敗；`status_code` 為 0 代表完全無法連線
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to fetch {url} (HTTP status {status_code}): {reason}")]
pub struct FetchFailure {
    pub url: String,
    pub status_code: u16,
    pub reason: String,
}

impl FetchFailure {
    pub fn unreachable(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            status_code: 0,
            reason: reason.into(),
        }
    }

    pub fn http_status(url: &str, status_code: u16) -> Self {
        Self {
            url: url.to_string(),
            status_code,
            reason: "non-success HTTP status".to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Fetch(#[from] FetchFailure),

    #[error("Snapshot storage error at {}: {source}", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot at {} is not readable: {source}", .path.display())]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("SMTP delivery failed: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),

    #[error("Email message could not be built: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Storage,
    Delivery,
    Configuration,
    Input,
}

impl MonitorError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) => ErrorCategory::Fetch,
            Self::Storage { .. } | Self::SnapshotFormat { .. } => ErrorCategory::Storage,
            Self::Delivery(_) | Self::MessageBuild(_) | Self::Address { .. } => {
                ErrorCategory::Delivery
            }
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. }
            | Self::HttpClient(_) => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::Input,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Fetch => "Check that the website is online and the URL is correct",
            ErrorCategory::Storage => {
                "Check permissions and free space for the snapshot directory"
            }
            ErrorCategory::Delivery => {
                "Verify the SMTP server, port, sender credentials and recipient addresses"
            }
            ErrorCategory::Configuration => {
                "Set EMAIL_ADDRESS, EMAIL_PASSWORD, SMTP_SERVER and SMTP_PORT; check monitor.toml"
            }
            ErrorCategory::Input => "Make sure both list files exist and are readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
