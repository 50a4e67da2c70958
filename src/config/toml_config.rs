use crate::adapters::fetcher::DEFAULT_USER_AGENT;
use crate::adapters::snapshot_store::DEFAULT_SNAPSHOT_DIR;
use crate::core::detector::{ChangeDetector, SpanGranularity, DEFAULT_THRESHOLD};
use crate::core::keywords::{default_categories, KeywordCategory};
use crate::core::monitor::PolitenessDelay;
use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "monitor.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub detector: DetectorSettings,
    pub fetch: FetchSettings,
    pub schedule: ScheduleSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorSettings {
    pub threshold: usize,
    pub granularity: SpanGranularity,
    pub report_keywords: bool,
    pub keywords: Vec<KeywordCategory>,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            granularity: SpanGranularity::default(),
            report_keywords: true,
            keywords: default_categories(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub user_agent: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub min_delay_seconds: f64,
    pub max_delay_seconds: f64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            min_delay_seconds: 1.0,
            max_delay_seconds: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub snapshot_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_dir: DEFAULT_SNAPSHOT_DIR.to_string(),
        }
    }
}

impl MonitorSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MonitorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 設定檔不存在時使用預設值
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("📁 Loading settings from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MonitorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNAPSHOT_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MonitorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn detector(&self) -> ChangeDetector {
        ChangeDetector::new(
            self.detector.threshold,
            self.detector.granularity,
            self.detector.keywords.clone(),
        )
    }

    pub fn delay(&self) -> Result<PolitenessDelay> {
        Ok(PolitenessDelay {
            min: delay_duration("schedule.min_delay_seconds", self.schedule.min_delay_seconds)?,
            max: delay_duration("schedule.max_delay_seconds", self.schedule.max_delay_seconds)?,
        })
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch.timeout_seconds.map(Duration::from_secs)
    }
}

fn delay_duration(field: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|e| MonitorError::InvalidConfigValueError {
        field: field.to_string(),
        value: seconds.to_string(),
        reason: e.to_string(),
    })
}

impl Validate for MonitorSettings {
    fn validate(&self) -> Result<()> {
        validate_positive_number("detector.threshold", self.detector.threshold, 1)?;

        for category in &self.detector.keywords {
            validate_non_empty_string("detector.keywords.name", &category.name)?;
            if !category.patterns.iter().any(|p| !p.is_empty()) {
                return Err(MonitorError::InvalidConfigValueError {
                    field: "detector.keywords.patterns".to_string(),
                    value: category.name.clone(),
                    reason: "Category needs at least one non-empty pattern".to_string(),
                });
            }
        }

        let (min, max) = (
            self.schedule.min_delay_seconds,
            self.schedule.max_delay_seconds,
        );
        if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
            return Err(MonitorError::InvalidConfigValueError {
                field: "schedule".to_string(),
                value: format!("{}..{}", min, max),
                reason: "Delays must satisfy 0 <= min_delay_seconds <= max_delay_seconds"
                    .to_string(),
            });
        }
        self.delay()?;

        validate_non_empty_string("fetch.user_agent", &self.fetch.user_agent)?;
        if self.fetch.timeout_seconds == Some(0) {
            return Err(MonitorError::InvalidConfigValueError {
                field: "fetch.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        validate_path("storage.snapshot_dir", &self.storage.snapshot_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = MonitorSettings::from_toml_str("").unwrap();
        assert_eq!(settings.detector.threshold, 3);
        assert_eq!(settings.detector.granularity, SpanGranularity::Aggregated);
        assert!(settings.detector.report_keywords);
        assert_eq!(settings.detector.keywords, default_categories());
        assert_eq!(settings.storage.snapshot_dir, "website_snapshots");
        assert_eq!(settings.delay().unwrap(), PolitenessDelay::default());
        assert!(settings.fetch_timeout().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_parse_full_settings() {
        let toml_content = r#"
[detector]
threshold = 5
granularity = "per_region"
report_keywords = false

[[detector.keywords]]
name = "job_market"
patterns = ["job market paper", "jmp"]

[fetch]
user_agent = "dept-watch/1.0"
timeout_seconds = 20

[schedule]
min_delay_seconds = 0.0
max_delay_seconds = 0.5

[storage]
snapshot_dir = "./snapshots"
"#;

        let settings = MonitorSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.detector.threshold, 5);
        assert_eq!(settings.detector.granularity, SpanGranularity::PerRegion);
        assert!(!settings.detector.report_keywords);
        assert_eq!(settings.detector.keywords.len(), 1);
        assert_eq!(settings.detector.keywords[0].name, "job_market");
        assert_eq!(settings.fetch_timeout(), Some(Duration::from_secs(20)));
        assert_eq!(settings.delay().unwrap().max, Duration::from_millis(500));
        assert!(settings.validate().is_ok());

        let detector = settings.detector();
        assert_eq!(detector.threshold(), 5);
        assert_eq!(detector.categories()[0].patterns, vec!["job market paper", "jmp"]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SITE_WATCH_TEST_SNAPSHOT_DIR", "/var/lib/site-watch");

        let toml_content = r#"
[storage]
snapshot_dir = "${SITE_WATCH_TEST_SNAPSHOT_DIR}"
"#;

        let settings = MonitorSettings::from_toml_str(toml_content).unwrap();
        assert_eq!(settings.storage.snapshot_dir, "/var/lib/site-watch");

        std::env::remove_var("SITE_WATCH_TEST_SNAPSHOT_DIR");
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let zero_threshold =
            MonitorSettings::from_toml_str("[detector]\nthreshold = 0\n").unwrap();
        assert!(zero_threshold.validate().is_err());

        let inverted = MonitorSettings::from_toml_str(
            "[schedule]\nmin_delay_seconds = 3.0\nmax_delay_seconds = 1.0\n",
        )
        .unwrap();
        assert!(inverted.validate().is_err());

        let empty_patterns = MonitorSettings::from_toml_str(
            "[[detector.keywords]]\nname = \"x\"\npatterns = [\"\"]\n",
        )
        .unwrap();
        assert!(empty_patterns.validate().is_err());

        assert!(MonitorSettings::from_toml_str("[detector]\nthreshold = \"three\"\n").is_err());
    }

    #[test]
    fn test_unrepresentable_delay_is_a_config_error() {
        let settings = MonitorSettings::from_toml_str(
            "[schedule]\nmin_delay_seconds = 1.0\nmax_delay_seconds = 1e20\n",
        )
        .unwrap();

        let err = settings.validate().unwrap_err();
        assert!(matches!(
            err,
            MonitorError::InvalidConfigValueError { ref field, .. }
                if field == "schedule.max_delay_seconds"
        ));
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(settings.delay().is_err());
    }

    #[test]
    fn test_load_or_default() {
        let missing =
            MonitorSettings::load_or_default("/definitely/not/here/monitor.toml").unwrap();
        assert_eq!(missing.detector.threshold, 3);

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[detector]\nthreshold = 4\n")
            .unwrap();
        let loaded = MonitorSettings::load_or_default(temp_file.path()).unwrap();
        assert_eq!(loaded.detector.threshold, 4);
    }
}
