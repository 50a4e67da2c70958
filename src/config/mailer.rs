use crate::utils::error::{MonitorError, Result};
use crate::utils::validation::{require_env, validate_non_empty_string, Validate};

pub const ENV_SENDER_ADDRESS: &str = "EMAIL_ADDRESS";
pub const ENV_SENDER_CREDENTIAL: &str = "EMAIL_PASSWORD";
pub const ENV_SMTP_HOST: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";

/// SMTP 寄件設定；寄件地址同時作為登入帳號
#[derive(Clone, PartialEq, Eq)]
pub struct MailerConfig {
    pub sender_address: String,
    pub sender_credential: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl std::fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerConfig")
            .field("sender_address", &self.sender_address)
            .field("sender_credential", &"***")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .finish()
    }
}

impl MailerConfig {
    pub fn from_env() -> Result<Self> {
        let port = require_env(ENV_SMTP_PORT)?;
        let smtp_port = port
            .parse::<u16>()
            .map_err(|e| MonitorError::InvalidConfigValueError {
                field: ENV_SMTP_PORT.to_string(),
                value: port.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            sender_address: require_env(ENV_SENDER_ADDRESS)?,
            sender_credential: require_env(ENV_SENDER_CREDENTIAL)?,
            smtp_host: require_env(ENV_SMTP_HOST)?,
            smtp_port,
        })
    }
}

impl Validate for MailerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string(ENV_SENDER_ADDRESS, &self.sender_address)?;
        validate_non_empty_string(ENV_SENDER_CREDENTIAL, &self.sender_credential)?;
        validate_non_empty_string(ENV_SMTP_HOST, &self.smtp_host)?;
        if self.smtp_port == 0 {
            return Err(MonitorError::InvalidConfigValueError {
                field: ENV_SMTP_PORT.to_string(),
                value: "0".to_string(),
                reason: "Port must be between 1 and 65535".to_string(),
            });
        }
        Ok(())
    }
}
