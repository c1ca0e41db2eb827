use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use sms_aws_sns::SnsConfig;
use std::env;

pub use sms_core::HttpConfig;

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Outbound HTTP configuration
    pub http: HttpConfig,
    /// SMS gateways configuration
    pub gateways: GatewaysConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// SMS gateways configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GatewaysConfig {
    /// AWS SNS configuration
    pub aws_sns: Option<SnsConfig>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level or filter directive (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(Config::try_from(&AppConfig::default())?)
            // Add configuration file based on environment
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local configuration file (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SMSGATE__)
            .add_source(Environment::with_prefix("SMSGATE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            gateways: GatewaysConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.http.timeout(), Duration::from_secs(30));
        assert!(cfg.http.follow_redirects);
        assert!(cfg.http.user_agent.starts_with("smsgate/"));
        assert!(cfg.gateways.aws_sns.is_none());
        assert_eq!(cfg.logging.format, "json");
    }

    #[test]
    fn gateways_section_deserializes() {
        let cfg: AppConfig = Config::builder()
            .set_override("gateways.aws_sns.region", "eu-west-1")
            .unwrap()
            .set_override("gateways.aws_sns.access_key", "AKID")
            .unwrap()
            .set_override("gateways.aws_sns.secret_key", "secret")
            .unwrap()
            .set_override("gateways.aws_sns.sender_id", "ACME")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let sns = cfg.gateways.aws_sns.unwrap();
        assert_eq!(sns.region, "eu-west-1");
        assert_eq!(sns.sender_id, "ACME");
        assert!(sns.sms_type.is_none());
        assert_eq!(cfg.http.timeout_seconds, 30);
    }

    #[test]
    fn http_section_overrides() {
        let cfg: AppConfig = Config::builder()
            .set_override("http.follow_redirects", false)
            .unwrap()
            .set_override("http.timeout_seconds", 5)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(!cfg.http.follow_redirects);
        assert_eq!(cfg.http.timeout(), Duration::from_secs(5));
        assert!(cfg.http.user_agent.starts_with("smsgate/"));
    }
}
