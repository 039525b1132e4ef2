//! Filter configuration: structs, parsing, and validation.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use domain::pipeline::{FilterSettings, SettingsError};

// ── Config errors ──────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(String),

    #[error("validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("invalid CIDR notation '{value}': {reason}")]
    InvalidCidr { value: String, reason: String },

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),
}

impl From<serde_yaml_ng::Error> for ConfigError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        Self::Yaml(e.to_string())
    }
}

// ── Logging enums ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Text,
}

// ── Top-level config ───────────────────────────────────────────────

/// Runtime configuration of the filter, loaded from YAML.
///
/// `interface` names the network device the external transport binds; it is
/// the one required field. Rate limiting parameters default to the same
/// values the command-line loader used (20 responses per second split over
/// 2 shards).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RrlConfig {
    pub interface: String,

    #[serde(default)]
    pub filter: FilterSettings,

    /// Files of excluded prefixes, one CIDR per line.
    #[serde(default)]
    pub exclude_files: Vec<PathBuf>,

    #[serde(default)]
    pub log_level: LogLevel,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl RrlConfig {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interface.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "interface".to_string(),
                message: "a network interface must be specified".to_string(),
            });
        }
        self.filter.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = RrlConfig::from_yaml("interface: eth0\n").unwrap();
        assert_eq!(config.interface, "eth0");
        assert_eq!(config.filter.rate_limit, 20);
        assert_eq!(config.filter.shard_count, 2);
        assert!(config.exclude_files.is_empty());
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn full_config_parses() {
        let yaml = r#"
interface: ens3
filter:
  rate_limit: 100
  shard_count: 8
  bucket_capacity: 500000
exclude_files:
  - /etc/dns-rrl/exclude.txt
log_level: debug
log_format: json
"#;
        let config = RrlConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.filter.rate_limit, 100);
        assert_eq!(config.filter.shard_count, 8);
        assert_eq!(config.filter.bucket_capacity, 500_000);
        assert_eq!(config.exclude_files.len(), 1);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_interface_rejected() {
        assert!(RrlConfig::from_yaml("filter:\n  rate_limit: 10\n").is_err());
        let err = RrlConfig::from_yaml("interface: \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn zero_rate_limit_rejected() {
        let yaml = "interface: eth0\nfilter:\n  rate_limit: 0\n";
        let err = RrlConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Settings(SettingsError::ZeroRateLimit)
        ));
    }

    #[test]
    fn zero_shard_count_rejected() {
        let yaml = "interface: eth0\nfilter:\n  shard_count: 0\n";
        assert!(RrlConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let yaml = "interface: eth0\nratelimit: 10\n";
        assert!(matches!(
            RrlConfig::from_yaml(yaml),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "interface: lo").unwrap();
        let config = RrlConfig::load(file.path()).unwrap();
        assert_eq!(config.interface, "lo");
    }
}
