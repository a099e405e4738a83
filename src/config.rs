//! Configuration types for risk-journal

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration embedded in the binary, used when no file is found
pub const DEFAULT_CONFIG: &str = include_str!("../config.toml.example");

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub journal: JournalConfig,
    #[serde(default)]
    pub defaults: FormDefaults,
    pub telemetry: TelemetryConfig,
    pub categories: Vec<CategoryConfig>,
}

/// Trade store and export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    pub db_path: PathBuf,
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./exports")
}
fn default_recent_limit() -> usize {
    10
}

/// Values pre-filled into a new trade entry
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FormDefaults {
    #[serde(default = "default_account")]
    pub account: Decimal,
    #[serde(default = "default_risk_percent")]
    pub risk_percent: Decimal,
    #[serde(default = "default_entry")]
    pub entry: Decimal,
    #[serde(default = "default_stop")]
    pub stop: Decimal,
    #[serde(default = "default_target")]
    pub target: Decimal,
}

fn default_account() -> Decimal {
    Decimal::new(100_000, 0)
}
fn default_risk_percent() -> Decimal {
    Decimal::new(2, 0) // 2% of account
}
fn default_entry() -> Decimal {
    Decimal::new(100, 0)
}
fn default_stop() -> Decimal {
    Decimal::new(95, 0)
}
fn default_target() -> Decimal {
    Decimal::new(120, 0)
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            account: default_account(),
            risk_percent: default_risk_percent(),
            entry: default_entry(),
            stop: default_stop(),
            target: default_target(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// One trading category and its institution pool
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryConfig {
    /// Category key stored in the `product` column
    pub name: String,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Label shown for the entry price input
    #[serde(default = "default_entry_label")]
    pub entry_label: String,
    /// Whether trades in this category carry a symbol
    #[serde(default = "default_true")]
    pub has_symbol: bool,
    /// Institutions in display order
    pub institutions: Vec<String>,
}

fn default_entry_label() -> String {
    "Entry price".to_string()
}
fn default_true() -> bool {
    true
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no categories configured")]
    NoCategories,
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("category {0} has no institutions")]
    EmptyInstitutionPool(String),
    #[error("duplicate institution {institution} in category {category}")]
    DuplicateInstitution {
        category: String,
        institution: String,
    },
    #[error("recent_limit must be greater than zero")]
    ZeroRecentLimit,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, or `None` when the file does not exist
    ///
    /// A file that exists but fails to parse or validate is an error.
    pub fn load_if_present(path: impl AsRef<std::path::Path>) -> anyhow::Result<Option<Self>> {
        match Self::load(path) {
            Ok(config) => Ok(Some(config)),
            Err(e) => match e.downcast_ref::<std::io::Error>() {
                Some(io) if io.kind() == std::io::ErrorKind::NotFound => Ok(None),
                _ => Err(e),
            },
        }
    }

    /// Parse the embedded default configuration
    pub fn embedded() -> anyhow::Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if self.journal.recent_limit == 0 {
            return Err(ConfigError::ZeroRecentLimit);
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.name.as_str()) {
                return Err(ConfigError::DuplicateCategory(category.name.clone()));
            }
            if category.institutions.is_empty() {
                return Err(ConfigError::EmptyInstitutionPool(category.name.clone()));
            }
            let mut names = HashSet::new();
            for institution in &category.institutions {
                if !names.insert(institution.as_str()) {
                    return Err(ConfigError::DuplicateInstitution {
                        category: category.name.clone(),
                        institution: institution.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn minimal_toml() -> &'static str {
        r#"
            [journal]
            db_path = "journal.db"

            [telemetry]
            log_level = "debug"

            [[categories]]
            name = "gold"
            has_symbol = false
            institutions = ["UBS", "Citi"]
        "#
    }

    #[test]
    fn test_config_deserialize() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.journal.db_path, PathBuf::from("journal.db"));
        assert_eq!(config.journal.recent_limit, 10);
        assert_eq!(config.journal.export_dir, PathBuf::from("./exports"));
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
        assert_eq!(config.defaults, FormDefaults::default());
        assert!(!config.categories[0].has_symbol);
        assert_eq!(config.categories[0].entry_label, "Entry price");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_embedded_config() {
        let config = Config::embedded().unwrap();
        let names: Vec<_> = config.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["gold", "stock", "fund", "etf"]);
        for category in &config.categories {
            assert!((3..=6).contains(&category.institutions.len()));
        }
        assert_eq!(config.defaults.account, dec!(100000));
        assert_eq!(config.defaults.stop, dec!(95));
    }

    #[test]
    fn test_json_log_format() {
        let toml = minimal_toml().replace("log_level = \"debug\"", "log_level = \"debug\"\nlog_format = \"json\"");
        let config: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
    }

    #[test]
    fn test_validate_duplicate_category() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.categories.push(config.categories[0].clone());
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCategory("gold".to_string()))
        );
    }

    #[test]
    fn test_validate_empty_pool() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.categories[0].institutions.clear();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyInstitutionPool("gold".to_string()))
        );
    }

    #[test]
    fn test_validate_duplicate_institution() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.categories[0].institutions.push("UBS".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateInstitution { .. })
        ));
    }

    #[test]
    fn test_validate_zero_recent_limit() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.journal.recent_limit = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroRecentLimit));
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_if_present_missing_file() {
        let result = Config::load_if_present("/nonexistent/path/config.toml").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_if_present_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();

        let invalid = dir.path().join("invalid.toml");
        let content = minimal_toml().replace(
            "db_path = \"journal.db\"",
            "db_path = \"journal.db\"\nrecent_limit = 0",
        );
        assert_ne!(content, minimal_toml());
        std::fs::write(&invalid, content).unwrap();
        assert!(Config::load_if_present(&invalid).is_err());

        let malformed = dir.path().join("malformed.toml");
        std::fs::write(&malformed, "[journal\ndb_path = ").unwrap();
        assert!(Config::load_if_present(&malformed).is_err());

        let valid = dir.path().join("config.toml");
        std::fs::write(&valid, minimal_toml()).unwrap();
        assert!(Config::load_if_present(&valid).unwrap().is_some());
    }
}
