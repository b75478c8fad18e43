//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a payroll
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{EngineResult, PayrollError};

use super::types::PayrollConfig;

/// Loads and provides access to a payroll configuration.
///
/// The file is a single YAML document whose sections mirror
/// [`PayrollConfig`]; any omitted section or field keeps its default.
///
/// ```text
/// config/
/// └── default.yaml
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default.yaml").unwrap();
/// println!("Hourly wage: {}", loader.config().wage.hourly_wage);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable (`ConfigNotFound`)
    /// - The file contains invalid YAML or mistyped fields (`ConfigParseError`)
    ///
    /// Malformed tax brackets are not an error; they fall back to the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse_yaml(&content, &path_str)?;
        debug!(path = %path_str, "Loaded payroll configuration");
        Ok(Self { config })
    }

    /// Loads configuration from `path`, or the built-in defaults if the file
    /// does not exist.
    ///
    /// Only a missing file falls back. A file that exists but fails to parse
    /// is still an error, so a typo never silently reverts to default rates.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        match Self::load(path) {
            Err(PayrollError::ConfigNotFound { path }) => {
                warn!(path = %path, "Configuration file not found, using built-in defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Builds a loader from YAML text, e.g. an embedded or generated document.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let config = Self::parse_yaml(content, "<inline>")?;
        Ok(Self { config })
    }

    fn parse_yaml(content: &str, path: &str) -> EngineResult<PayrollConfig> {
        // An empty document deserializes to unit, not to a struct.
        if content.trim().is_empty() {
            return Ok(PayrollConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| PayrollError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> PayrollConfig {
        self.config
    }
}

impl From<PayrollConfig> for ConfigLoader {
    fn from(config: PayrollConfig) -> Self {
        Self { config }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OvertimeBasis, PensionBaseMode, TaxBrackets, WeekStart};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default.yaml"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_default_file_matches_builtin_defaults() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        assert_eq!(result.unwrap().config(), &PayrollConfig::default());
    }

    #[test]
    fn test_load_default_file_keeps_builtin_decimal_scale() {
        // Decimal equality ignores scale; the serialized form does not.
        let loaded = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(
            serde_json::to_value(loaded.config()).unwrap(),
            serde_json::to_value(PayrollConfig::default()).unwrap()
        );
        assert_eq!(loaded.config().bonuses.evening.to_string(), "0.20");
    }

    #[test]
    fn test_load_or_default_falls_back_only_when_missing() {
        let loader = ConfigLoader::load_or_default("/nonexistent/payroll.yaml").unwrap();
        assert_eq!(loader.config(), &PayrollConfig::default());

        let path = std::env::temp_dir().join("payroll_engine_bad_wage.yaml");
        fs::write(&path, "wage:\n  hourly_wage: 7O\n").unwrap();
        let result = ConfigLoader::load_or_default(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(PayrollError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/payroll.yaml");
        match result {
            Err(PayrollError::ConfigNotFound { path }) => {
                assert!(path.contains("payroll.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_partial_yaml_overrides_only_given_fields() {
        let yaml = r#"
wage:
  hourly_wage: 80
overtime:
  basis: weekly_only
  week_start: monday
deductions:
  pension_base_mode: include_all
"#;
        let loader = ConfigLoader::from_yaml_str(yaml).unwrap();
        let config = loader.config();
        assert_eq!(config.wage.hourly_wage, dec("80"));
        assert_eq!(config.wage.daily_travel, dec("22"));
        assert_eq!(config.overtime.basis, OvertimeBasis::WeeklyOnly);
        assert_eq!(config.overtime.week_start, WeekStart::Monday);
        assert_eq!(
            config.deductions.pension_base_mode,
            PensionBaseMode::IncludeAll
        );
        assert_eq!(config.deductions.credit_points, dec("2.25"));
    }

    #[test]
    fn test_yaml_brackets_with_null_cap() {
        let yaml = r#"
deductions:
  tax_brackets:
    - { cap: 1000, rate: 0.1 }
    - { cap: null, rate: 0.2 }
"#;
        let config = ConfigLoader::from_yaml_str(yaml).unwrap().into_config();
        let brackets = config.deductions.tax_brackets.brackets();
        assert_eq!(brackets.len(), 2);
        assert_eq!(brackets[0].cap, Some(dec("1000")));
        assert_eq!(brackets[1].rate, dec("0.2"));
    }

    #[test]
    fn test_yaml_malformed_brackets_fall_back() {
        let yaml = "deductions:\n  tax_brackets: \"[not json\"\n";
        let config = ConfigLoader::from_yaml_str(yaml).unwrap().into_config();
        assert_eq!(config.deductions.tax_brackets, TaxBrackets::default());
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("wage: [unterminated");
        assert!(matches!(
            result,
            Err(PayrollError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ConfigLoader::from_yaml_str("").unwrap().into_config();
        assert_eq!(config, PayrollConfig::default());
    }
}
