//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{
    AttendancePolicy, ContributionsConfig, PayrollConfig, ScheduleMetadata, TaxSchedule,
};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/ph_2024/
/// ├── schedule.yaml         # Schedule metadata
/// ├── contributions.yaml    # SSS, PhilHealth and Pag-IBIG tables
/// ├── withholding_tax.yaml  # Progressive tax brackets
/// └── attendance.yaml       # Grace period, break and overtime policy
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ph_2024").unwrap();
/// println!("Loaded schedule: {}", loader.metadata().name);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML (`ConfigParseError`)
    /// - The tables are inconsistent (`InvalidConfig`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/ph_2024")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<ScheduleMetadata>(&path.join("schedule.yaml"))?;
        let contributions =
            Self::load_yaml::<ContributionsConfig>(&path.join("contributions.yaml"))?;
        let withholding_tax = Self::load_yaml::<TaxSchedule>(&path.join("withholding_tax.yaml"))?;
        let attendance = Self::load_yaml::<AttendancePolicy>(&path.join("attendance.yaml"))?;

        let config = PayrollConfig::new(metadata, contributions, withholding_tax, attendance)?;
        debug!(
            path = %path.display(),
            code = %config.metadata().code,
            sss_brackets = config.contributions().sss.brackets.len(),
            tax_brackets = config.withholding_tax().brackets.len(),
            "Loaded payroll configuration"
        );

        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        self.config.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/ph_2024"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "PH-2024");
    }

    #[test]
    fn test_shipped_yaml_matches_builtin_tables() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let builtin = PayrollConfig::default();

        assert_eq!(loader.config().contributions(), builtin.contributions());
        assert_eq!(loader.config().withholding_tax(), builtin.withholding_tax());
        assert_eq!(loader.config().attendance(), builtin.attendance());
    }

    #[test]
    fn test_sss_table_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let sss = &loader.config().contributions().sss;

        assert_eq!(sss.minimum_salary, dec("3250"));
        assert_eq!(sss.minimum_premium, dec("135.00"));
        assert_eq!(sss.maximum_premium, dec("1125.00"));
        assert_eq!(sss.brackets.len(), 43);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");
        assert!(result.is_err());

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("schedule.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_default_loader_uses_builtin_tables() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.config(), &PayrollConfig::default());
    }
}
