//! Application state for the Payroll Engine API.

use std::sync::Arc;

use crate::config::{ConfigLoader, PayrollConfig};

/// Shared application state.
///
/// Holds the loaded payroll configuration, shared by every handler.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn loader(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        self.config.config()
    }
}
