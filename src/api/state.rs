//! Application state for the payroll engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, PayrollConfig};

/// Shared application state.
///
/// Holds the default payroll configuration, loaded once at startup and
/// shared read-only across requests.
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

    /// Returns the default payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        self.config.config()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ConfigLoader::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_config() {
        let mut config = PayrollConfig::default();
        config.wage.hourly_wage = rust_decimal::Decimal::from(80);
        let state = AppState::new(ConfigLoader::from(config));
        let clone = state.clone();
        assert_eq!(clone.config().wage.hourly_wage, rust_decimal::Decimal::from(80));
        assert!(std::ptr::eq(state.config(), clone.config()));
    }
}
