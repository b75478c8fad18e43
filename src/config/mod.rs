//! Configuration loading and management for the payroll engine.
//!
//! This module provides the [`PayrollConfig`] value passed into every
//! calculation stage and the [`ConfigLoader`] that reads it from YAML.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default.yaml").unwrap();
//! println!("Weekly threshold: {}", config.config().overtime.weekly_threshold_hours);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BonusRates, DeductionConfig, LevyRates, OvertimeBasis, OvertimeConfig, PayrollConfig,
    PensionBaseMode, SickPayConfig, StatusKeywords, TaxBracket, TaxBrackets, WageConfig,
    WeekStart,
};
