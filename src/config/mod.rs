//! Configuration loading and management for the Payroll Engine.
//!
//! This module provides functionality to load statutory tables and the
//! attendance policy from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ph_2024").unwrap();
//! println!("Loaded schedule: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AttendancePolicy, ContributionsConfig, PagIbigConfig, PayrollConfig, PhilHealthConfig,
    ScheduleMetadata, SssBracket, SssSchedule, TaxBracket, TaxSchedule,
};
