//! Monthly payroll engine.
//!
//! This crate computes Philippine monthly payroll: attendance is aggregated
//! into gross pay, SSS, PhilHealth and Pag-IBIG contributions and withholding
//! tax are deducted, and the result is assembled into a payslip summary. It
//! also keeps leave balances and requests, and serves the computation over
//! HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod leave;
pub mod models;
pub mod record_source;
