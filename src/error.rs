//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll computation,
//! configuration loading and leave administration.

use thiserror::Error;

/// The main error type for the Payroll Engine.
///
/// Input validation failures (`MissingInput`, `EmployeeNotFound`,
/// `InvalidNumericField`, `NonPositiveRate`) are raised immediately and are
/// never defaulted to zero. Missing attendance is not an error.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "10001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee data not found for id: 10001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required input (employee id, month, data source) was absent.
    #[error("Missing required input: {field}")]
    MissingInput {
        /// The name of the missing input.
        field: String,
    },

    /// The employee has no master-data record.
    #[error("Employee data not found for id: {employee_id}")]
    EmployeeNotFound {
        /// The identifier that was looked up.
        employee_id: String,
    },

    /// A numeric master-data field was blank or could not be parsed.
    #[error("Missing or invalid {field}: '{value}'")]
    InvalidNumericField {
        /// The field that failed to parse.
        field: String,
        /// The raw text that was found.
        value: String,
    },

    /// The hourly rate parsed but was zero or negative.
    #[error("Hourly rate must be positive for employee {employee_id}, got {rate}")]
    NonPositiveRate {
        /// The employee whose rate was rejected.
        employee_id: String,
        /// The rate as parsed.
        rate: String,
    },

    /// A pay figure exceeded the representable decimal range.
    #[error("Amount out of range computing {quantity} for employee {employee_id}")]
    AmountOverflow {
        /// The employee whose figures overflowed.
        employee_id: String,
        /// The figure being computed.
        quantity: String,
    },

    /// The record source failed to produce data.
    #[error("Record source error: {message}")]
    RecordSource {
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is internally inconsistent.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        message: String,
    },

    /// No leave request exists with the given id.
    #[error("Leave request not found: {request_id}")]
    LeaveRequestNotFound {
        /// The id that was looked up.
        request_id: u64,
    },

    /// The employee does not have enough leave days left.
    #[error("Insufficient {category} leave balance: requested {requested} day(s), {remaining} remaining")]
    InsufficientLeaveBalance {
        /// The leave category.
        category: String,
        /// The number of days requested.
        requested: u32,
        /// The number of days remaining.
        remaining: u32,
    },

    /// The leave request is not in a state that allows the transition.
    #[error("Leave request {request_id} cannot move from {from} to {to}")]
    InvalidLeaveTransition {
        /// The request id.
        request_id: u64,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
    },

    /// The leave period is empty or inverted.
    #[error("Invalid leave period: {message}")]
    InvalidLeavePeriod {
        /// Why the period was rejected.
        message: String,
    },

    /// The caller's role lacks the capability for an operation.
    #[error("Role '{role}' is not permitted to {action}")]
    PermissionDenied {
        /// The caller's role.
        role: String,
        /// The attempted action.
        action: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
