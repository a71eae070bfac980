//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod leave;
mod payroll_summary;
mod year_month;

pub use attendance::{AttendanceDay, AttendanceRecord};
pub use employee::{Actor, Capability, EmployeeRecord, Role, fields};
pub use leave::{LeaveBalance, LeaveCategory, LeaveRequest, LeaveStatus};
pub use payroll_summary::{
    AuditStep, AuditTrace, AuditWarning, EmployeeProfile, FixedAllowances, HoursSummary,
    PayrollFigures, PayrollSummary, SummaryStatus,
};
pub use year_month::YearMonth;
