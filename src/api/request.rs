//! Request types for the Payroll Engine API.
//!
//! Payroll requests carry their own master data and attendance, so each
//! request is computed against an in-memory record source built from its body.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::{
    Actor, AttendanceRecord, EmployeeProfile, EmployeeRecord, PayrollFigures, YearMonth,
};
use crate::record_source::InMemoryRecordSource;

/// Request body for `/payroll/summary` and `/payroll/gross`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Who is asking.
    pub requested_by: Actor,
    /// Master data of the employee being paid.
    pub employee: EmployeeRecord,
    /// Attendance rows; any month, filtered by the engine.
    #[serde(default)]
    pub attendance: Vec<AttendanceRowRequest>,
    /// Target month as `YYYY-MM`.
    #[serde(default)]
    pub month: Option<YearMonth>,
}

/// One attendance row in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRowRequest {
    /// Calendar date.
    pub date: NaiveDate,
    /// Log-in time, `HH:MM:SS`.
    #[serde(default)]
    pub log_in: Option<NaiveTime>,
    /// Log-out time, `HH:MM:SS`.
    #[serde(default)]
    pub log_out: Option<NaiveTime>,
}

impl PayrollRequest {
    /// Builds a record source holding this request's employee and rows.
    pub fn record_source(&self) -> InMemoryRecordSource {
        let employee_id = &self.employee.employee_id;
        let rows = self.attendance.iter().map(|row| AttendanceRecord {
            employee_id: employee_id.clone(),
            date: row.date,
            log_in: row.log_in,
            log_out: row.log_out,
        });

        InMemoryRecordSource::new()
            .with_employee(self.employee.clone())
            .with_attendance(rows)
    }
}

/// Request body for `/payroll/override`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideRequest {
    /// Who is asking.
    pub requested_by: Actor,
    /// Payslip header.
    pub employee: EmployeeProfile,
    /// The month the figures are for.
    pub month: YearMonth,
    /// Figures taken verbatim.
    pub figures: PayrollFigures,
    /// Optional explanation text.
    #[serde(default)]
    pub tax_bracket_explanation: String,
}
