//! Gross pay calculation.
//!
//! This module provides [`SalaryEngine`], which aggregates an employee's
//! attendance for one calendar month into gross pay. Regular pay is
//! `hours_worked * hourly_rate` per day; overtime-eligible positions also earn
//! `overtime_hours * hourly_rate * overtime_multiplier` on top.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceDay, AuditStep, EmployeeRecord, YearMonth, fields};
use crate::record_source::RecordSource;

/// The gross pay for one employee and one month, with its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossPayResult {
    /// The employee the result is for.
    pub employee_id: String,
    /// The month that was aggregated.
    pub payroll_month: YearMonth,
    /// The validated hourly rate.
    pub hourly_rate: Decimal,
    /// Whether overtime premium applied.
    pub overtime_eligible: bool,
    /// Attendance days that contributed.
    pub days_counted: u32,
    /// In-month rows skipped for missing or inverted log times.
    pub rows_skipped: u32,
    /// Total paid hours.
    pub hours_worked: Decimal,
    /// Total hours beyond the regular day.
    pub overtime_hours: Decimal,
    /// Total hours late on the counted days.
    pub late_hours: Decimal,
    /// `hours_worked * hourly_rate`.
    pub regular_pay: Decimal,
    /// Overtime premium; zero when not eligible.
    pub overtime_pay: Decimal,
    /// `regular_pay + overtime_pay`.
    pub gross_pay: Decimal,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates attendance into monthly gross pay.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::SalaryEngine;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{AttendanceRecord, EmployeeRecord, YearMonth, fields};
/// use payroll_engine::record_source::InMemoryRecordSource;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let source = InMemoryRecordSource::new()
///     .with_employee(
///         EmployeeRecord::new("10001")
///             .with_field(fields::POSITION, "Payroll Rank and File")
///             .with_field(fields::HOURLY_RATE, "100"),
///     )
///     .with_attendance([AttendanceRecord::new(
///         "10001",
///         NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///         NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///         NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///     )]);
///
/// let config = PayrollConfig::default();
/// let engine = SalaryEngine::new(&config);
/// let gross = engine
///     .gross_monthly_salary("10001", YearMonth::new(2024, 6).unwrap(), &source)
///     .unwrap();
/// assert_eq!(gross, Decimal::from(800));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SalaryEngine<'a> {
    config: &'a PayrollConfig,
}

impl<'a> SalaryEngine<'a> {
    /// Creates an engine over the given configuration.
    pub fn new(config: &'a PayrollConfig) -> Self {
        Self { config }
    }

    /// Returns the gross pay for the month.
    ///
    /// # Errors
    ///
    /// - `MissingInput` if `employee_id` is blank
    /// - `EmployeeNotFound` if the source has no master data for the employee
    /// - `InvalidNumericField` if the hourly rate is blank or not a number
    /// - `NonPositiveRate` if the hourly rate is zero or negative
    /// - `AmountOverflow` if pay exceeds the decimal range
    ///
    /// An employee without attendance earns zero; that is not an error.
    pub fn gross_monthly_salary(
        &self,
        employee_id: &str,
        payroll_month: YearMonth,
        source: &dyn RecordSource,
    ) -> EngineResult<Decimal> {
        self.compute_month(employee_id, payroll_month, source, 1)
            .map(|result| result.gross_pay)
    }

    /// Computes the full gross pay breakdown for the month.
    ///
    /// Rows are processed in date order (ties keep source order), so the
    /// same inputs always produce the same figures.
    pub fn compute_month(
        &self,
        employee_id: &str,
        payroll_month: YearMonth,
        source: &dyn RecordSource,
        step_number: u32,
    ) -> EngineResult<GrossPayResult> {
        if employee_id.trim().is_empty() {
            return Err(EngineError::MissingInput {
                field: "employee_id".to_string(),
            });
        }

        let record =
            source
                .employee_record(employee_id)?
                .ok_or_else(|| EngineError::EmployeeNotFound {
                    employee_id: employee_id.to_string(),
                })?;

        let hourly_rate = parse_hourly_rate(&record)?;
        let policy = self.config.attendance();
        let position = record.field(fields::POSITION).unwrap_or_default();
        let overtime_eligible = policy.is_overtime_eligible(position);

        let mut rows = source.attendance_rows(employee_id)?;
        if rows.is_empty() {
            debug!(employee_id, month = %payroll_month, "No attendance rows for employee");
        }
        rows.sort_by_key(|row| row.date);

        let mut days_counted = 0u32;
        let mut rows_skipped = 0u32;
        let mut hours_worked = Decimal::ZERO;
        let mut overtime_hours = Decimal::ZERO;
        let mut late_hours = Decimal::ZERO;
        let mut regular_pay = Decimal::ZERO;
        let mut overtime_pay = Decimal::ZERO;

        for row in rows.iter().filter(|row| payroll_month.contains(row.date)) {
            if !row.is_complete() {
                debug!(employee_id, date = %row.date, "Skipping attendance row with missing log time");
                rows_skipped += 1;
                continue;
            }
            if row.is_inverted() {
                warn!(employee_id, date = %row.date, "Skipping attendance row with log-out before log-in");
                rows_skipped += 1;
                continue;
            }

            let day = AttendanceDay::from_record(row, policy);
            days_counted += 1;
            hours_worked += day.hours_worked();
            overtime_hours += day.overtime_hours();
            late_hours += day.late_hours();

            let day_pay = day.hours_worked().checked_mul(hourly_rate);
            regular_pay = in_range(
                day_pay.and_then(|pay| regular_pay.checked_add(pay)),
                employee_id,
                "regular_pay",
            )?;
            if overtime_eligible {
                let premium = day
                    .overtime_hours()
                    .checked_mul(hourly_rate)
                    .and_then(|pay| pay.checked_mul(policy.overtime_multiplier));
                overtime_pay = in_range(
                    premium.and_then(|pay| overtime_pay.checked_add(pay)),
                    employee_id,
                    "overtime_pay",
                )?;
            }
        }

        let gross_pay = in_range(regular_pay.checked_add(overtime_pay), employee_id, "gross_pay")?;

        info!(
            employee_id,
            month = %payroll_month,
            days_counted,
            rows_skipped,
            gross_pay = %gross_pay,
            "Gross pay computed"
        );

        let reasoning = if days_counted == 0 {
            format!("No payable attendance in {}; gross pay is zero", payroll_month)
        } else if overtime_eligible {
            format!(
                "{} day(s), {} hours at {} plus {} overtime hours at {}x premium",
                days_counted,
                hours_worked.normalize(),
                hourly_rate.normalize(),
                overtime_hours.normalize(),
                policy.overtime_multiplier.normalize()
            )
        } else {
            format!(
                "{} day(s), {} hours at {}; position '{}' is not overtime eligible",
                days_counted,
                hours_worked.normalize(),
                hourly_rate.normalize(),
                position
            )
        };

        let audit_step = AuditStep {
            step_number,
            rule_id: "gross_pay".to_string(),
            rule_name: "Monthly Gross Pay".to_string(),
            input: serde_json::json!({
                "employee_id": employee_id,
                "month": payroll_month.to_string(),
                "hourly_rate": hourly_rate.normalize().to_string(),
                "position": position,
            }),
            output: serde_json::json!({
                "days_counted": days_counted,
                "rows_skipped": rows_skipped,
                "regular_pay": regular_pay.normalize().to_string(),
                "overtime_pay": overtime_pay.normalize().to_string(),
                "gross_pay": gross_pay.normalize().to_string(),
            }),
            reasoning,
        };

        Ok(GrossPayResult {
            employee_id: employee_id.to_string(),
            payroll_month,
            hourly_rate,
            overtime_eligible,
            days_counted,
            rows_skipped,
            hours_worked,
            overtime_hours,
            late_hours,
            regular_pay,
            overtime_pay,
            gross_pay,
            audit_step,
        })
    }
}

/// Parses a master-data amount, accepting thousands separators.
pub(crate) fn parse_amount(field: &str, raw: Option<&str>) -> EngineResult<Decimal> {
    let raw = raw.unwrap_or_default();
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Err(EngineError::InvalidNumericField {
            field: field.to_string(),
            value: raw.to_string(),
        });
    }

    Decimal::from_str(&cleaned).map_err(|_| EngineError::InvalidNumericField {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Maps a checked arithmetic result to `AmountOverflow` when it overflowed.
pub(crate) fn in_range(
    value: Option<Decimal>,
    employee_id: &str,
    quantity: &str,
) -> EngineResult<Decimal> {
    value.ok_or_else(|| EngineError::AmountOverflow {
        employee_id: employee_id.to_string(),
        quantity: quantity.to_string(),
    })
}

/// Parses and validates the hourly rate of a master-data record.
pub(crate) fn parse_hourly_rate(record: &EmployeeRecord) -> EngineResult<Decimal> {
    let rate = parse_amount(fields::HOURLY_RATE, record.field(fields::HOURLY_RATE))?;
    if rate <= Decimal::ZERO {
        return Err(EngineError::NonPositiveRate {
            employee_id: record.employee_id.clone(),
            rate: rate.to_string(),
        });
    }
    Ok(rate)
}
