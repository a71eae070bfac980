//! Monthly payroll summary.
//!
//! Chains [`SalaryEngine`] and [`DeductionEngine`] into a single
//! [`PayrollSummary`] for one employee and one month.

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::deductions::DeductionEngine;
use super::salary::{SalaryEngine, parse_amount};
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, EmployeeProfile, EmployeeRecord, FixedAllowances,
    HoursSummary, PayrollFigures, PayrollSummary, SummaryStatus, YearMonth, fields,
};
use crate::record_source::RecordSource;

/// Computes the payroll summary for an employee and month.
///
/// Master-data lookups for the payslip header degrade to blank or zero values
/// and are reported as audit warnings. Gross pay errors propagate: when the
/// record source itself fails, the header lookup only records a warning, but
/// the gross pay step then returns that same error. Pay figures that leave the
/// decimal range fail with `AmountOverflow`. A month
/// without paid attendance yields an all-zero summary with status
/// [`SummaryStatus::NoAttendance`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_payroll_summary;
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::{EmployeeRecord, SummaryStatus, YearMonth, fields};
/// use payroll_engine::record_source::InMemoryRecordSource;
/// use rust_decimal::Decimal;
///
/// let source = InMemoryRecordSource::new()
///     .with_employee(EmployeeRecord::new("10001").with_field(fields::HOURLY_RATE, "100"));
///
/// let summary = compute_payroll_summary(
///     "10001",
///     YearMonth::new(2024, 6).unwrap(),
///     &source,
///     &PayrollConfig::default(),
/// )
/// .unwrap();
///
/// assert_eq!(summary.status, SummaryStatus::NoAttendance);
/// assert_eq!(summary.figures.net_monthly_pay, Decimal::ZERO);
/// ```
pub fn compute_payroll_summary(
    employee_id: &str,
    payroll_month: YearMonth,
    source: &dyn RecordSource,
    config: &PayrollConfig,
) -> EngineResult<PayrollSummary> {
    let mut trace = AuditTrace::default();
    let profile = resolve_profile(employee_id, source, &mut trace.warnings);

    let gross = SalaryEngine::new(config).compute_month(employee_id, payroll_month, source, 1)?;
    let deductions = DeductionEngine::new(config);
    let hours = HoursSummary {
        days_counted: gross.days_counted,
        hours_worked: gross.hours_worked,
        overtime_hours: gross.overtime_hours,
        late_hours: gross.late_hours,
    };

    if gross.rows_skipped > 0 {
        trace.warnings.push(AuditWarning {
            code: "ATTENDANCE_ROWS_SKIPPED".to_string(),
            message: format!(
                "{} attendance row(s) in {} had missing or inverted log times",
                gross.rows_skipped, payroll_month
            ),
            severity: "medium".to_string(),
        });
    }
    trace.steps.push(gross.audit_step.clone());

    if gross.gross_pay <= Decimal::ZERO {
        info!(employee_id, month = %payroll_month, "No paid attendance; summary is zero");
        return Ok(PayrollSummary::assemble(
            profile,
            payroll_month,
            hours,
            PayrollFigures::default(),
            deductions.tax_bracket_explanation(Decimal::ZERO),
            SummaryStatus::NoAttendance,
            trace,
        ));
    }

    let breakdown = deductions.breakdown(&gross, 2)?;
    let net_monthly_pay = gross.gross_pay - breakdown.total;
    let figures = PayrollFigures {
        basic_salary: gross.regular_pay,
        gross_salary: gross.gross_pay,
        sss_deduction: breakdown.sss,
        phil_health_deduction: breakdown.phil_health,
        pag_ibig_deduction: breakdown.pag_ibig,
        late_deduction: breakdown.late_deduction,
        taxable_income: breakdown.taxable_income,
        withholding_tax: breakdown.withholding_tax,
        total_deductions: breakdown.total,
        net_monthly_pay,
    };

    let next_step = 2 + breakdown.audit_steps.len() as u32;
    trace.steps.extend(breakdown.audit_steps);
    trace.steps.push(AuditStep {
        step_number: next_step,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Monthly Pay".to_string(),
        input: serde_json::json!({
            "gross_salary": figures.gross_salary.normalize().to_string(),
            "total_deductions": figures.total_deductions.normalize().to_string(),
        }),
        output: serde_json::json!({ "net_monthly_pay": net_monthly_pay.normalize().to_string() }),
        reasoning: format!(
            "Gross {} less deductions {}",
            figures.gross_salary.normalize(),
            figures.total_deductions.normalize()
        ),
    });

    info!(
        employee_id,
        month = %payroll_month,
        gross = %figures.gross_salary,
        net = %net_monthly_pay,
        "Payroll summary computed"
    );

    Ok(PayrollSummary::assemble(
        profile,
        payroll_month,
        hours,
        figures,
        deductions.tax_bracket_explanation(breakdown.taxable_income),
        SummaryStatus::Computed,
        trace,
    ))
}

/// Computes the payroll summary for the current calendar month.
pub fn compute_current_payroll_summary(
    employee_id: &str,
    source: &dyn RecordSource,
    config: &PayrollConfig,
) -> EngineResult<PayrollSummary> {
    compute_payroll_summary(employee_id, YearMonth::current(), source, config)
}

fn resolve_profile(
    employee_id: &str,
    source: &dyn RecordSource,
    warnings: &mut Vec<AuditWarning>,
) -> EmployeeProfile {
    let record = match source.employee_record(employee_id) {
        Ok(Some(record)) => record,
        Ok(None) => {
            warnings.push(profile_warning(format!(
                "No master data for employee {}; header fields left blank",
                employee_id
            )));
            return EmployeeProfile::blank(employee_id);
        }
        Err(err) => {
            warn!(employee_id, error = %err, "Master data lookup failed");
            warnings.push(profile_warning(format!(
                "Master data lookup failed: {}; header fields left blank",
                err
            )));
            return EmployeeProfile::blank(employee_id);
        }
    };

    let text = |key: &str| record.field(key).unwrap_or_default().trim().to_string();

    EmployeeProfile {
        employee_id: employee_id.to_string(),
        position: text(fields::POSITION),
        department: text(fields::DEPARTMENT),
        hourly_rate: amount_or_zero(&record, fields::HOURLY_RATE, warnings),
        allowances: FixedAllowances {
            rice_subsidy: amount_or_zero(&record, fields::RICE_SUBSIDY, warnings),
            phone_allowance: amount_or_zero(&record, fields::PHONE_ALLOWANCE, warnings),
            clothing_allowance: amount_or_zero(&record, fields::CLOTHING_ALLOWANCE, warnings),
        },
    }
}

fn amount_or_zero(record: &EmployeeRecord, key: &str, warnings: &mut Vec<AuditWarning>) -> Decimal {
    match parse_amount(key, record.field(key)) {
        Ok(value) => value,
        Err(err) => {
            warnings.push(profile_warning(format!("{}; using 0", err)));
            Decimal::ZERO
        }
    }
}

fn profile_warning(message: String) -> AuditWarning {
    AuditWarning {
        code: "PROFILE_FIELD_DEFAULTED".to_string(),
        message,
        severity: "low".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::AttendanceRecord;
    use crate::record_source::InMemoryRecordSource;

    struct UnavailableSource;

    impl RecordSource for UnavailableSource {
        fn employee_record(&self, _employee_id: &str) -> EngineResult<Option<EmployeeRecord>> {
            Err(EngineError::RecordSource {
                message: "master data offline".to_string(),
            })
        }

        fn attendance_rows(&self, _employee_id: &str) -> EngineResult<Vec<AttendanceRecord>> {
            Ok(Vec::new())
        }
    }
    use chrono::{NaiveDate, NaiveTime};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn june() -> YearMonth {
        YearMonth::new(2024, 6).unwrap()
    }

    fn day(d: u32, log_in: (u32, u32), log_out: (u32, u32)) -> AttendanceRecord {
        AttendanceRecord::new(
            "10001",
            NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
            NaiveTime::from_hms_opt(log_in.0, log_in.1, 0).unwrap(),
            NaiveTime::from_hms_opt(log_out.0, log_out.1, 0).unwrap(),
        )
    }

    fn full_record() -> EmployeeRecord {
        EmployeeRecord::new("10001")
            .with_field(fields::POSITION, "Payroll Rank and File")
            .with_field(fields::DEPARTMENT, "Accounting")
            .with_field(fields::HOURLY_RATE, "200")
            .with_field(fields::RICE_SUBSIDY, "1,500")
            .with_field(fields::PHONE_ALLOWANCE, "1000")
            .with_field(fields::CLOTHING_ALLOWANCE, "1000")
    }

    #[test]
    fn test_computed_summary_is_consistent() {
        // 20 days of 08:00-18:00: 9 paid hours, 1 overtime hour each
        let rows = (1..=20).map(|d| day(d, (8, 0), (18, 0)));
        let source = InMemoryRecordSource::new()
            .with_employee(full_record())
            .with_attendance(rows);

        let summary =
            compute_payroll_summary("10001", june(), &source, &PayrollConfig::default()).unwrap();

        assert_eq!(summary.status, SummaryStatus::Computed);
        assert_eq!(summary.figures.basic_salary, dec("36000"));
        assert_eq!(summary.figures.gross_salary, dec("41000"));
        assert_eq!(summary.overtime_pay, dec("5000"));
        assert!(summary.figures.is_consistent());
        assert_eq!(summary.hours.days_counted, 20);
        assert_eq!(summary.employee.allowances.total(), dec("3500"));
        assert!(summary.audit_trace.warnings.is_empty());
        assert_eq!(summary.audit_trace.steps.len(), 5);
    }

    #[test]
    fn test_allowances_are_not_part_of_net() {
        let rows = (3..=7).map(|d| day(d, (8, 0), (17, 0)));
        let source = InMemoryRecordSource::new()
            .with_employee(full_record())
            .with_attendance(rows);

        let summary =
            compute_payroll_summary("10001", june(), &source, &PayrollConfig::default()).unwrap();
        assert_eq!(
            summary.figures.net_monthly_pay,
            summary.figures.gross_salary - summary.figures.total_deductions
        );
    }

    #[test]
    fn test_no_attendance_is_zero_summary() {
        let source = InMemoryRecordSource::new().with_employee(full_record());
        let summary =
            compute_payroll_summary("10001", june(), &source, &PayrollConfig::default()).unwrap();

        assert!(summary.has_no_attendance());
        assert_eq!(summary.figures, PayrollFigures::default());
        assert_eq!(summary.employee.position, "Payroll Rank and File");
        assert!(summary.tax_bracket_explanation.contains("no withholding tax"));
    }

    #[test]
    fn test_attendance_in_other_month_only_is_zero_summary() {
        let source = InMemoryRecordSource::new()
            .with_employee(full_record())
            .with_attendance([day(3, (8, 0), (17, 0))]);

        let summary = compute_payroll_summary(
            "10001",
            YearMonth::new(2024, 7).unwrap(),
            &source,
            &PayrollConfig::default(),
        )
        .unwrap();
        assert_eq!(summary.status, SummaryStatus::NoAttendance);
    }

    #[test]
    fn test_bad_allowance_degrades_to_zero_with_warning() {
        let record = full_record().with_field(fields::PHONE_ALLOWANCE, "n/a");
        let source = InMemoryRecordSource::new()
            .with_employee(record)
            .with_attendance([day(3, (8, 0), (17, 0))]);

        let summary =
            compute_payroll_summary("10001", june(), &source, &PayrollConfig::default()).unwrap();

        assert_eq!(summary.employee.allowances.phone_allowance, Decimal::ZERO);
        assert_eq!(summary.employee.allowances.rice_subsidy, dec("1500"));
        let warning = &summary.audit_trace.warnings[0];
        assert_eq!(warning.code, "PROFILE_FIELD_DEFAULTED");
        assert!(warning.message.contains("'n/a'"));
    }

    #[test]
    fn test_skipped_rows_produce_warning() {
        let source = InMemoryRecordSource::new()
            .with_employee(full_record())
            .with_attendance([day(3, (8, 0), (17, 0)), day(4, (17, 0), (8, 0))]);

        let summary =
            compute_payroll_summary("10001", june(), &source, &PayrollConfig::default()).unwrap();
        assert!(
            summary
                .audit_trace
                .warnings
                .iter()
                .any(|w| w.code == "ATTENDANCE_ROWS_SKIPPED")
        );
    }

    #[test]
    fn test_missing_employee_propagates() {
        let source = InMemoryRecordSource::new();
        let result = compute_payroll_summary("10001", june(), &source, &PayrollConfig::default());

        assert!(matches!(result, Err(EngineError::EmployeeNotFound { .. })));
    }

    #[test]
    fn test_failed_lookup_leaves_blank_profile_with_warning() {
        let mut warnings = Vec::new();
        let profile = resolve_profile("10001", &UnavailableSource, &mut warnings);

        assert_eq!(profile, EmployeeProfile::blank("10001"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "PROFILE_FIELD_DEFAULTED");
        assert!(warnings[0].message.contains("master data offline"));
    }

    #[test]
    fn test_failed_lookup_propagates_from_gross_step() {
        let result = compute_payroll_summary(
            "10001",
            june(),
            &UnavailableSource,
            &PayrollConfig::default(),
        );

        match result {
            Err(EngineError::RecordSource { message }) => assert_eq!(message, "master data offline"),
            other => panic!("Expected RecordSource error, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_rate_is_an_error_not_a_panic() {
        let record = full_record().with_field(fields::HOURLY_RATE, "10000000000000000000000000000");
        let source = InMemoryRecordSource::new()
            .with_employee(record)
            .with_attendance([day(3, (8, 0), (17, 0))]);

        let result = compute_payroll_summary("10001", june(), &source, &PayrollConfig::default());
        assert!(matches!(result, Err(EngineError::AmountOverflow { .. })));
    }

    #[test]
    fn test_recompute_is_identical() {
        let rows = [day(3, (9, 7), (19, 13)), day(4, (8, 3), (17, 59))];
        let source = InMemoryRecordSource::new()
            .with_employee(full_record())
            .with_attendance(rows);
        let config = PayrollConfig::default();

        let first = compute_payroll_summary("10001", june(), &source, &config).unwrap();
        let second = compute_payroll_summary("10001", june(), &source, &config).unwrap();
        assert_eq!(first, second);
    }
}
