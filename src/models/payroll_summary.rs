//! Payroll summary models.
//!
//! This module contains the [`PayrollSummary`] type and its associated
//! structures that capture the outputs of a monthly payroll computation:
//! the employee profile, hour aggregates, monetary figures and an audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::YearMonth;

/// Fixed monthly allowances taken from master data.
///
/// Allowances are displayed on the payslip but are not part of gross pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedAllowances {
    /// Monthly rice subsidy.
    pub rice_subsidy: Decimal,
    /// Monthly phone allowance.
    pub phone_allowance: Decimal,
    /// Monthly clothing allowance.
    pub clothing_allowance: Decimal,
}

impl FixedAllowances {
    /// Sum of all allowances.
    pub fn total(&self) -> Decimal {
        self.rice_subsidy
            .saturating_add(self.phone_allowance)
            .saturating_add(self.clothing_allowance)
    }
}

/// Resolved master data for the payslip header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Job position; blank when unknown.
    pub position: String,
    /// Department; blank when unknown.
    pub department: String,
    /// Hourly rate; zero when unknown.
    pub hourly_rate: Decimal,
    /// Fixed allowances.
    pub allowances: FixedAllowances,
}

impl EmployeeProfile {
    /// A profile with only the id filled in.
    pub fn blank(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            ..Self::default()
        }
    }
}

/// Hour aggregates for the month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursSummary {
    /// Number of attendance days that contributed to pay.
    pub days_counted: u32,
    /// Total paid hours.
    pub hours_worked: Decimal,
    /// Total hours beyond the regular day.
    pub overtime_hours: Decimal,
    /// Total hours late.
    pub late_hours: Decimal,
}

/// The monetary figures of a payroll result.
///
/// Computed summaries satisfy:
/// - `net_monthly_pay = gross_salary - total_deductions`
/// - `total_deductions = sss + philhealth + pagibig + withholding_tax + late_deduction`
/// - `taxable_income = gross_salary - (sss + philhealth + pagibig) - late_deduction`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollFigures {
    /// Pay for hours worked at the plain hourly rate.
    pub basic_salary: Decimal,
    /// Basic salary plus overtime premium.
    pub gross_salary: Decimal,
    /// SSS employee premium.
    pub sss_deduction: Decimal,
    /// PhilHealth employee share.
    pub phil_health_deduction: Decimal,
    /// Pag-IBIG contribution.
    pub pag_ibig_deduction: Decimal,
    /// Deduction for hours late.
    pub late_deduction: Decimal,
    /// Base for withholding tax.
    pub taxable_income: Decimal,
    /// Withholding tax.
    pub withholding_tax: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Take-home pay.
    pub net_monthly_pay: Decimal,
}

impl PayrollFigures {
    /// SSS + PhilHealth + Pag-IBIG.
    pub fn statutory_deductions(&self) -> Decimal {
        self.sss_deduction
            .saturating_add(self.phil_health_deduction)
            .saturating_add(self.pag_ibig_deduction)
    }

    /// Overtime premium, derived as gross minus basic salary.
    pub fn overtime_pay(&self) -> Decimal {
        self.gross_salary
            .saturating_sub(self.basic_salary)
            .max(Decimal::ZERO)
    }

    /// Returns true if the three payroll identities hold exactly.
    ///
    /// Figures whose identities overflow the decimal range are inconsistent.
    pub fn is_consistent(&self) -> bool {
        self.identities_hold().unwrap_or(false)
    }

    fn identities_hold(&self) -> Option<bool> {
        let statutory = self
            .sss_deduction
            .checked_add(self.phil_health_deduction)?
            .checked_add(self.pag_ibig_deduction)?;
        let net = self.gross_salary.checked_sub(self.total_deductions)?;
        let total = statutory
            .checked_add(self.withholding_tax)?
            .checked_add(self.late_deduction)?;
        let taxable = self
            .gross_salary
            .checked_sub(statutory)?
            .checked_sub(self.late_deduction)?;

        Some(
            self.net_monthly_pay == net
                && self.total_deductions == total
                && self.taxable_income == taxable,
        )
    }
}

/// How a summary came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStatus {
    /// Figures were computed from attendance.
    Computed,
    /// No paid attendance in the month; all figures are zero.
    NoAttendance,
    /// Figures were supplied by the caller.
    ManualOverride,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete payroll breakdown for one employee and one month.
///
/// Built either by the computation pipeline
/// (`calculation::compute_payroll_summary`) or verbatim from caller-supplied
/// figures via [`PayrollSummary::from_precomputed`]. Both paths go through
/// the same private constructor.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{
///     EmployeeProfile, PayrollFigures, PayrollSummary, SummaryStatus, YearMonth,
/// };
/// use rust_decimal::Decimal;
///
/// let figures = PayrollFigures {
///     basic_salary: Decimal::from(20000),
///     gross_salary: Decimal::from(20000),
///     total_deductions: Decimal::from(1500),
///     net_monthly_pay: Decimal::from(18500),
///     ..PayrollFigures::default()
/// };
/// let summary = PayrollSummary::from_precomputed(
///     EmployeeProfile::blank("10001"),
///     YearMonth::new(2024, 6).unwrap(),
///     figures,
///     "",
/// );
/// assert_eq!(summary.status, SummaryStatus::ManualOverride);
/// assert_eq!(summary.figures.net_monthly_pay, Decimal::from(18500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Employee header data.
    pub employee: EmployeeProfile,
    /// The month the summary covers.
    pub payroll_month: YearMonth,
    /// Hour aggregates.
    pub hours: HoursSummary,
    /// Monetary figures.
    pub figures: PayrollFigures,
    /// Overtime premium, always `gross_salary - basic_salary`.
    pub overtime_pay: Decimal,
    /// Human-readable explanation of the applied tax bracket.
    pub tax_bracket_explanation: String,
    /// How the figures were obtained.
    pub status: SummaryStatus,
    /// Audit trace of the computation.
    pub audit_trace: AuditTrace,
}

impl PayrollSummary {
    /// Builds a summary from figures the caller already computed.
    ///
    /// Nothing is recomputed: every figure is taken verbatim.
    pub fn from_precomputed(
        employee: EmployeeProfile,
        payroll_month: YearMonth,
        figures: PayrollFigures,
        tax_bracket_explanation: impl Into<String>,
    ) -> Self {
        Self::assemble(
            employee,
            payroll_month,
            HoursSummary::default(),
            figures,
            tax_bracket_explanation.into(),
            SummaryStatus::ManualOverride,
            AuditTrace::default(),
        )
    }

    pub(crate) fn assemble(
        employee: EmployeeProfile,
        payroll_month: YearMonth,
        hours: HoursSummary,
        figures: PayrollFigures,
        tax_bracket_explanation: String,
        status: SummaryStatus,
        audit_trace: AuditTrace,
    ) -> Self {
        let overtime_pay = figures.overtime_pay();
        Self {
            employee,
            payroll_month,
            hours,
            figures,
            overtime_pay,
            tax_bracket_explanation,
            status,
            audit_trace,
        }
    }

    /// True when the month had no paid attendance.
    pub fn has_no_attendance(&self) -> bool {
        self.status == SummaryStatus::NoAttendance
    }
}
