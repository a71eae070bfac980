//! Deduction calculation.
//!
//! [`DeductionEngine`] turns a gross pay figure into the statutory
//! contributions, the late deduction and the withholding tax. Late deduction
//! is subtracted from gross before tax is applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::contributions::{pagibig_contribution, philhealth_contribution, sss_contribution};
use super::salary::{GrossPayResult, SalaryEngine, in_range};
use super::withholding_tax::{tax_bracket_explanation, tax_bracket_table, withholding_tax};
use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, YearMonth};
use crate::record_source::RecordSource;

/// All deductions for one gross pay result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// SSS employee premium.
    pub sss: Decimal,
    /// PhilHealth employee share.
    pub phil_health: Decimal,
    /// Pag-IBIG contribution.
    pub pag_ibig: Decimal,
    /// `late_hours * hourly_rate`.
    pub late_deduction: Decimal,
    /// `gross - statutory - late_deduction`.
    pub taxable_income: Decimal,
    /// Tax on `taxable_income`.
    pub withholding_tax: Decimal,
    /// `statutory + late_deduction + withholding_tax`.
    pub total: Decimal,
    /// One step per deduction rule, numbered from the given start.
    pub audit_steps: Vec<AuditStep>,
}

impl DeductionBreakdown {
    /// SSS + PhilHealth + Pag-IBIG.
    pub fn statutory(&self) -> Decimal {
        self.sss + self.phil_health + self.pag_ibig
    }
}

/// Computes statutory contributions, late deduction and withholding tax.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::DeductionEngine;
/// use payroll_engine::config::PayrollConfig;
/// use rust_decimal::Decimal;
///
/// let config = PayrollConfig::default();
/// let engine = DeductionEngine::new(&config);
///
/// assert_eq!(engine.sss(Decimal::from(30000)), Decimal::new(112500, 2));
/// assert_eq!(engine.pag_ibig(Decimal::from(30000)), Decimal::from(100));
/// assert_eq!(engine.tax(Decimal::from(20000)), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DeductionEngine<'a> {
    config: &'a PayrollConfig,
}

impl<'a> DeductionEngine<'a> {
    /// Creates an engine over the given configuration.
    pub fn new(config: &'a PayrollConfig) -> Self {
        Self { config }
    }

    /// SSS premium for a gross monthly salary.
    pub fn sss(&self, gross_pay: Decimal) -> Decimal {
        sss_contribution(gross_pay, &self.config.contributions().sss)
    }

    /// PhilHealth employee share.
    pub fn phil_health(&self, gross_pay: Decimal) -> Decimal {
        philhealth_contribution(gross_pay, &self.config.contributions().philhealth)
    }

    /// Pag-IBIG contribution.
    pub fn pag_ibig(&self, gross_pay: Decimal) -> Decimal {
        pagibig_contribution(gross_pay, &self.config.contributions().pagibig)
    }

    /// Withholding tax on taxable income.
    pub fn tax(&self, taxable_income: Decimal) -> Decimal {
        withholding_tax(taxable_income, self.config.withholding_tax())
    }

    /// Deduction for hours late, or `None` if it exceeds the decimal range.
    pub fn late_deduction(&self, late_hours: Decimal, hourly_rate: Decimal) -> Option<Decimal> {
        late_hours.checked_mul(hourly_rate)
    }

    /// Explains which tax bracket applies to `taxable_income`.
    pub fn tax_bracket_explanation(&self, taxable_income: Decimal) -> String {
        tax_bracket_explanation(taxable_income, self.config.withholding_tax())
    }

    /// The bracket table, one line per bracket.
    pub fn bracket_table(&self) -> Vec<String> {
        tax_bracket_table(self.config.withholding_tax())
    }

    /// Computes every deduction for a gross pay result.
    ///
    /// Audit steps are numbered from `step_number`.
    ///
    /// # Errors
    ///
    /// `AmountOverflow` if the late deduction or the total leaves the
    /// decimal range.
    pub fn breakdown(
        &self,
        gross: &GrossPayResult,
        step_number: u32,
    ) -> EngineResult<DeductionBreakdown> {
        let gross_pay = gross.gross_pay;
        let employee_id = gross.employee_id.as_str();

        let sss = self.sss(gross_pay);
        let phil_health = self.phil_health(gross_pay);
        let pag_ibig = self.pag_ibig(gross_pay);
        let statutory = sss + phil_health + pag_ibig;

        let late_deduction = in_range(
            self.late_deduction(gross.late_hours, gross.hourly_rate),
            employee_id,
            "late_deduction",
        )?;
        let taxable_income = in_range(
            (gross_pay - statutory).checked_sub(late_deduction),
            employee_id,
            "taxable_income",
        )?;
        let withholding_tax = self.tax(taxable_income);
        let total = in_range(
            (statutory + withholding_tax).checked_add(late_deduction),
            employee_id,
            "total_deductions",
        )?;

        let audit_steps = vec![
            AuditStep {
                step_number,
                rule_id: "statutory_contributions".to_string(),
                rule_name: "SSS, PhilHealth and Pag-IBIG".to_string(),
                input: serde_json::json!({ "gross_pay": gross_pay.normalize().to_string() }),
                output: serde_json::json!({
                    "sss": sss.normalize().to_string(),
                    "phil_health": phil_health.normalize().to_string(),
                    "pag_ibig": pag_ibig.normalize().to_string(),
                }),
                reasoning: format!(
                    "Statutory contributions on gross {} total {}",
                    gross_pay.normalize(),
                    statutory.normalize()
                ),
            },
            AuditStep {
                step_number: step_number + 1,
                rule_id: "late_deduction".to_string(),
                rule_name: "Late Deduction".to_string(),
                input: serde_json::json!({
                    "late_hours": gross.late_hours.normalize().to_string(),
                    "hourly_rate": gross.hourly_rate.normalize().to_string(),
                }),
                output: serde_json::json!({ "late_deduction": late_deduction.normalize().to_string() }),
                reasoning: format!(
                    "{} late hours at {}",
                    gross.late_hours.normalize(),
                    gross.hourly_rate.normalize()
                ),
            },
            AuditStep {
                step_number: step_number + 2,
                rule_id: "withholding_tax".to_string(),
                rule_name: "Withholding Tax".to_string(),
                input: serde_json::json!({ "taxable_income": taxable_income.normalize().to_string() }),
                output: serde_json::json!({ "withholding_tax": withholding_tax.normalize().to_string() }),
                reasoning: self.tax_bracket_explanation(taxable_income),
            },
        ];

        info!(
            employee_id = %gross.employee_id,
            month = %gross.payroll_month,
            statutory = %statutory,
            late_deduction = %late_deduction,
            withholding_tax = %withholding_tax,
            total = %total,
            "Deductions computed"
        );

        Ok(DeductionBreakdown {
            sss,
            phil_health,
            pag_ibig,
            late_deduction,
            taxable_income,
            withholding_tax,
            total,
            audit_steps,
        })
    }

    /// Total deductions for an employee and month, reading attendance from
    /// `source`.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`SalaryEngine::gross_monthly_salary`], and
    /// `AmountOverflow` from [`DeductionEngine::breakdown`].
    pub fn total_deductions(
        &self,
        employee_id: &str,
        payroll_month: YearMonth,
        source: &dyn RecordSource,
    ) -> EngineResult<Decimal> {
        let gross = SalaryEngine::new(self.config).compute_month(employee_id, payroll_month, source, 1)?;
        Ok(self.breakdown(&gross, 2)?.total)
    }
}
