//! Calculation logic for the Payroll Engine.
//!
//! This module contains the monthly payroll pipeline: gross pay from
//! attendance, statutory contributions, withholding tax, and the summary that
//! combines them into net pay.

mod contributions;
mod deductions;
mod payroll_summary;
mod salary;
mod withholding_tax;

pub use contributions::{pagibig_contribution, philhealth_contribution, sss_contribution};
pub use deductions::{DeductionBreakdown, DeductionEngine};
pub use payroll_summary::{compute_current_payroll_summary, compute_payroll_summary};
pub use salary::{GrossPayResult, SalaryEngine};
pub use withholding_tax::{
    applicable_bracket, tax_bracket_explanation, tax_bracket_table, withholding_tax,
};
