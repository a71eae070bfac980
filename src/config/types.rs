//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every type also has a
//! `Default` carrying the statutory values the engine ships with, so the
//! calculators can run without a configuration directory.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata about the statutory schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleMetadata {
    /// Short code for the schedule (e.g., "PH-2024").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Date from which the tables apply.
    pub effective_date: NaiveDate,
    /// Where the tables were sourced from.
    pub source_url: String,
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self {
            code: "PH-2024".to_string(),
            name: "Philippine statutory contributions and withholding tax".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            source_url: "https://www.bir.gov.ph".to_string(),
        }
    }
}

/// One row of the SSS contribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssBracket {
    /// Highest monthly salary covered by this row (inclusive).
    pub upper_bound: Decimal,
    /// Employee premium for this row.
    pub premium: Decimal,
}

/// The SSS contribution schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssSchedule {
    /// Salaries strictly below this pay the minimum premium.
    pub minimum_salary: Decimal,
    /// Premium for salaries below `minimum_salary`.
    pub minimum_premium: Decimal,
    /// Ascending bracket table.
    pub brackets: Vec<SssBracket>,
    /// Premium for salaries above the last bracket.
    pub maximum_premium: Decimal,
}

impl Default for SssSchedule {
    fn default() -> Self {
        // 3,750 .. 24,750 in steps of 500, premium 157.50 .. 1,102.50 in steps of 22.50
        let brackets = (0..=42i64)
            .map(|step| SssBracket {
                upper_bound: Decimal::from(3750 + 500 * step),
                premium: Decimal::new(15750 + 2250 * step, 2),
            })
            .collect();

        Self {
            minimum_salary: Decimal::from(3250),
            minimum_premium: Decimal::new(13500, 2),
            brackets,
            maximum_premium: Decimal::new(112500, 2),
        }
    }
}

/// PhilHealth premium settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilHealthConfig {
    /// Total monthly premium rate applied to gross pay.
    pub premium_rate: Decimal,
    /// Fraction of the premium borne by the employee.
    pub employee_share: Decimal,
}

impl Default for PhilHealthConfig {
    fn default() -> Self {
        Self {
            premium_rate: Decimal::new(3, 2),
            employee_share: Decimal::new(5, 1),
        }
    }
}

/// Pag-IBIG contribution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagIbigConfig {
    /// Contribution rate applied to gross pay.
    pub rate: Decimal,
    /// Maximum monthly contribution.
    pub cap: Decimal,
}

impl Default for PagIbigConfig {
    fn default() -> Self {
        Self {
            rate: Decimal::new(2, 2),
            cap: Decimal::new(10000, 2),
        }
    }
}

/// Contributions configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionsConfig {
    /// SSS table.
    pub sss: SssSchedule,
    /// PhilHealth premium.
    pub philhealth: PhilHealthConfig,
    /// Pag-IBIG contribution.
    pub pagibig: PagIbigConfig,
}

/// One row of the progressive withholding tax schedule.
///
/// Tax for an income inside the bracket is
/// `base_tax + (income - lower_bound) * rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// First taxable income covered by this bracket.
    pub lower_bound: Decimal,
    /// Fixed tax owed at `lower_bound`.
    pub base_tax: Decimal,
    /// Marginal rate on the excess over `lower_bound`.
    pub rate: Decimal,
}

/// The withholding tax schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// Taxable income at or below this amount owes nothing.
    pub exempt_ceiling: Decimal,
    /// Brackets sorted by `lower_bound` ascending.
    pub brackets: Vec<TaxBracket>,
}

impl Default for TaxSchedule {
    fn default() -> Self {
        let bracket = |lower: i64, base: Decimal, rate_percent: i64| TaxBracket {
            lower_bound: Decimal::from(lower),
            base_tax: base,
            rate: Decimal::new(rate_percent, 2),
        };

        Self {
            exempt_ceiling: Decimal::from(20832),
            brackets: vec![
                bracket(20833, Decimal::ZERO, 20),
                bracket(33333, Decimal::from(2500), 25),
                bracket(66667, Decimal::from(10833), 30),
                bracket(166667, Decimal::new(4083333, 2), 32),
                bracket(666667, Decimal::new(20083333, 2), 35),
            ],
        }
    }
}

/// Attendance rules used to derive hours from log-in/log-out times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePolicy {
    /// Log-ins at or before this time are not late.
    pub grace_cutoff: NaiveTime,
    /// Unpaid break subtracted from every worked day, in hours.
    pub unpaid_break_hours: Decimal,
    /// Hours per day before overtime starts.
    pub regular_hours_per_day: Decimal,
    /// Multiplier applied to the hourly rate for overtime premium.
    pub overtime_multiplier: Decimal,
    /// Positions containing this text (case-insensitive) earn overtime.
    pub overtime_eligible_position: String,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            grace_cutoff: NaiveTime::from_hms_opt(8, 10, 0).unwrap_or_default(),
            unpaid_break_hours: Decimal::ONE,
            regular_hours_per_day: Decimal::from(8),
            overtime_multiplier: Decimal::new(125, 2),
            overtime_eligible_position: "rank and file".to_string(),
        }
    }
}

impl AttendancePolicy {
    /// Returns true if the position earns overtime pay.
    pub fn is_overtime_eligible(&self, position: &str) -> bool {
        position
            .to_lowercase()
            .contains(&self.overtime_eligible_position.to_lowercase())
    }
}

/// The complete payroll configuration.
///
/// Aggregates everything loaded from the YAML files in a configuration
/// directory. `Default` yields the built-in statutory tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollConfig {
    metadata: ScheduleMetadata,
    contributions: ContributionsConfig,
    withholding_tax: TaxSchedule,
    attendance: AttendancePolicy,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    ///
    /// Bracket tables are sorted ascending and then validated.
    pub fn new(
        metadata: ScheduleMetadata,
        contributions: ContributionsConfig,
        withholding_tax: TaxSchedule,
        attendance: AttendancePolicy,
    ) -> EngineResult<Self> {
        let mut contributions = contributions;
        contributions
            .sss
            .brackets
            .sort_by(|a, b| a.upper_bound.cmp(&b.upper_bound));

        let mut withholding_tax = withholding_tax;
        withholding_tax
            .brackets
            .sort_by(|a, b| a.lower_bound.cmp(&b.lower_bound));

        let config = Self {
            metadata,
            contributions,
            withholding_tax,
            attendance,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> EngineResult<()> {
        if self.contributions.sss.brackets.is_empty() {
            return Err(EngineError::InvalidConfig {
                message: "SSS table has no brackets".to_string(),
            });
        }
        if self.withholding_tax.brackets.is_empty() {
            return Err(EngineError::InvalidConfig {
                message: "withholding tax schedule has no brackets".to_string(),
            });
        }
        if let Some(first) = self.withholding_tax.brackets.first() {
            if first.lower_bound <= self.withholding_tax.exempt_ceiling {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "first tax bracket starts at {} which is not above the exempt ceiling {}",
                        first.lower_bound, self.withholding_tax.exempt_ceiling
                    ),
                });
            }
        }
        if self.attendance.regular_hours_per_day <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: "regular_hours_per_day must be positive".to_string(),
            });
        }
        if self.attendance.unpaid_break_hours < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: "unpaid_break_hours cannot be negative".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns the contribution tables.
    pub fn contributions(&self) -> &ContributionsConfig {
        &self.contributions
    }

    /// Returns the withholding tax schedule.
    pub fn withholding_tax(&self) -> &TaxSchedule {
        &self.withholding_tax
    }

    /// Returns the attendance policy.
    pub fn attendance(&self) -> &AttendancePolicy {
        &self.attendance
    }
}
