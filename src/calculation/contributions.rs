//! Statutory contribution calculations.
//!
//! Employee shares of the three mandatory government contributions,
//! each a pure function of monthly gross pay:
//! - SSS: bracket table lookup
//! - PhilHealth: half of a flat premium rate
//! - Pag-IBIG: flat rate, capped

use rust_decimal::Decimal;

use crate::config::{PagIbigConfig, PhilHealthConfig, SssSchedule};

/// Looks up the SSS premium for a gross monthly salary.
///
/// Salaries below `minimum_salary` pay `minimum_premium`. Otherwise the first
/// bracket whose upper bound is at or above the salary applies; salaries above
/// the last bracket pay `maximum_premium`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::sss_contribution;
/// use payroll_engine::config::SssSchedule;
/// use rust_decimal::Decimal;
///
/// let table = SssSchedule::default();
/// assert_eq!(sss_contribution(Decimal::from(3000), &table), Decimal::new(13500, 2));
/// assert_eq!(sss_contribution(Decimal::from(24750), &table), Decimal::new(110250, 2));
/// assert_eq!(sss_contribution(Decimal::from(30000), &table), Decimal::new(112500, 2));
/// ```
pub fn sss_contribution(gross_pay: Decimal, schedule: &SssSchedule) -> Decimal {
    if gross_pay < schedule.minimum_salary {
        return schedule.minimum_premium;
    }

    schedule
        .brackets
        .iter()
        .find(|bracket| bracket.upper_bound >= gross_pay)
        .map(|bracket| bracket.premium)
        .unwrap_or(schedule.maximum_premium)
}

/// Employee share of the PhilHealth premium.
///
/// ```
/// use payroll_engine::calculation::philhealth_contribution;
/// use payroll_engine::config::PhilHealthConfig;
/// use rust_decimal::Decimal;
///
/// let premium = philhealth_contribution(Decimal::from(20000), &PhilHealthConfig::default());
/// assert_eq!(premium, Decimal::from(300));
/// ```
pub fn philhealth_contribution(gross_pay: Decimal, config: &PhilHealthConfig) -> Decimal {
    gross_pay * config.premium_rate * config.employee_share
}

/// Pag-IBIG contribution, capped.
///
/// ```
/// use payroll_engine::calculation::pagibig_contribution;
/// use payroll_engine::config::PagIbigConfig;
/// use rust_decimal::Decimal;
///
/// let config = PagIbigConfig::default();
/// assert_eq!(pagibig_contribution(Decimal::from(1000), &config), Decimal::from(20));
/// assert_eq!(pagibig_contribution(Decimal::from(10000), &config), Decimal::from(100));
/// ```
pub fn pagibig_contribution(gross_pay: Decimal, config: &PagIbigConfig) -> Decimal {
    (gross_pay * config.rate).min(config.cap)
}
