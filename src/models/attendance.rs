//! Attendance models.
//!
//! [`AttendanceRecord`] is the raw row handed over by a record source.
//! [`AttendanceDay`] is the value object derived from it, carrying the
//! worked, late and overtime hours for a single day.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::AttendancePolicy;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// A raw attendance row: one employee, one date, optional log times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the row belongs to.
    pub employee_id: String,
    /// The calendar date of the row.
    pub date: NaiveDate,
    /// Time of day the employee logged in.
    #[serde(default)]
    pub log_in: Option<NaiveTime>,
    /// Time of day the employee logged out.
    #[serde(default)]
    pub log_out: Option<NaiveTime>,
}

impl AttendanceRecord {
    /// Creates a record with both log times present.
    pub fn new(
        employee_id: impl Into<String>,
        date: NaiveDate,
        log_in: NaiveTime,
        log_out: NaiveTime,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            log_in: Some(log_in),
            log_out: Some(log_out),
        }
    }

    /// Returns true if both log-in and log-out are present.
    pub fn is_complete(&self) -> bool {
        self.log_in.is_some() && self.log_out.is_some()
    }

    /// Returns true if log-out is earlier than log-in.
    pub fn is_inverted(&self) -> bool {
        matches!((self.log_in, self.log_out), (Some(log_in), Some(log_out)) if log_out < log_in)
    }
}

/// One day of attendance with its derived hours.
///
/// Construction never fails: missing times degrade to zero hours.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::AttendanceDay;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let day = AttendanceDay::new(
///     "10001",
///     NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     NaiveTime::from_hms_opt(8, 0, 0),
///     NaiveTime::from_hms_opt(17, 0, 0),
/// );
/// assert_eq!(day.hours_worked(), Decimal::from(8));
/// assert_eq!(day.late_hours(), Decimal::ZERO);
/// assert_eq!(day.overtime_hours(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceDay {
    employee_id: String,
    date: NaiveDate,
    log_in: Option<NaiveTime>,
    log_out: Option<NaiveTime>,
    within_grace_period: bool,
    late_hours: Decimal,
    hours_worked: Decimal,
    overtime_hours: Decimal,
}

impl AttendanceDay {
    /// Derives a day using the default attendance policy
    /// (08:10 grace cutoff, 1 hour unpaid break, 8 regular hours).
    pub fn new(
        employee_id: impl Into<String>,
        date: NaiveDate,
        log_in: Option<NaiveTime>,
        log_out: Option<NaiveTime>,
    ) -> Self {
        Self::with_policy(employee_id, date, log_in, log_out, &AttendancePolicy::default())
    }

    /// Derives a day using the given attendance policy.
    pub fn with_policy(
        employee_id: impl Into<String>,
        date: NaiveDate,
        log_in: Option<NaiveTime>,
        log_out: Option<NaiveTime>,
        policy: &AttendancePolicy,
    ) -> Self {
        let within_grace_period = log_in.is_some_and(|t| t <= policy.grace_cutoff);

        let late_hours = match log_in {
            Some(t) if t > policy.grace_cutoff => {
                seconds_to_hours((t - policy.grace_cutoff).num_seconds())
            }
            _ => Decimal::ZERO,
        };

        let hours_worked = match (log_in, log_out) {
            (Some(start), Some(end)) => {
                let elapsed = elapsed_seconds(start, end);
                (seconds_to_hours(elapsed) - policy.unpaid_break_hours).max(Decimal::ZERO)
            }
            _ => Decimal::ZERO,
        };

        let overtime_hours = (hours_worked - policy.regular_hours_per_day).max(Decimal::ZERO);

        Self {
            employee_id: employee_id.into(),
            date,
            log_in,
            log_out,
            within_grace_period,
            late_hours,
            hours_worked,
            overtime_hours,
        }
    }

    /// Derives a day from a raw record.
    pub fn from_record(record: &AttendanceRecord, policy: &AttendancePolicy) -> Self {
        Self::with_policy(
            record.employee_id.clone(),
            record.date,
            record.log_in,
            record.log_out,
            policy,
        )
    }

    /// The employee this day belongs to.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// The calendar date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The log-in time, if any.
    pub fn log_in(&self) -> Option<NaiveTime> {
        self.log_in
    }

    /// The log-out time, if any.
    pub fn log_out(&self) -> Option<NaiveTime> {
        self.log_out
    }

    /// True iff a log-in is present and not after the grace cutoff.
    pub fn is_within_grace_period(&self) -> bool {
        self.within_grace_period
    }

    /// Hours between the grace cutoff and log-in; zero when on time.
    pub fn late_hours(&self) -> Decimal {
        self.late_hours
    }

    /// Paid hours: elapsed time minus the unpaid break, never negative.
    pub fn hours_worked(&self) -> Decimal {
        self.hours_worked
    }

    /// Hours beyond the regular day.
    pub fn overtime_hours(&self) -> Decimal {
        self.overtime_hours
    }
}

// Log-out before log-in means the shift crossed midnight.
fn elapsed_seconds(start: NaiveTime, end: NaiveTime) -> i64 {
    let delta = (end - start).num_seconds();
    if delta < 0 { delta + SECONDS_PER_DAY } else { delta }
}

fn seconds_to_hours(seconds: i64) -> Decimal {
    Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)
}
