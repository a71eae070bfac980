//! Leave balance and leave request models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Category of leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    /// Planned vacation leave.
    Vacation,
    /// Sick leave.
    Sick,
    /// Emergency leave.
    Emergency,
}

impl fmt::Display for LeaveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeaveCategory::Vacation => "vacation",
            LeaveCategory::Sick => "sick",
            LeaveCategory::Emergency => "emergency",
        };
        f.write_str(name)
    }
}

/// Remaining leave days per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    remaining: BTreeMap<LeaveCategory, u32>,
}

impl LeaveBalance {
    /// Creates a balance from (category, days) pairs.
    pub fn new(entries: impl IntoIterator<Item = (LeaveCategory, u32)>) -> Self {
        Self {
            remaining: entries.into_iter().collect(),
        }
    }

    /// Days left in a category; zero if the category was never granted.
    pub fn remaining(&self, category: LeaveCategory) -> u32 {
        self.remaining.get(&category).copied().unwrap_or(0)
    }

    /// Subtracts days from a category. Returns false, leaving the balance
    /// untouched, if not enough days remain.
    pub fn debit(&mut self, category: LeaveCategory, days: u32) -> bool {
        let left = self.remaining(category);
        if days > left {
            return false;
        }
        self.remaining.insert(category, left - days);
        true
    }
}

/// Lifecycle of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; days were debited.
    Approved,
    /// Denied; balance untouched.
    Denied,
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Denied => "denied",
        };
        f.write_str(name)
    }
}

/// A request for leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Sequence-generated id.
    pub request_id: u64,
    /// The requesting employee.
    pub employee_id: String,
    /// Leave category.
    pub category: LeaveCategory,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Free-text reason.
    pub reason: String,
    /// Current status.
    pub status: LeaveStatus,
    /// Who approved or denied the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
}

impl LeaveRequest {
    /// Number of calendar days covered, inclusive of both ends.
    pub fn days(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days() + 1;
        u32::try_from(span).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_balance_debit_within_limit() {
        let mut balance = LeaveBalance::new([(LeaveCategory::Vacation, 5)]);
        assert!(balance.debit(LeaveCategory::Vacation, 3));
        assert_eq!(balance.remaining(LeaveCategory::Vacation), 2);
    }

    #[test]
    fn test_balance_debit_over_limit_is_rejected() {
        let mut balance = LeaveBalance::new([(LeaveCategory::Sick, 1)]);
        assert!(!balance.debit(LeaveCategory::Sick, 2));
        assert_eq!(balance.remaining(LeaveCategory::Sick), 1);
    }

    #[test]
    fn test_ungranted_category_has_zero_remaining() {
        let balance = LeaveBalance::default();
        assert_eq!(balance.remaining(LeaveCategory::Emergency), 0);
    }

    #[test]
    fn test_request_days_inclusive() {
        let request = LeaveRequest {
            request_id: 1,
            employee_id: "10001".to_string(),
            category: LeaveCategory::Vacation,
            start_date: date(10),
            end_date: date(12),
            reason: "trip".to_string(),
            status: LeaveStatus::Pending,
            decided_by: None,
        };
        assert_eq!(request.days(), 3);
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&LeaveCategory::Emergency).unwrap(),
            "\"emergency\""
        );
    }
}
