//! Record source abstraction.
//!
//! The payroll pipeline reads master data and attendance through the
//! [`RecordSource`] trait. It never writes, and it performs its own month
//! filtering: sources return every attendance row they hold for an employee.

use std::collections::HashMap;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, EmployeeRecord};

/// Read-only access to employee master data and attendance rows.
///
/// Implementations shared across threads must be safe for concurrent reads.
pub trait RecordSource: Send + Sync {
    /// Returns the master-data record for an employee, or `None` if absent.
    fn employee_record(&self, employee_id: &str) -> EngineResult<Option<EmployeeRecord>>;

    /// Returns all attendance rows for an employee, unfiltered.
    fn attendance_rows(&self, employee_id: &str) -> EngineResult<Vec<AttendanceRecord>>;
}

impl<T: RecordSource + ?Sized> RecordSource for &T {
    fn employee_record(&self, employee_id: &str) -> EngineResult<Option<EmployeeRecord>> {
        (**self).employee_record(employee_id)
    }

    fn attendance_rows(&self, employee_id: &str) -> EngineResult<Vec<AttendanceRecord>> {
        (**self).attendance_rows(employee_id)
    }
}

/// A record source held entirely in memory.
///
/// Attendance rows are returned in insertion order.
///
/// # Examples
///
/// ```
/// use payroll_engine::record_source::{InMemoryRecordSource, RecordSource};
/// use payroll_engine::models::{AttendanceRecord, EmployeeRecord};
/// use chrono::{NaiveDate, NaiveTime};
///
/// let mut source = InMemoryRecordSource::new();
/// source.insert_employee(EmployeeRecord::new("10001"));
/// source.push_attendance(AttendanceRecord::new(
///     "10001",
///     NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
/// ));
///
/// assert!(source.employee_record("10001").unwrap().is_some());
/// assert_eq!(source.attendance_rows("10001").unwrap().len(), 1);
/// assert!(source.attendance_rows("99999").unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    employees: HashMap<String, EmployeeRecord>,
    attendance: HashMap<String, Vec<AttendanceRecord>>,
}

impl InMemoryRecordSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an employee record.
    pub fn insert_employee(&mut self, record: EmployeeRecord) {
        self.employees.insert(record.employee_id.clone(), record);
    }

    /// Appends an attendance row.
    pub fn push_attendance(&mut self, record: AttendanceRecord) {
        self.attendance
            .entry(record.employee_id.clone())
            .or_default()
            .push(record);
    }

    /// Appends many attendance rows.
    pub fn extend_attendance(&mut self, records: impl IntoIterator<Item = AttendanceRecord>) {
        for record in records {
            self.push_attendance(record);
        }
    }

    /// Builder-style variant of [`insert_employee`](Self::insert_employee).
    pub fn with_employee(mut self, record: EmployeeRecord) -> Self {
        self.insert_employee(record);
        self
    }

    /// Builder-style variant of [`extend_attendance`](Self::extend_attendance).
    pub fn with_attendance(mut self, records: impl IntoIterator<Item = AttendanceRecord>) -> Self {
        self.extend_attendance(records);
        self
    }
}

impl RecordSource for InMemoryRecordSource {
    fn employee_record(&self, employee_id: &str) -> EngineResult<Option<EmployeeRecord>> {
        Ok(self.employees.get(employee_id).cloned())
    }

    fn attendance_rows(&self, employee_id: &str) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .attendance
            .get(employee_id)
            .cloned()
            .unwrap_or_default())
    }
}
