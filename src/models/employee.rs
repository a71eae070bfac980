//! Employee master data, roles and capabilities.
//!
//! Master data arrives from the record source as textual key/value pairs,
//! exactly as it is kept by the record store. Parsing of the numeric fields
//! happens in the calculators, which decide whether a bad value is fatal
//! (hourly rate) or degrades to zero (allowances).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known master-data keys.
pub mod fields {
    /// Job position; drives overtime eligibility.
    pub const POSITION: &str = "position";
    /// Department name.
    pub const DEPARTMENT: &str = "department";
    /// Hourly rate as text.
    pub const HOURLY_RATE: &str = "hourly_rate";
    /// Monthly rice subsidy as text.
    pub const RICE_SUBSIDY: &str = "rice_subsidy";
    /// Monthly phone allowance as text.
    pub const PHONE_ALLOWANCE: &str = "phone_allowance";
    /// Monthly clothing allowance as text.
    pub const CLOTHING_ALLOWANCE: &str = "clothing_allowance";
}

/// An employee's master-data record.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::{EmployeeRecord, fields};
///
/// let record = EmployeeRecord::new("10001")
///     .with_field(fields::POSITION, "Account Rank and File")
///     .with_field(fields::HOURLY_RATE, "133.93");
///
/// assert_eq!(record.field(fields::POSITION), Some("Account Rank and File"));
/// assert_eq!(record.field(fields::DEPARTMENT), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique identifier for the employee.
    pub employee_id: String,
    /// Remaining master-data fields, keyed by name.
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

impl EmployeeRecord {
    /// Creates a record with no fields.
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Adds or replaces a field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns a field's raw text, if present.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// What an actor is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// See one's own payslip.
    ViewOwnPayslip,
    /// File a leave request.
    FileLeave,
    /// See any employee's payroll.
    ViewPayroll,
    /// Run payroll and override computed figures.
    ProcessPayroll,
    /// Approve or deny leave requests.
    ApproveLeave,
    /// Create and update employee records.
    ManageEmployees,
    /// Manage user accounts.
    ManageAccounts,
}

/// The role an actor holds. Every role is also an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular employee.
    Employee,
    /// Human resources.
    Hr,
    /// IT administration.
    It,
    /// Accounting and payroll.
    Accounting,
    /// Line manager of other employees.
    ImmediateSupervisor,
}

impl Role {
    /// Returns true if the role grants the capability.
    ///
    /// ```
    /// use payroll_engine::models::{Capability, Role};
    ///
    /// assert!(Role::Accounting.can(Capability::ProcessPayroll));
    /// assert!(!Role::It.can(Capability::ViewPayroll));
    /// ```
    pub fn can(self, capability: Capability) -> bool {
        use Capability::*;

        match capability {
            ViewOwnPayslip | FileLeave => true,
            ViewPayroll => matches!(self, Role::Hr | Role::Accounting),
            ProcessPayroll => self == Role::Accounting,
            ApproveLeave => matches!(self, Role::Hr | Role::ImmediateSupervisor),
            ManageEmployees => self == Role::Hr,
            ManageAccounts => self == Role::It,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Employee => "employee",
            Role::Hr => "hr",
            Role::It => "it",
            Role::Accounting => "accounting",
            Role::ImmediateSupervisor => "immediate_supervisor",
        };
        f.write_str(name)
    }
}

/// The identity making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor's own employee id.
    pub employee_id: String,
    /// The actor's role.
    pub role: Role,
}

impl Actor {
    /// Returns true if the actor may view payroll figures for `employee_id`.
    ///
    /// Payroll roles may view anyone; everybody may view their own.
    pub fn may_view_payroll_of(&self, employee_id: &str) -> bool {
        self.role.can(Capability::ViewPayroll)
            || (self.role.can(Capability::ViewOwnPayslip) && self.employee_id == employee_id)
    }
}
