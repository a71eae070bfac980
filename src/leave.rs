//! Leave administration.
//!
//! The [`LeaveLedger`] owns leave balances and leave requests, and hands out
//! request ids from its own [`LeaveRequestSequence`]. Role checks happen at
//! each operation.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Capability, LeaveBalance, LeaveCategory, LeaveRequest, LeaveStatus};

/// Monotonic id generator for leave requests.
#[derive(Debug, Clone)]
pub struct LeaveRequestSequence {
    next: u64,
}

impl Default for LeaveRequestSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl LeaveRequestSequence {
    /// Starts the sequence at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Returns the next id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Leave balances and requests for a set of employees.
#[derive(Debug, Clone, Default)]
pub struct LeaveLedger {
    sequence: LeaveRequestSequence,
    balances: HashMap<String, LeaveBalance>,
    requests: BTreeMap<u64, LeaveRequest>,
}

impl LeaveLedger {
    /// Creates an empty ledger whose ids come from `sequence`.
    pub fn with_sequence(sequence: LeaveRequestSequence) -> Self {
        Self {
            sequence,
            ..Self::default()
        }
    }

    /// Sets an employee's balance, replacing any previous one.
    pub fn set_balance(&mut self, employee_id: impl Into<String>, balance: LeaveBalance) {
        self.balances.insert(employee_id.into(), balance);
    }

    /// Returns an employee's balance.
    pub fn balance(&self, employee_id: &str) -> Option<&LeaveBalance> {
        self.balances.get(employee_id)
    }

    /// Returns a request by id.
    pub fn request(&self, request_id: u64) -> Option<&LeaveRequest> {
        self.requests.get(&request_id)
    }

    /// All requests filed by an employee, oldest first.
    pub fn requests_for<'a>(
        &'a self,
        employee_id: &'a str,
    ) -> impl Iterator<Item = &'a LeaveRequest> + 'a {
        self.requests
            .values()
            .filter(move |r| r.employee_id == employee_id)
    }

    /// Files a leave request for the actor.
    ///
    /// The balance is checked but not debited until approval.
    pub fn submit(
        &mut self,
        actor: &Actor,
        category: LeaveCategory,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: impl Into<String>,
    ) -> EngineResult<&LeaveRequest> {
        require(actor, Capability::FileLeave, "file leave")?;

        if end_date < start_date {
            return Err(EngineError::InvalidLeavePeriod {
                message: format!("end date {} is before start date {}", end_date, start_date),
            });
        }

        let mut request = LeaveRequest {
            request_id: 0,
            employee_id: actor.employee_id.clone(),
            category,
            start_date,
            end_date,
            reason: reason.into(),
            status: LeaveStatus::Pending,
            decided_by: None,
        };

        let remaining = self.remaining(&actor.employee_id, category);
        if request.days() > remaining {
            return Err(EngineError::InsufficientLeaveBalance {
                category: category.to_string(),
                requested: request.days(),
                remaining,
            });
        }

        request.request_id = self.sequence.next_id();
        let request_id = request.request_id;
        info!(
            request_id,
            employee_id = %request.employee_id,
            category = %category,
            days = request.days(),
            "Leave request filed"
        );

        Ok(&*self.requests.entry(request_id).or_insert(request))
    }

    /// Approves a pending request and debits the employee's balance.
    pub fn approve(&mut self, actor: &Actor, request_id: u64) -> EngineResult<&LeaveRequest> {
        let (employee_id, category, days) = {
            let request = self.pending_request(actor, request_id, LeaveStatus::Approved)?;
            (request.employee_id.clone(), request.category, request.days())
        };

        let remaining = self.remaining(&employee_id, category);
        let debited = self
            .balances
            .get_mut(&employee_id)
            .is_some_and(|balance| balance.debit(category, days));
        if !debited {
            return Err(EngineError::InsufficientLeaveBalance {
                category: category.to_string(),
                requested: days,
                remaining,
            });
        }

        self.decide(actor, request_id, LeaveStatus::Approved)
    }

    /// Denies a pending request; the balance is untouched.
    pub fn deny(&mut self, actor: &Actor, request_id: u64) -> EngineResult<&LeaveRequest> {
        self.pending_request(actor, request_id, LeaveStatus::Denied)?;
        self.decide(actor, request_id, LeaveStatus::Denied)
    }

    fn remaining(&self, employee_id: &str, category: LeaveCategory) -> u32 {
        self.balances
            .get(employee_id)
            .map(|b| b.remaining(category))
            .unwrap_or(0)
    }

    fn pending_request(
        &self,
        actor: &Actor,
        request_id: u64,
        to: LeaveStatus,
    ) -> EngineResult<&LeaveRequest> {
        require(actor, Capability::ApproveLeave, "decide leave requests")?;

        let request = self
            .requests
            .get(&request_id)
            .ok_or(EngineError::LeaveRequestNotFound { request_id })?;

        if request.employee_id == actor.employee_id {
            return Err(EngineError::PermissionDenied {
                role: actor.role.to_string(),
                action: "decide their own leave request".to_string(),
            });
        }

        if request.status != LeaveStatus::Pending {
            return Err(EngineError::InvalidLeaveTransition {
                request_id,
                from: request.status.to_string(),
                to: to.to_string(),
            });
        }

        Ok(request)
    }

    fn decide(
        &mut self,
        actor: &Actor,
        request_id: u64,
        status: LeaveStatus,
    ) -> EngineResult<&LeaveRequest> {
        let request = self
            .requests
            .get_mut(&request_id)
            .ok_or(EngineError::LeaveRequestNotFound { request_id })?;

        request.status = status;
        request.decided_by = Some(actor.employee_id.clone());
        info!(
            request_id,
            employee_id = %request.employee_id,
            status = %status,
            decided_by = %actor.employee_id,
            "Leave request decided"
        );

        Ok(&*request)
    }
}

fn require(actor: &Actor, capability: Capability, action: &str) -> EngineResult<()> {
    if actor.role.can(capability) {
        Ok(())
    } else {
        Err(EngineError::PermissionDenied {
            role: actor.role.to_string(),
            action: action.to_string(),
        })
    }
}
