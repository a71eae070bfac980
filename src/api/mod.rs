//! HTTP API module for the Payroll Engine.
//!
//! This module provides the REST API endpoints for computing monthly
//! payroll summaries and inspecting the withholding tax schedule.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{AttendanceRowRequest, OverrideRequest, PayrollRequest};
pub use response::{ApiError, ApiErrorResponse, HealthResponse, TaxBracketsResponse};
pub use state::AppState;
