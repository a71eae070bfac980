//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{SalaryEngine, compute_payroll_summary, tax_bracket_table};
use crate::error::{EngineError, EngineResult};
use crate::models::{Actor, Capability, PayrollSummary, YearMonth};

use super::request::{OverrideRequest, PayrollRequest};
use super::response::{ApiError, ApiErrorResponse, HealthResponse, TaxBracketsResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/tax/brackets", get(tax_brackets_handler))
        .route("/payroll/summary", post(summary_handler))
        .route("/payroll/gross", post(gross_handler))
        .route("/payroll/override", post(override_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            schedule: state.loader().metadata().code.clone(),
        },
    )
}

async fn tax_brackets_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        TaxBracketsResponse {
            schedule: state.loader().metadata().code.clone(),
            brackets: tax_bracket_table(state.config().withholding_tax()),
        },
    )
}

/// Handler for POST /payroll/summary.
///
/// Computes the full monthly breakdown. The month defaults to the current
/// one when omitted.
async fn summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll summary request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let employee_id = request.employee.employee_id.clone();
    if let Err(err) = authorize_view(&request.requested_by, &employee_id) {
        return error_response(correlation_id, err);
    }

    let month = request.month.unwrap_or_else(YearMonth::current);
    let source = request.record_source();

    let start_time = Instant::now();
    match compute_payroll_summary(&employee_id, month, &source, state.config()) {
        Ok(summary) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                month = %month,
                status = ?summary.status,
                net_monthly_pay = %summary.figures.net_monthly_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll summary completed"
            );
            json_response(StatusCode::OK, summary)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll/gross. The month is required.
async fn gross_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing gross pay request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let employee_id = request.employee.employee_id.clone();
    if let Err(err) = authorize_view(&request.requested_by, &employee_id) {
        return error_response(correlation_id, err);
    }

    let Some(month) = request.month else {
        return error_response(
            correlation_id,
            EngineError::MissingInput {
                field: "month".to_string(),
            },
        );
    };

    let source = request.record_source();
    match SalaryEngine::new(state.config()).compute_month(&employee_id, month, &source, 1) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                month = %month,
                gross_pay = %result.gross_pay,
                "Gross pay completed"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll/override.
///
/// Echoes caller-supplied figures as a summary without recomputing them.
async fn override_handler(payload: Result<Json<OverrideRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll override request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(err) = authorize(
        &request.requested_by,
        Capability::ProcessPayroll,
        "override payroll figures",
    ) {
        return error_response(correlation_id, err);
    }

    if !request.figures.is_consistent() {
        warn!(
            correlation_id = %correlation_id,
            employee_id = %request.employee.employee_id,
            "Override figures do not satisfy payroll identities"
        );
    }

    let summary = PayrollSummary::from_precomputed(
        request.employee,
        request.month,
        request.figures,
        request.tax_bracket_explanation,
    );
    info!(
        correlation_id = %correlation_id,
        employee_id = %summary.employee.employee_id,
        overridden_by = %request.requested_by.employee_id,
        "Payroll override recorded"
    );
    json_response(StatusCode::OK, summary)
}

fn authorize_view(actor: &Actor, employee_id: &str) -> EngineResult<()> {
    if actor.may_view_payroll_of(employee_id) {
        Ok(())
    } else {
        Err(EngineError::PermissionDenied {
            role: actor.role.to_string(),
            action: format!("view payroll of employee {}", employee_id),
        })
    }
}

fn authorize(actor: &Actor, capability: Capability, action: &str) -> EngineResult<()> {
    if actor.role.can(capability) {
        Ok(())
    } else {
        Err(EngineError::PermissionDenied {
            role: actor.role.to_string(),
            action: action.to_string(),
        })
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
