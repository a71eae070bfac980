//! Integration tests for the Payroll Engine.
//!
//! This test suite covers:
//! - A full month through the HTTP API, with lateness and overtime
//! - Statutory contribution and tax boundary values
//! - Attendance day derivations
//! - Overtime eligibility by position
//! - Zero-attendance months and idempotent recomputation
//! - Manual override summaries
//! - The leave request workflow

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{DeductionEngine, SalaryEngine, compute_payroll_summary};
use payroll_engine::config::{ConfigLoader, PayrollConfig};
use payroll_engine::leave::LeaveLedger;
use payroll_engine::models::{
    Actor, AttendanceDay, AttendanceRecord, EmployeeRecord, LeaveBalance, LeaveCategory,
    LeaveStatus, Role, SummaryStatus, YearMonth, fields,
};
use payroll_engine::record_source::InMemoryRecordSource;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/ph_2024").expect("Failed to load config");
    create_router(AppState::new(config))
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn june() -> YearMonth {
    YearMonth::new(2024, 6).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Weekdays of June 2024.
fn june_workdays() -> Vec<u32> {
    [3..=7, 10..=14, 17..=21, 24..=28]
        .into_iter()
        .flatten()
        .collect()
}

/// 20 workdays at 08:00-17:00, except a late start with overtime on the 3rd
/// and a late start on the 10th.
fn june_attendance_json() -> Vec<Value> {
    june_workdays()
        .into_iter()
        .map(|day| {
            let (log_in, log_out) = match day {
                3 => ("09:10:00", "19:10:00"),
                10 => ("08:40:00", "17:40:00"),
                _ => ("08:00:00", "17:00:00"),
            };
            json!({
                "date": format!("2024-06-{:02}", day),
                "log_in": log_in,
                "log_out": log_out,
            })
        })
        .collect()
}

fn summary_request(role: &str, attendance: Vec<Value>) -> Value {
    json!({
        "requested_by": { "employee_id": "10020", "role": role },
        "employee": {
            "employee_id": "10007",
            "position": "Account Rank and File",
            "department": "Accounting",
            "hourly_rate": "150",
            "rice_subsidy": "1500",
            "phone_allowance": "500",
            "clothing_allowance": "1000"
        },
        "attendance": attendance,
        "month": "2024-06"
    })
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn figure(body: &Value, name: &str) -> Decimal {
    decimal(body["figures"][name].as_str().unwrap())
}

fn source_with_position(position: &str, rows: Vec<AttendanceRecord>) -> InMemoryRecordSource {
    InMemoryRecordSource::new()
        .with_employee(
            EmployeeRecord::new("10001")
                .with_field(fields::POSITION, position)
                .with_field(fields::HOURLY_RATE, "100"),
        )
        .with_attendance(rows)
}

// =============================================================================
// Full month through the API
// =============================================================================

#[tokio::test]
async fn test_full_month_summary() {
    let (status, body) = post_json(
        create_router_for_test(),
        "/payroll/summary",
        summary_request("accounting", june_attendance_json()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "computed");
    assert_eq!(body["payroll_month"], "2024-06");

    // 161 paid hours at 150, one overtime hour at 1.25x
    assert_eq!(figure(&body, "basic_salary"), decimal("24150"));
    assert_eq!(figure(&body, "gross_salary"), decimal("24337.5"));
    assert_eq!(decimal(body["overtime_pay"].as_str().unwrap()), decimal("187.5"));

    assert_eq!(figure(&body, "sss_deduction"), decimal("1102.50"));
    assert_eq!(figure(&body, "phil_health_deduction"), decimal("365.0625"));
    assert_eq!(figure(&body, "pag_ibig_deduction"), decimal("100"));

    // 1.5 late hours at 150, subtracted before tax
    assert_eq!(figure(&body, "late_deduction"), decimal("225"));
    assert_eq!(figure(&body, "taxable_income"), decimal("22544.9375"));
    assert_eq!(figure(&body, "withholding_tax"), decimal("342.3875"));
    assert_eq!(figure(&body, "total_deductions"), decimal("2134.95"));
    assert_eq!(figure(&body, "net_monthly_pay"), decimal("22202.55"));

    assert_eq!(body["hours"]["days_counted"], 20);
    assert_eq!(decimal(body["hours"]["late_hours"].as_str().unwrap()), decimal("1.5"));
    assert_eq!(
        decimal(body["employee"]["allowances"]["phone_allowance"].as_str().unwrap()),
        decimal("500")
    );

    let explanation = body["tax_bracket_explanation"].as_str().unwrap();
    assert!(explanation.contains("20,833 to 33,332"));
    assert!(explanation.ends_with("= 342.39"));
}

#[tokio::test]
async fn test_summary_defaults_to_current_month() {
    let mut request = summary_request("hr", june_attendance_json());
    request.as_object_mut().unwrap().remove("month");

    let (status, body) = post_json(create_router_for_test(), "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payroll_month"], YearMonth::current().to_string());
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let request = summary_request("janitor", vec![]);
    let (status, body) = post_json(create_router_for_test(), "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_non_positive_rate_is_rejected() {
    let mut request = summary_request("hr", june_attendance_json());
    request["employee"]["hourly_rate"] = json!("0");

    let (status, body) = post_json(create_router_for_test(), "/payroll/summary", request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NON_POSITIVE_RATE");
}

// =============================================================================
// Contribution and tax boundaries
// =============================================================================

#[test]
fn test_contribution_boundaries() {
    let config = PayrollConfig::default();
    let engine = DeductionEngine::new(&config);

    for gross in ["0", "100", "3249.99"] {
        assert_eq!(engine.sss(decimal(gross)), decimal("135.00"));
    }
    assert_eq!(engine.sss(decimal("24750")), decimal("1102.50"));
    assert_eq!(engine.sss(decimal("30000")), decimal("1125.00"));

    assert_eq!(engine.phil_health(decimal("24337.5")), decimal("365.0625"));

    assert_eq!(engine.pag_ibig(decimal("10000")), decimal("100.00"));
    assert_eq!(engine.pag_ibig(decimal("1000")), decimal("20.00"));
}

#[test]
fn test_tax_boundaries() {
    let config = PayrollConfig::default();
    let engine = DeductionEngine::new(&config);

    assert_eq!(engine.tax(decimal("20832")), Decimal::ZERO);
    // (20833 - 20833) * 0.20
    assert_eq!(engine.tax(decimal("20833")), Decimal::ZERO);
    assert_eq!(engine.tax(decimal("20834")), decimal("0.20"));
    assert_eq!(engine.tax(decimal("666667")), decimal("200833.33"));
}

// =============================================================================
// Attendance days and overtime eligibility
// =============================================================================

#[test]
fn test_attendance_day_derivations() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

    let regular = AttendanceDay::new("10001", date, Some(time(8, 0)), Some(time(17, 0)));
    assert_eq!(regular.hours_worked(), decimal("8"));
    assert_eq!(regular.late_hours(), Decimal::ZERO);
    assert_eq!(regular.overtime_hours(), Decimal::ZERO);

    let late = AttendanceDay::new("10001", date, Some(time(9, 0)), Some(time(19, 0)));
    assert_eq!(late.hours_worked(), decimal("9"));
    assert_eq!(late.overtime_hours(), decimal("1"));
    assert_eq!(late.late_hours().round_dp(3), decimal("0.833"));
}

#[test]
fn test_overtime_eligibility_by_position() {
    let config = PayrollConfig::default();
    let engine = SalaryEngine::new(&config);
    let rows = vec![AttendanceRecord::new(
        "10001",
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        time(8, 0),
        time(19, 0),
    )];

    let eligible = engine
        .gross_monthly_salary("10001", june(), &source_with_position("HR Rank and File", rows.clone()))
        .unwrap();
    let not_eligible = engine
        .gross_monthly_salary("10001", june(), &source_with_position("HR Manager", rows))
        .unwrap();

    assert_eq!(eligible - not_eligible, decimal("250"));
}

// =============================================================================
// Zero attendance, idempotence and overrides
// =============================================================================

#[test]
fn test_zero_attendance_month() {
    let config = PayrollConfig::default();
    let source = source_with_position("HR Rank and File", vec![]);

    let summary = compute_payroll_summary("10001", june(), &source, &config).unwrap();

    assert_eq!(summary.status, SummaryStatus::NoAttendance);
    assert_eq!(summary.figures.gross_salary, Decimal::ZERO);
    assert_eq!(summary.figures.net_monthly_pay, Decimal::ZERO);
}

#[test]
fn test_recomputation_is_bit_identical() {
    let config = PayrollConfig::default();
    let rows = june_workdays()
        .into_iter()
        .map(|day| {
            AttendanceRecord::new(
                "10001",
                NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                time(8, 7 + day % 13),
                time(17, 3 * (day % 20)),
            )
        })
        .collect();
    let source = source_with_position("HR Rank and File", rows);

    let first = compute_payroll_summary("10001", june(), &source, &config).unwrap();
    let second = compute_payroll_summary("10001", june(), &source, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_switching_months_recomputes_everything() {
    let config = PayrollConfig::default();
    let rows = vec![
        AttendanceRecord::new("10001", NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(), time(8, 0), time(17, 0)),
        AttendanceRecord::new("10001", NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(), time(9, 10), time(17, 0)),
    ];
    let source = source_with_position("HR Manager", rows);

    let june_summary = compute_payroll_summary("10001", june(), &source, &config).unwrap();
    let july_summary =
        compute_payroll_summary("10001", YearMonth::new(2024, 7).unwrap(), &source, &config).unwrap();

    assert_eq!(june_summary.figures.late_deduction, Decimal::ZERO);
    assert_eq!(july_summary.figures.late_deduction, decimal("100"));
    assert_eq!(july_summary.payroll_month, YearMonth::new(2024, 7).unwrap());
}

#[tokio::test]
async fn test_override_is_taken_verbatim() {
    let request = json!({
        "requested_by": { "employee_id": "10020", "role": "accounting" },
        "employee": {
            "employee_id": "10007",
            "position": "Account Rank and File",
            "department": "Accounting",
            "hourly_rate": "150",
            "allowances": { "rice_subsidy": "1500", "phone_allowance": "500", "clothing_allowance": "1000" }
        },
        "month": "2024-05",
        "figures": {
            "basic_salary": "24000", "gross_salary": "24500", "sss_deduction": "1102.50",
            "phil_health_deduction": "367.50", "pag_ibig_deduction": "100",
            "late_deduction": "0", "taxable_income": "22930", "withholding_tax": "419.40",
            "total_deductions": "1989.40", "net_monthly_pay": "22510.60"
        },
        "tax_bracket_explanation": "computed by the legacy payroll run"
    });

    let (status, body) = post_json(create_router_for_test(), "/payroll/override", request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "manual_override");
    assert_eq!(figure(&body, "net_monthly_pay"), decimal("22510.60"));
    assert_eq!(decimal(body["overtime_pay"].as_str().unwrap()), decimal("500"));
    assert_eq!(body["tax_bracket_explanation"], "computed by the legacy payroll run");
}

// =============================================================================
// Leave workflow
// =============================================================================

#[test]
fn test_leave_request_lifecycle() {
    let employee = Actor {
        employee_id: "10007".to_string(),
        role: Role::Employee,
    };
    let hr = Actor {
        employee_id: "10002".to_string(),
        role: Role::Hr,
    };

    let mut ledger = LeaveLedger::default();
    ledger.set_balance(
        "10007",
        LeaveBalance::new([
            (LeaveCategory::Vacation, 10),
            (LeaveCategory::Sick, 5),
            (LeaveCategory::Emergency, 3),
        ]),
    );

    let vacation = ledger
        .submit(
            &employee,
            LeaveCategory::Vacation,
            NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 12).unwrap(),
            "family trip",
        )
        .unwrap()
        .request_id;
    let sick = ledger
        .submit(
            &employee,
            LeaveCategory::Sick,
            NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
            "fever",
        )
        .unwrap()
        .request_id;

    assert_eq!(ledger.approve(&hr, vacation).unwrap().status, LeaveStatus::Approved);
    assert_eq!(ledger.deny(&hr, sick).unwrap().status, LeaveStatus::Denied);

    let balance = ledger.balance("10007").unwrap();
    assert_eq!(balance.remaining(LeaveCategory::Vacation), 7);
    assert_eq!(balance.remaining(LeaveCategory::Sick), 5);
    assert_eq!(ledger.requests_for("10007").count(), 2);
}
