//! Invocation requests from raw JSON to responses

use booker_export::config::{load_config_str, BookerExportConfig};
use booker_export::core::export::AppointmentDateType;
use booker_export::core::tasks::{
    run_without_browser, InvocationRequest, Response, Task, TaskInvocation,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use test_case::test_case;

const LA: Tz = chrono_tz::America::Los_Angeles;

fn config() -> BookerExportConfig {
    load_config_str(
        r#"
[booker]
account = "brand"
username = "user"
password = "pass"
"#,
    )
    .unwrap()
}

// 2024-03-10 06:30 UTC is still March 9th in Los Angeles
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 6, 30, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn resolve(json: &str) -> booker_export::domain::Result<TaskInvocation> {
    InvocationRequest::parse(json)?.resolve(&config(), now(), LA)
}

#[test]
fn test_gateway_body_is_unwrapped() {
    let json = r#"{"body": "{\"task\": \"orders\", \"location\": \"cda\", \"start_date\": \"2024-01-01\", \"end_date\": \"2024-01-25\"}"}"#;

    let invocation = resolve(json).unwrap();
    assert_eq!(invocation.task, Task::Orders);
    assert_eq!(invocation.locations.len(), 1);
    assert_eq!(invocation.locations[0].id.as_str(), "51309");
    assert_eq!(invocation.start, date(2024, 1, 1));
    assert_eq!(invocation.end, date(2024, 1, 25));
}

#[test]
fn test_dates_default_to_yesterday_in_zone() {
    let invocation = resolve(r#"{"task": "appointments"}"#).unwrap();
    assert_eq!(invocation.start, date(2024, 3, 8));
    assert_eq!(invocation.end, date(2024, 3, 8));
    let ids: Vec<&str> = invocation.locations.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["51309", "36085"]);
}

#[test]
fn test_inline_location() {
    let json = r#"{
        "task": "appointments",
        "location": {"id": "99999", "appointments_view_id": 1, "orders_view_id": 2},
        "start_date": "2024-02-01"
    }"#;

    let invocation = resolve(json).unwrap();
    assert_eq!(invocation.locations[0].id.as_str(), "99999");
    assert_eq!(invocation.start, date(2024, 2, 1));
    assert_eq!(invocation.end, date(2024, 3, 8));
}

#[test]
fn test_location_by_site_id() {
    let invocation = resolve(r#"{"task": "orders", "location": "36085"}"#).unwrap();
    assert_eq!(invocation.locations[0].orders_view_id.value(), 57650);
}

#[test]
fn test_booked_task_forces_created_date() {
    let invocation =
        resolve(r#"{"task": "appointments_booked", "date_type": "date_on"}"#).unwrap();
    assert_eq!(invocation.date_type, AppointmentDateType::DateCreated);
}

#[test_case(r#"{"task": "refunds"}"#, "Task not found"; "unknown task")]
#[test_case(r#"{}"#, "No task specified"; "missing task")]
#[test_case(r#"{"task": "orders", "location": "nowhere"}"#, "Unknown location 'nowhere'"; "unknown location")]
#[test_case(r#"{"task": "orders", "start_date": "2024-02-10", "end_date": "2024-02-01"}"#, "before start_date"; "inverted range")]
#[test_case(r#"{"task": "#, "Invalid request"; "malformed json")]
fn test_bad_requests_answer_400(json: &str, fragment: &str) {
    let err = resolve(json).unwrap_err();
    let response = Response::from_error(&err);

    assert_eq!(response.status_code, 400);
    assert!(response.message.starts_with("Bad Request - "));
    assert!(
        response.message.contains(fragment),
        "{} does not mention {fragment}",
        response.message
    );
}

#[test]
fn test_test_task_needs_no_browser() {
    let invocation = resolve(r#"{"task": "test"}"#).unwrap();
    let summary = run_without_browser(&invocation).unwrap().unwrap();
    assert!(summary.outcomes.is_empty());
}

#[test]
fn test_order_from_appointment_is_bad_request() {
    let invocation = resolve(r#"{"task": "order_from_appointment"}"#).unwrap();
    let err = run_without_browser(&invocation).unwrap().unwrap_err();

    let response = Response::from_error(&err);
    assert_eq!(response.status_code, 400);
    assert_eq!(
        serde_json::to_value(&response).unwrap()["statusCode"],
        serde_json::json!(400)
    );
}

#[test_case("weekly"; "weekly batch")]
#[test_case("monthly"; "monthly batch")]
#[test_case("completed_appointments"; "completed appointments")]
fn test_recognised_tasks_without_flows_are_bad_requests(task: &str) {
    let invocation = resolve(&format!(r#"{{"task": "{task}"}}"#)).unwrap();
    let err = run_without_browser(&invocation).unwrap().unwrap_err();

    let response = Response::from_error(&err);
    assert_eq!(response.status_code, 400);
    assert_eq!(
        response.message,
        format!("Bad Request - Task {task} is not supported")
    );
}

#[test]
fn test_all_customers_runs_the_customers_task() {
    let invocation = resolve(r#"{"task": "all_customers"}"#).unwrap();
    assert_eq!(invocation.task, Task::Customers);
}

#[test]
fn test_flow_failure_is_internal_error() {
    let err = booker_export::domain::BookerError::Io("disk full".to_string()).in_flow("orders");
    let response = Response::from_error(&err);
    assert_eq!(response.status_code, 500);
    assert_eq!(
        response.message,
        "Internal Server Error - orders flow failed: I/O error: disk full"
    );
}
