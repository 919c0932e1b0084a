//! Export flows driven end to end against the scripted browser
//!
//! Every test uses millisecond waits; the processing overlay is flashed by
//! the `change` event script the way the report pages show it after a new
//! date range is applied.

use booker_export::adapters::analytics::{EventSink, SegmentClient};
use booker_export::adapters::browser::locator::booker;
use booker_export::adapters::browser::{BrowserSession, MockAction, MockBrowser};
use booker_export::config::{secret_string, AnalyticsConfig, BookerUrls};
use booker_export::core::export::labels::link_label;
use booker_export::core::export::{
    AppointmentDateType, CustomerTimings, CustomerView, Exporter, FixedClock, FlowSettings,
};
use booker_export::core::relocate::FileRelocator;
use booker_export::core::tasks::{run_task, Task, TaskInvocation};
use booker_export::core::wait::{DownloadDirectory, WaitConfig};
use booker_export::domain::{BookerError, ExportError, Location, LocationId, ViewId};
use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ll() -> Location {
    Location::new(
        LocationId::new("36085").unwrap(),
        ViewId::new(57651),
        ViewId::new(57650),
    )
}

fn cda() -> Location {
    Location::new(
        LocationId::new("51309").unwrap(),
        ViewId::new(57707),
        ViewId::new(57738),
    )
}

fn settings() -> FlowSettings {
    FlowSettings {
        urls: BookerUrls::default(),
        waits: WaitConfig {
            wait_time: Duration::from_millis(200),
            element_poll: Duration::from_millis(2),
            loader_poll: Duration::from_millis(2),
            file_poll: Duration::from_millis(2),
        },
        timezone: chrono_tz::America::Los_Angeles,
        window_days: 11,
        location_switch_delay: Duration::ZERO,
        customers_location: ll(),
        customers: CustomerTimings {
            ok_button_delay: Duration::ZERO,
            after_ok_delay: Duration::ZERO,
            before_refresh_delay: Duration::ZERO,
            after_refresh_delay: Duration::ZERO,
            before_download_delay: Duration::ZERO,
            link_refresh_attempts: 2,
            link_wait: Duration::from_millis(10),
        },
        script_settle_delay: Duration::ZERO,
        orders_settle_delay: Duration::ZERO,
        orders_wait_for_overlay: true,
    }
}

/// Report page for `locations` whose export button drops `file_name`
fn report_page(locations: &[Location], scratch: &std::path::Path, file_name: &str) -> MockBrowser {
    let mut browser = MockBrowser::new()
        .with_element(booker::view_select())
        .with_element(booker::appointments_date_input())
        .with_element(booker::orders_date_input())
        .with_element(booker::export_button())
        .on_script("dispatchEvent", MockAction::Flash(booker::processing_overlay()))
        .on_click(
            booker::export_button(),
            MockAction::WriteFile {
                dir: scratch.to_path_buf(),
                name: file_name.to_string(),
            },
        );
    for location in locations {
        for view in [location.appointments_view_id, location.orders_view_id] {
            browser = browser
                .with_element(booker::view_option(view))
                .with_element(booker::selected_option(&view.to_string()));
        }
        browser = browser.with_element(booker::impersonate_link(&location.id));
    }
    browser
}

fn segment(endpoint: String) -> SegmentClient {
    SegmentClient::new(&AnalyticsConfig {
        enabled: true,
        write_key: Some(secret_string("wk_integration".to_string())),
        endpoint,
        ..AnalyticsConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_orders_export_every_window() {
    let scratch = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let settings = settings();
    let location = ll();
    let browser = report_page(&[location.clone()], scratch.path(), "Order.csv");

    let exporter = Exporter::new(
        &browser,
        &settings,
        DownloadDirectory::new(scratch.path()),
        FileRelocator::new(scratch.path(), Some(dest.path().to_path_buf())),
    );

    let outcome = exporter
        .orders(&location, date(2024, 1, 1), date(2024, 1, 25))
        .await
        .unwrap();

    let order_dir = dest.path().join("Order").join("36085");
    assert_eq!(
        outcome.files,
        vec![
            order_dir.join("Order 2024-01-01-2024-01-11.csv"),
            order_dir.join("Order 2024-01-12-2024-01-22.csv"),
            order_dir.join("Order 2024-01-23-2024-02-02.csv"),
        ]
    );
    assert!(outcome.files.iter().all(|f| f.exists()));
    assert_eq!(browser.click_count(&booker::export_button()), 3);

    let ranges: Vec<String> = browser
        .scripts()
        .into_iter()
        .filter(|s| s.contains(".val("))
        .collect();
    assert_eq!(ranges.len(), 3);
    assert!(ranges[2].contains("01/23/2024 - 02/02/2024"));
    assert!(!browser.is_terminated());
}

#[tokio::test]
async fn test_orders_without_overlay_fails_first_window() {
    let scratch = tempfile::tempdir().unwrap();
    let settings = settings();
    let location = ll();
    // No overlay flash, so the loader never appears
    let browser = MockBrowser::new()
        .with_element(booker::impersonate_link(&location.id))
        .with_element(booker::view_select())
        .with_element(booker::view_option(location.orders_view_id))
        .with_element(booker::selected_option(&location.orders_view_id.to_string()))
        .with_element(booker::orders_date_input())
        .with_element(booker::export_button());

    let exporter = Exporter::new(
        &browser,
        &settings,
        DownloadDirectory::new(scratch.path()),
        FileRelocator::new(scratch.path(), None),
    );

    let err = exporter
        .orders(&location, date(2024, 1, 1), date(2024, 1, 25))
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("orders flow failed"));
    assert_eq!(browser.click_count(&booker::export_button()), 0);
    assert!(browser.is_terminated());
}

#[tokio::test]
async fn test_appointments_task_covers_every_location() {
    let mut server = mockito::Server::new_async().await;
    let batch = server
        .mock("POST", "/v1/batch")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::Regex(r#""location":"36085""#.to_string()),
            mockito::Matcher::Regex(r#""location":"51309""#.to_string()),
        ]))
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let scratch = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let settings = settings();
    let locations = vec![cda(), ll()];
    let browser = report_page(&locations, scratch.path(), "Appointment.csv");
    let exporter = Exporter::new(
        &browser,
        &settings,
        DownloadDirectory::new(scratch.path()),
        FileRelocator::new(scratch.path(), Some(dest.path().to_path_buf())),
    );
    let sink = segment(format!("{}/v1/batch", server.url()));

    let invocation = TaskInvocation {
        task: Task::Appointments,
        locations,
        start: date(2024, 3, 1),
        end: date(2024, 3, 15),
        date_type: AppointmentDateType::DateOn,
    };
    let summary = run_task(&exporter, &invocation, &sink).await.unwrap();

    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.total_files(), 4);
    for id in ["51309", "36085"] {
        let dir = dest.path().join("Appointment").join(id);
        assert!(dir.join("Appointment 2024-03-01-2024-03-11.csv").exists());
        assert!(dir.join("Appointment 2024-03-12-2024-03-22.csv").exists());
    }

    assert_eq!(sink.pending(), 2);
    sink.flush(Duration::from_secs(5)).await.unwrap();
    assert_eq!(sink.pending(), 0);
    batch.assert_async().await;
}

#[tokio::test]
async fn test_orders_task_stops_at_first_failing_location() {
    let scratch = tempfile::tempdir().unwrap();
    let settings = settings();
    // Only the first location can be impersonated
    let browser = report_page(&[ll()], scratch.path(), "Order.csv");
    let exporter = Exporter::new(
        &browser,
        &settings,
        DownloadDirectory::new(scratch.path()),
        FileRelocator::new(scratch.path(), None),
    );
    let sink = segment("http://127.0.0.1:9/v1/batch".to_string());

    let invocation = TaskInvocation {
        task: Task::Orders,
        locations: vec![ll(), cda()],
        start: date(2024, 1, 1),
        end: date(2024, 1, 1),
        date_type: AppointmentDateType::DateOn,
    };
    let err = run_task(&exporter, &invocation, &sink).await.unwrap_err();

    assert!(err.to_string().starts_with("orders flow failed"));
    // One completed event for ll, one failed event for cda
    assert_eq!(sink.pending(), 2);
    assert!(browser.is_terminated());
}

#[tokio::test]
async fn test_customers_flow_finds_anchor_label() {
    let scratch = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    let settings = settings();
    let trigger = Utc.with_ymd_and_hms(2024, 6, 3, 17, 20, 5).unwrap();
    let label = link_label(trigger + ChronoDuration::seconds(15), settings.timezone);
    let link = booker::export_download_link(&label);

    let view = CustomerView::AddedLastWeek.view_id();
    let browser = MockBrowser::new()
        .with_element(booker::impersonate_link(&settings.customers_location.id))
        .with_element(booker::view_select())
        .with_element(booker::view_option(view))
        .with_element(booker::selected_option(&view.to_string()))
        .with_element(booker::export_button())
        .with_element(booker::export_label(&label))
        .with_element(link.clone())
        .on_click(
            link.clone(),
            MockAction::WriteFile {
                dir: scratch.path().to_path_buf(),
                name: "Customer_export_2024.csv".to_string(),
            },
        );

    let exporter = Exporter::new(
        &browser,
        &settings,
        DownloadDirectory::new(scratch.path()),
        FileRelocator::new(scratch.path(), Some(dest.path().to_path_buf())),
    )
    .with_clock(Arc::new(FixedClock(trigger)));

    let outcome = exporter.customers(CustomerView::AddedLastWeek).await.unwrap();

    // 10:20 in Los Angeles, still June 3rd
    assert_eq!(
        outcome.files,
        vec![dest.path().join("Customer").join("Customer 2024-06-03.csv")]
    );
    assert_eq!(browser.refresh_count(), 1);
    assert_eq!(browser.click_count(&booker::ok_button()), 0);
}

#[tokio::test]
async fn test_customers_flow_without_label_is_not_found() {
    let scratch = tempfile::tempdir().unwrap();
    let settings = settings();
    let view = CustomerView::All.view_id();
    let browser = MockBrowser::new()
        .with_element(booker::impersonate_link(&settings.customers_location.id))
        .with_element(booker::view_select())
        .with_element(booker::view_option(view))
        .with_element(booker::selected_option(&view.to_string()))
        .with_element(booker::export_button());

    let exporter = Exporter::new(
        &browser,
        &settings,
        DownloadDirectory::new(scratch.path()),
        FileRelocator::new(scratch.path(), None),
    )
    .with_clock(Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 6, 3, 17, 20, 5).unwrap(),
    )));

    let err = exporter.customers(CustomerView::All).await.unwrap_err();

    assert!(matches!(
        err.root(),
        BookerError::Export(ExportError::ExportNotFound(_))
    ));
    assert!(browser.is_terminated());
}
