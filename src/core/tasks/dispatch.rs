//! Task dispatch
//!
//! Runs the flows of a resolved task one after another and reports each
//! outcome to the event sink. The first failing flow stops the task.

use super::{Task, TaskInvocation};
use crate::adapters::analytics::{EventSink, TrackEvent};
use crate::adapters::browser::BrowserSession;
use crate::config::BookerConfig;
use crate::core::export::{CustomerView, Exporter, FlowOutcome, RunSummary};
use crate::domain::{BookerError, Result};
use secrecy::ExposeSecret;
use std::time::{Duration, Instant};
use tokio::sync::watch;

pub const FLOW_COMPLETED: &str = "Flow Completed";
pub const FLOW_FAILED: &str = "Flow Failed";

/// Runs every flow of `invocation` against a signed-in session
///
/// # Errors
///
/// Returns the first flow error, or `BookerError::Request` for
/// `order_from_appointment`.
pub async fn run_task<B: BrowserSession>(
    exporter: &Exporter<'_, B>,
    invocation: &TaskInvocation,
    sink: &dyn EventSink,
) -> Result<RunSummary> {
    let task = invocation.task;
    let started = Instant::now();
    let mut summary = RunSummary::new(task.name());

    tracing::info!(
        task = %task,
        start = %invocation.start,
        end = %invocation.end,
        locations = invocation.locations.len(),
        "Running task"
    );

    if let Some(result) = run_without_browser(invocation) {
        return result;
    }

    match task {
        Task::Test
        | Task::OrderFromAppointment
        | Task::Weekly
        | Task::Monthly
        | Task::CompletedAppointments => {}
        Task::Customers => {
            record(sink, &mut summary, exporter.customers(CustomerView::All).await)?;
        }
        Task::CustomersToday => {
            record(sink, &mut summary, exporter.customers(CustomerView::AddedToday).await)?;
        }
        Task::CustomersLastWeek => {
            record(sink, &mut summary, exporter.customers(CustomerView::AddedLastWeek).await)?;
        }
        Task::CustomersLastYear => {
            record(sink, &mut summary, exporter.customers(CustomerView::AddedLastYear).await)?;
        }
        Task::Appointments | Task::AppointmentsBooked => {
            for location in &invocation.locations {
                let result = exporter
                    .appointments(location, invocation.start, invocation.end, invocation.date_type)
                    .await;
                record(sink, &mut summary, result)?;
            }
        }
        Task::Orders => {
            for location in &invocation.locations {
                let result = exporter
                    .orders(location, invocation.start, invocation.end)
                    .await;
                record(sink, &mut summary, result)?;
            }
        }
        Task::Daily => {
            record(sink, &mut summary, exporter.customers(CustomerView::AddedToday).await)?;
            for location in &invocation.locations {
                let result = exporter
                    .appointments(location, invocation.start, invocation.end, invocation.date_type)
                    .await;
                record(sink, &mut summary, result)?;
                let result = exporter
                    .orders(location, invocation.start, invocation.end)
                    .await;
                record(sink, &mut summary, result)?;
            }
        }
    }

    summary.duration = started.elapsed();
    tracing::info!(
        task = %task,
        flows = summary.outcomes.len(),
        exports = summary.total_exports(),
        files = summary.total_files(),
        duration_ms = summary.duration.as_millis() as u64,
        "Task completed"
    );
    Ok(summary)
}

/// Signs in and runs `invocation` under a hard deadline
///
/// The browser session is closed whatever the outcome. Exceeding `deadline`
/// yields `BookerError::Timeout` and a shutdown signal yields
/// `BookerError::Interrupted`; the unfinished flow is dropped in both cases.
pub async fn run_with_deadline<B: BrowserSession>(
    exporter: &Exporter<'_, B>,
    account: &BookerConfig,
    invocation: &TaskInvocation,
    sink: &dyn EventSink,
    deadline: Duration,
    mut shutdown_signal: watch::Receiver<bool>,
) -> Result<RunSummary> {
    let work = async {
        let password = account.password.expose_secret();
        exporter
            .login(&account.account, &account.username, password.as_ref())
            .await?;
        run_task(exporter, invocation, sink).await
    };

    let result = tokio::select! {
        outcome = tokio::time::timeout(deadline, work) => match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    task = %invocation.task,
                    deadline_secs = deadline.as_secs(),
                    "Invocation deadline exceeded, closing browser session"
                );
                Err(BookerError::Timeout(format!(
                    "task {} did not finish within {}s",
                    invocation.task,
                    deadline.as_secs()
                )))
            }
        },
        Ok(()) = shutdown_signal.changed() => {
            tracing::info!("Shutdown signal received, closing browser session");
            Err(BookerError::Interrupted)
        }
    };

    if let Err(e) = exporter.browser().quit().await {
        tracing::warn!(error = %e, "Failed to close browser session");
    }
    result
}

/// Answers the tasks that never touch a browser session
///
/// Returns `None` for every task that exports something.
pub fn run_without_browser(invocation: &TaskInvocation) -> Option<Result<RunSummary>> {
    match invocation.task {
        Task::Test => {
            tracing::info!("Test task, nothing to export");
            Some(Ok(RunSummary::new(Task::Test.name())))
        }
        task if task.is_unsupported() => Some(Err(BookerError::Request(format!(
            "Task {task} is not supported"
        )))),
        _ => None,
    }
}

/// Emits the flow event and keeps successful outcomes
fn record(
    sink: &dyn EventSink,
    summary: &mut RunSummary,
    result: Result<FlowOutcome>,
) -> Result<()> {
    match result {
        Ok(outcome) => {
            sink.track(completed_event(&summary.task, &outcome));
            summary.push(outcome);
            Ok(())
        }
        Err(e) => {
            sink.track(failed_event(&summary.task, &e));
            Err(e)
        }
    }
}

fn completed_event(task: &str, outcome: &FlowOutcome) -> TrackEvent {
    let mut event = TrackEvent::new(FLOW_COMPLETED)
        .with_property("task", task)
        .with_property("flow", outcome.flow.as_str())
        .with_property("entity", outcome.entity.as_str())
        .with_property("exports", outcome.exports())
        .with_property("files", outcome.files.len())
        .with_property("duration_ms", outcome.duration.as_millis() as u64);
    if let Some(location) = &outcome.location {
        event = event.with_property("location", location.as_str());
    }
    event
}

fn failed_event(task: &str, err: &BookerError) -> TrackEvent {
    let event = TrackEvent::new(FLOW_FAILED)
        .with_property("task", task)
        .with_property("error", err.to_string());
    match err {
        BookerError::Flow { flow, .. } => event.with_property("flow", flow.as_str()),
        _ => event,
    }
}
