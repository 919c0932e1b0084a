//! Run command implementation
//!
//! This module implements the `run` command: resolve the invocation request,
//! open a browser session, run the task and print the response.

use super::{EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_SUCCESS};
use crate::adapters::analytics::{create_event_sink, EventSink};
use crate::adapters::browser::WebDriverSession;
use crate::adapters::connectivity::{check_connectivity, CONNECTIVITY_TIMEOUT};
use crate::config::{load_config, BookerExportConfig};
use crate::core::export::{AppointmentDateType, Exporter, FlowSettings};
use crate::core::relocate::FileRelocator;
use crate::core::tasks::{
    run_with_deadline, run_without_browser, InvocationRequest, LocationRef, Response,
    TaskInvocation,
};
use crate::core::wait::DownloadDirectory;
use crate::domain::{BookerError, Result};
use chrono::{NaiveDate, Utc};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Task to run (e.g. daily, customers_today, appointments, orders)
    #[arg(short, long)]
    pub task: Option<String>,

    /// Location name or site id; every configured location when omitted
    #[arg(long)]
    pub location: Option<String>,

    /// First day to export (YYYY-MM-DD), defaults to yesterday
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day to export (YYYY-MM-DD), defaults to yesterday
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Appointment date filter (date_on, date_created)
    #[arg(long)]
    pub date_type: Option<AppointmentDateType>,

    /// JSON invocation request; command-line flags override its fields
    #[arg(long, value_name = "FILE")]
    pub event: Option<PathBuf>,

    /// Leave downloaded files in the scratch directory
    #[arg(long)]
    pub dry_run: bool,
}

/// Scratch download directory, removed on drop when temporary
enum Scratch {
    Temp(TempDir),
    Fixed(PathBuf),
}

impl Scratch {
    fn create(configured: Option<&str>) -> Result<Self> {
        match configured {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Ok(Scratch::Fixed(PathBuf::from(dir)))
            }
            None => Ok(Scratch::Temp(TempDir::new()?)),
        }
    }

    fn path(&self) -> &Path {
        match self {
            Scratch::Temp(dir) => dir.path(),
            Scratch::Fixed(path) => path.as_path(),
        }
    }
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        let settings = match FlowSettings::from_config(&config) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Invalid configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let invocation = match self
            .request()
            .and_then(|r| r.resolve(&config, Utc::now(), settings.timezone))
        {
            Ok(i) => i,
            Err(e) => {
                tracing::error!(error = %e, "Rejected invocation request");
                return emit(&Response::from_error(&e));
            }
        };

        let sink = match create_event_sink(&config.analytics) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to create analytics client: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let response = match run_without_browser(&invocation) {
            Some(result) => respond(result.map(|summary| summary.message())),
            None => {
                match self
                    .run_in_browser(&config, &settings, &invocation, sink.as_ref(), shutdown_signal)
                    .await
                {
                    Ok(response) => response,
                    Err(e @ BookerError::Connection(_)) => {
                        tracing::error!(error = %e, "Could not reach required services");
                        emit(&Response::from_error(&e))?;
                        return Ok(EXIT_CONNECTION);
                    }
                    Err(BookerError::Interrupted) => {
                        println!();
                        println!("⚠️  Run interrupted, browser session closed.");
                        return Ok(130);
                    }
                    Err(e) => Response::from_error(&e),
                }
            }
        };

        let flush_timeout = Duration::from_secs(config.analytics.flush_timeout_secs);
        let response = flush_events(sink.as_ref(), flush_timeout, response).await;
        emit(&response)
    }

    /// Builds the invocation request from `--event` and the flags
    fn request(&self) -> Result<InvocationRequest> {
        let mut request = match &self.event {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    BookerError::Request(format!("Failed to read {}: {e}", path.display()))
                })?;
                InvocationRequest::parse(&json)?
            }
            None => InvocationRequest::default(),
        };

        if let Some(task) = &self.task {
            request.task = Some(task.clone());
        }
        if let Some(location) = &self.location {
            request.location = Some(LocationRef::Name(location.clone()));
        }
        if self.start_date.is_some() {
            request.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            request.end_date = self.end_date;
        }
        if self.date_type.is_some() {
            request.date_type = self.date_type;
        }
        Ok(request)
    }

    async fn run_in_browser(
        &self,
        config: &BookerExportConfig,
        settings: &FlowSettings,
        invocation: &TaskInvocation,
        sink: &dyn EventSink,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Response> {
        let check_url = &config.application.connectivity_check_url;
        if !check_connectivity(check_url, CONNECTIVITY_TIMEOUT).await? {
            return Err(BookerError::Connection(format!(
                "No internet connection ({check_url} unreachable)"
            )));
        }
        tracing::debug!("Internet connection is established");

        let scratch = Scratch::create(config.browser.download_dir.as_deref())?;
        tracing::info!(
            scratch = %scratch.path().display(),
            environment = ?config.environment,
            "Opening browser session"
        );
        let browser =
            WebDriverSession::connect(&config.browser, &config.environment, scratch.path()).await?;

        let destination = if config.application.dry_run {
            tracing::info!("Dry run: exports stay in the scratch directory");
            None
        } else {
            config.export.destination_dir.as_ref().map(PathBuf::from)
        };
        let exporter = Exporter::new(
            &browser,
            settings,
            DownloadDirectory::new(scratch.path()),
            FileRelocator::new(scratch.path(), destination),
        );

        let deadline = Duration::from_secs(config.application.invocation_timeout_secs);
        let result = run_with_deadline(
            &exporter,
            &config.booker,
            invocation,
            sink,
            deadline,
            shutdown_signal,
        )
        .await;

        if let Ok(summary) = &result {
            for outcome in &summary.outcomes {
                for file in &outcome.files {
                    println!("  📄 {}", file.display());
                }
            }
        }

        match result {
            Err(BookerError::Interrupted) => Err(BookerError::Interrupted),
            other => Ok(respond(other.map(|summary| summary.message()))),
        }
    }
}

fn respond(result: Result<String>) -> Response {
    match result {
        Ok(message) => Response::ok(message),
        Err(e) => {
            crate::log_error_with_context!(e, "Task failed");
            Response::from_error(&e)
        }
    }
}

/// Flushes queued events; a failed flush turns a success into a 500
async fn flush_events(sink: &dyn EventSink, timeout: Duration, response: Response) -> Response {
    let failure = match sink.flush(timeout).await {
        Ok(()) => return response,
        Err(e @ BookerError::Timeout(_)) => {
            tracing::error!(error = %e, "Analytics shutdown took too long");
            Response::internal_error("Analytics shutdown took too long")
        }
        Err(e) => {
            tracing::error!(error = %e, "Analytics flush failed");
            Response::internal_error(format!("Analytics flush failed: {e}"))
        }
    };

    if response.is_success() {
        failure
    } else {
        response
    }
}

/// Prints the response and maps it to an exit code
fn emit(response: &Response) -> anyhow::Result<i32> {
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(match response.status_code {
        200 => EXIT_SUCCESS,
        400 => EXIT_CONFIG,
        _ => EXIT_FATAL,
    })
}
