//! Invocation requests and responses

use super::Task;
use crate::config::BookerExportConfig;
use crate::core::export::AppointmentDateType;
use crate::domain::{BookerError, Location, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A location given either inline or by configured name
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LocationRef {
    Inline(Location),
    Name(String),
}

/// Raw invocation request
///
/// When `body` is present it holds the real request as a JSON string, the
/// way HTTP gateways wrap payloads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvocationRequest {
    #[serde(default)]
    pub task: Option<String>,

    #[serde(default)]
    pub location: Option<LocationRef>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[serde(default)]
    pub date_type: Option<AppointmentDateType>,

    #[serde(default)]
    pub body: Option<String>,
}

/// A request with its task, locations and dates resolved
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInvocation {
    pub task: Task,
    /// Locations to export, in configuration order
    pub locations: Vec<Location>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub date_type: AppointmentDateType,
}

impl InvocationRequest {
    /// Parses a JSON request, unwrapping a `body` string if present
    ///
    /// # Errors
    ///
    /// Returns `BookerError::Request` for malformed JSON.
    pub fn parse(json: &str) -> Result<Self> {
        let request: Self = serde_json::from_str(json)
            .map_err(|e| BookerError::Request(format!("Invalid request: {e}")))?;
        match request.body {
            Some(ref body) => {
                tracing::debug!(body = %body, "Unwrapping request body");
                serde_json::from_str(body)
                    .map_err(|e| BookerError::Request(format!("Invalid request body: {e}")))
            }
            None => Ok(request),
        }
    }

    /// Resolves the task, locations and dates against `config`
    ///
    /// `now` fixes "yesterday" in `tz`, the default for both dates.
    ///
    /// # Errors
    ///
    /// Returns `BookerError::Request` for a missing or unknown task, an
    /// unknown location name, or an inverted date range.
    pub fn resolve(
        &self,
        config: &BookerExportConfig,
        now: DateTime<Utc>,
        tz: Tz,
    ) -> Result<TaskInvocation> {
        let task: Task = self
            .task
            .as_deref()
            .ok_or_else(|| BookerError::Request("No task specified".to_string()))?
            .parse()?;

        let locations = match &self.location {
            Some(LocationRef::Inline(location)) => vec![location.clone()],
            Some(LocationRef::Name(name)) => vec![find_location(config, name)?],
            None => config.locations.values().cloned().collect(),
        };

        let yesterday = report_date(now, tz);
        let start = self.start_date.unwrap_or(yesterday);
        let end = self.end_date.unwrap_or(start.max(yesterday));
        if end < start {
            return Err(BookerError::Request(format!(
                "end_date {end} is before start_date {start}"
            )));
        }

        let date_type = match task {
            Task::AppointmentsBooked => AppointmentDateType::DateCreated,
            _ => self.date_type.unwrap_or_default(),
        };

        Ok(TaskInvocation {
            task,
            locations,
            start,
            end,
            date_type,
        })
    }
}

fn find_location(config: &BookerExportConfig, name: &str) -> Result<Location> {
    config
        .location(name)
        .or_else(|| config.locations.values().find(|l| l.id.as_str() == name))
        .cloned()
        .ok_or_else(|| {
            BookerError::Request(format!(
                "Unknown location '{name}'. Configured locations: {}",
                config.location_names().join(", ")
            ))
        })
}

/// The day before `now` in `tz`
pub fn report_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    let today = now.with_timezone(&tz).date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Invocation response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub message: String,
}

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl std::fmt::Display) -> Self {
        Self {
            status_code: 400,
            message: format!("Bad Request - {message}"),
        }
    }

    pub fn internal_error(message: impl std::fmt::Display) -> Self {
        Self {
            status_code: 500,
            message: format!("Internal Server Error - {message}"),
        }
    }

    /// Maps an invocation error to a response
    ///
    /// Request errors are 400; everything else is a generic 500.
    pub fn from_error(err: &BookerError) -> Self {
        match err.root() {
            BookerError::Request(message) => Self::bad_request(message),
            _ => Self::internal_error(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
