//! Segment HTTP tracking client
//!
//! Events are queued in memory and posted as a single batch to the
//! `/v1/batch` endpoint on flush, authenticated with the write key as the
//! basic-auth user name.

use super::traits::{EventSink, TrackEvent};
use crate::config::{AnalyticsConfig, SecretString};
use crate::domain::{BookerError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    event: &'a str,
    user_id: &'a str,
    message_id: String,
    timestamp: DateTime<Utc>,
    properties: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest<'a> {
    batch: Vec<BatchMessage<'a>>,
    sent_at: DateTime<Utc>,
}

/// Segment tracking client
pub struct SegmentClient {
    client: Client,
    endpoint: String,
    write_key: SecretString,
    user_id: String,
    queue: Mutex<Vec<TrackEvent>>,
}

impl SegmentClient {
    /// Creates a client for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns `BookerError::Configuration` if no write key is configured or
    /// the HTTP client cannot be built.
    pub fn new(config: &AnalyticsConfig) -> Result<Self> {
        let write_key = config.write_key.clone().ok_or_else(|| {
            BookerError::Configuration("analytics.write_key is required".to_string())
        })?;

        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                BookerError::Configuration(format!("Failed to build analytics HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            write_key,
            user_id: config.user_id.clone(),
            queue: Mutex::new(Vec::new()),
        })
    }

    fn take_queue(&self) -> Vec<TrackEvent> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn requeue(&self, mut events: Vec<TrackEvent>) {
        let mut queue = match self.queue.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.append(&mut *queue);
        *queue = events;
    }

    async fn post_batch(&self, events: &[TrackEvent]) -> Result<()> {
        let body = BatchRequest {
            batch: events
                .iter()
                .map(|e| BatchMessage {
                    kind: "track",
                    event: &e.event,
                    user_id: &self.user_id,
                    message_id: Uuid::new_v4().to_string(),
                    timestamp: e.timestamp,
                    properties: &e.properties,
                })
                .collect(),
            sent_at: Utc::now(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .basic_auth(self.write_key.expose_secret().as_ref(), None::<&str>)
            .json(&body)
            .send()
            .await
            .map_err(|e| BookerError::Analytics(format!("Failed to send events: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BookerError::Analytics(format!(
                "Batch request failed with status {status}: {text}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSink for SegmentClient {
    fn track(&self, event: TrackEvent) {
        tracing::debug!(event = %event.event, "Queueing analytics event");
        match self.queue.lock() {
            Ok(mut queue) => queue.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    fn pending(&self) -> usize {
        match self.queue.lock() {
            Ok(queue) => queue.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    async fn flush(&self, timeout: Duration) -> Result<()> {
        let events = self.take_queue();
        if events.is_empty() {
            return Ok(());
        }

        let count = events.len();
        let outcome = match tokio::time::timeout(timeout, self.post_batch(&events)).await {
            Ok(result) => result,
            Err(_) => Err(BookerError::Timeout(format!(
                "analytics flush did not finish within {}s",
                timeout.as_secs()
            ))),
        };

        match outcome {
            Ok(()) => {
                tracing::info!(count, "Flushed analytics events");
                Ok(())
            }
            Err(e) => {
                self.requeue(events);
                Err(e)
            }
        }
    }
}
