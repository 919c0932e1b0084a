//! Analytics sink trait

use crate::domain::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// Tracking event emitted when a flow finishes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackEvent {
    /// Event name (`Flow Completed`, `Flow Failed`)
    pub event: String,

    /// Free-form event properties
    pub properties: Map<String, Value>,

    pub timestamp: DateTime<Utc>,
}

impl TrackEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            properties: Map::new(),
            timestamp: Utc::now(),
        }
    }

    /// Adds one property, replacing any previous value for `key`
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Destination for flow events
///
/// `track` only queues; nothing leaves the process until `flush`.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Queues an event
    fn track(&self, event: TrackEvent);

    /// Number of queued events
    fn pending(&self) -> usize;

    /// Sends every queued event, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns `BookerError::Analytics` if delivery fails or the timeout
    /// elapses. Events that were not delivered stay queued.
    async fn flush(&self, timeout: Duration) -> Result<()>;
}
