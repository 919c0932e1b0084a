//! Sink used when analytics are disabled

use super::traits::{EventSink, TrackEvent};
use crate::domain::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl EventSink for NullSink {
    fn track(&self, event: TrackEvent) {
        tracing::debug!(event = %event.event, "Analytics disabled, dropping event");
    }

    fn pending(&self) -> usize {
        0
    }

    async fn flush(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }
}
