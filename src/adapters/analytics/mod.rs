//! Analytics event sinks
//!
//! Flows report their completion through an [`EventSink`] handle created at
//! the start of an invocation and flushed once at the end.

pub mod null;
pub mod segment;
pub mod traits;

pub use null::NullSink;
pub use segment::SegmentClient;
pub use traits::{EventSink, TrackEvent};

use crate::config::AnalyticsConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the event sink selected by the configuration
///
/// # Errors
///
/// Returns an error if analytics are enabled but the client cannot be built.
pub fn create_event_sink(config: &AnalyticsConfig) -> Result<Arc<dyn EventSink>> {
    if config.enabled {
        tracing::info!(endpoint = %config.endpoint, "Creating Segment analytics client");
        Ok(Arc::new(SegmentClient::new(config)?))
    } else {
        tracing::debug!("Analytics disabled");
        Ok(Arc::new(NullSink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_uses_null_sink() {
        let sink = create_event_sink(&AnalyticsConfig::default()).unwrap();
        sink.track(TrackEvent::new("Flow Completed"));
        assert_eq!(sink.pending(), 0);
    }

    #[test]
    fn test_event_properties() {
        let event = TrackEvent::new("Flow Failed")
            .with_property("flow", "orders")
            .with_property("exports", 3);
        assert_eq!(event.properties["flow"], "orders");
        assert_eq!(event.properties["exports"], 3);
    }
}
