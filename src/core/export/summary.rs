//! Flow outcomes and run summaries

use crate::domain::{EntityType, ExportWindow, LocationId};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result of one successful export flow
#[derive(Debug, Clone, Serialize)]
pub struct FlowOutcome {
    /// Flow name (`customers`, `appointments`, `orders`)
    pub flow: String,

    pub entity: EntityType,

    /// Location the flow impersonated, if it is reported per location
    pub location: Option<LocationId>,

    /// Windows exported, in order
    pub windows: Vec<ExportWindow>,

    /// Files moved into the destination tree
    pub files: Vec<PathBuf>,

    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

impl FlowOutcome {
    pub fn new(flow: impl Into<String>, entity: EntityType, location: Option<LocationId>) -> Self {
        Self {
            flow: flow.into(),
            entity,
            location,
            windows: Vec::new(),
            files: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Number of exports downloaded by this flow
    pub fn exports(&self) -> usize {
        self.windows.len().max(1)
    }
}

/// Outcomes of every flow run by a task
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub task: String,
    pub outcomes: Vec<FlowOutcome>,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
}

impl RunSummary {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, outcome: FlowOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn total_exports(&self) -> usize {
        self.outcomes.iter().map(FlowOutcome::exports).sum()
    }

    pub fn total_files(&self) -> usize {
        self.outcomes.iter().map(|o| o.files.len()).sum()
    }

    /// One-line description used as the response message
    pub fn message(&self) -> String {
        format!(
            "Task {} completed: {} flow(s), {} export(s), {} file(s) relocated in {:.1}s",
            self.task,
            self.outcomes.len(),
            self.total_exports(),
            self.total_files(),
            self.duration.as_secs_f64()
        )
    }
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
