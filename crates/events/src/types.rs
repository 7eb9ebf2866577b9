//! Event types for the peek task lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping every event with an id and a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: Event,
}

impl EventEnvelope {
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Everything observable about a peek run from the outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A task was created on the backend.
    #[serde(rename = "task.submitted")]
    TaskSubmitted { task_id: String, course_id: String },

    /// A processing snapshot reported a completion percentage.
    #[serde(rename = "task.progress")]
    TaskProgress { task_id: String, percent: f64 },

    /// The task reached Done and its result was ranked.
    #[serde(rename = "task.completed")]
    TaskCompleted { task_id: String, entries: usize },

    /// The task ended without a usable result.
    #[serde(rename = "task.failed")]
    TaskFailed { task_id: String, reason: String },

    /// The backend rejected the session token; the session was dropped.
    #[serde(rename = "session.invalidated")]
    SessionInvalidated { identity: Option<String> },
}

impl Event {
    /// The task this event belongs to, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self {
            Event::TaskSubmitted { task_id, .. } => Some(task_id),
            Event::TaskProgress { task_id, .. } => Some(task_id),
            Event::TaskCompleted { task_id, .. } => Some(task_id),
            Event::TaskFailed { task_id, .. } => Some(task_id),
            Event::SessionInvalidated { .. } => None,
        }
    }
}
