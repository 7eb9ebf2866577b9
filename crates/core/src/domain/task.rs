use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Processing,
    Done,
    /// Reported as `"error"` on the wire.
    #[serde(rename = "error")]
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Failed => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "done" => Some(Self::Done),
            "error" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Terminal statuses end the poll loop; no further snapshots are taken.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Handle to a task created on the backend, wrapping its opaque id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One asynchronous unit of backend computation, advanced only by the poll
/// loop as it observes new server-reported snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub status: TaskStatus,
    /// Last reported completion percentage, clamped to [0, 100].
    pub progress: f64,
    /// Present only once the task is done.
    pub raw_result: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            status: TaskStatus::default(),
            progress: 0.0,
            raw_result: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Record a processing snapshot. Out-of-range percentages are clamped,
    /// not rejected.
    pub fn record_progress(&mut self, percent: f64) {
        self.status = TaskStatus::Processing;
        self.progress = percent.clamp(0.0, 100.0);
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, raw_result: String) {
        self.status = TaskStatus::Done;
        self.progress = 100.0;
        self.raw_result = Some(raw_result);
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self) {
        self.status = TaskStatus::Failed;
        self.updated_at = Utc::now();
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
