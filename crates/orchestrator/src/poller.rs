//! Timer-driven status polling.
//!
//! One poll cycle is a fixed wait followed by one status query. The loop
//! runs in a spawned task and feeds a channel; dropping the consumer end
//! cancels the loop at the next interval boundary. No in-flight request is
//! ever interrupted.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use peek::{PeekClient, PeekError, TaskSnapshot};
use peek_core::{Task, TaskStatus};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

const EVENT_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum PollError {
    /// A status query failed at the transport level. One failure ends the
    /// poll; there is no retry loop.
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] PeekError),

    /// The backend explicitly reported the task as failed.
    #[error("task failed on the backend")]
    RemoteFailure,

    /// A done snapshot arrived without a usable result payload.
    #[error("corrupt result: {0}")]
    CorruptResult(String),

    /// The configured cycle bound ran out before a terminal snapshot.
    #[error("no terminal status after {cycles} poll cycles")]
    Timeout { cycles: u32 },
}

/// What a poll yields: progress updates, then exactly one terminal event.
#[derive(Debug)]
pub enum PollEvent {
    Progress { percent: f64 },
    Done { raw_result: String },
    Failed { reason: PollError },
}

impl PollEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Source of task status snapshots. Implemented by [`PeekClient`]; tests
/// drive the poller with scripted doubles.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn task_status(&self, token: &str, task_id: &str) -> peek::Result<TaskSnapshot>;
}

#[async_trait]
impl StatusSource for PeekClient {
    async fn task_status(&self, token: &str, task_id: &str) -> peek::Result<TaskSnapshot> {
        PeekClient::task_status(self, token, task_id).await
    }
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed wait before every status query, including the first.
    pub interval: Duration,
    /// Cycle bound, mainly for test doubles. `None` polls until terminal.
    pub max_cycles: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_cycles: None,
        }
    }
}

pub struct Poller<S> {
    source: Arc<S>,
    config: PollConfig,
}

impl<S: StatusSource + 'static> Poller<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            config: PollConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    /// Start polling a task. Returns immediately; the loop runs in the
    /// background until a terminal snapshot or cancellation.
    pub fn poll(&self, token: impl Into<String>, task_id: impl Into<String>) -> PollStream {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let source = Arc::clone(&self.source);
        let config = self.config.clone();
        let token = token.into();
        let task_id = task_id.into();

        tokio::spawn(async move {
            Self::run_loop(source, config, token, task_id, tx).await;
        });

        PollStream { rx }
    }

    async fn run_loop(
        source: Arc<S>,
        config: PollConfig,
        token: String,
        task_id: String,
        tx: mpsc::Sender<PollEvent>,
    ) {
        let mut task = Task::new(task_id);
        let mut cycles: u32 = 0;

        loop {
            time::sleep(config.interval).await;

            // Cancellation is checked only at interval boundaries.
            if tx.is_closed() {
                debug!(task_id = %task.id, "poll consumer dropped, stopping");
                return;
            }

            cycles += 1;

            let snapshot = match source.task_status(&token, &task.id).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(task_id = %task.id, error = %e, "status query failed");
                    task.fail();
                    let _ = tx
                        .send(PollEvent::Failed {
                            reason: PollError::Unreachable(e),
                        })
                        .await;
                    return;
                }
            };

            match snapshot.status {
                TaskStatus::Pending | TaskStatus::Processing => {
                    // A snapshot without a percentage keeps the last one.
                    let percent = snapshot.progress.unwrap_or(task.progress);
                    task.record_progress(percent);

                    debug!(task_id = %task.id, progress = task.progress, "task processing");

                    if tx
                        .send(PollEvent::Progress {
                            percent: task.progress,
                        })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                TaskStatus::Done => {
                    match snapshot.result {
                        Some(raw) => {
                            task.complete(raw.clone());
                            info!(task_id = %task.id, cycles, "task done");
                            let _ = tx.send(PollEvent::Done { raw_result: raw }).await;
                        }
                        None => {
                            task.fail();
                            warn!(task_id = %task.id, "done snapshot without result payload");
                            let _ = tx
                                .send(PollEvent::Failed {
                                    reason: PollError::CorruptResult(
                                        "done snapshot carried no result payload".to_string(),
                                    ),
                                })
                                .await;
                        }
                    }
                    return;
                }
                TaskStatus::Failed => {
                    task.fail();
                    warn!(task_id = %task.id, cycles, "task failed on the backend");
                    let _ = tx
                        .send(PollEvent::Failed {
                            reason: PollError::RemoteFailure,
                        })
                        .await;
                    return;
                }
            }

            if let Some(max) = config.max_cycles {
                if cycles >= max {
                    warn!(task_id = %task.id, cycles, "poll cycle bound exhausted");
                    let _ = tx
                        .send(PollEvent::Failed {
                            reason: PollError::Timeout { cycles },
                        })
                        .await;
                    return;
                }
            }
        }
    }
}

/// Consumer end of one poll. Dropping it cancels the underlying loop at the
/// next interval boundary.
pub struct PollStream {
    rx: mpsc::Receiver<PollEvent>,
}

impl PollStream {
    /// The next event, or `None` once the loop has stopped.
    pub async fn next_event(&mut self) -> Option<PollEvent> {
        self.rx.recv().await
    }
}
