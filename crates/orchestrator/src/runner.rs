//! Composition of session, submission, polling and normalization into one
//! observable peek run.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use events::{Event, EventBus};
use peek::{PeekClient, PeekError};
use peek_core::{RankedResultSet, SessionStore, TaskHandle};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::{OrchestratorError, Result};
use crate::guard::InFlightGuard;
use crate::normalizer;
use crate::poller::{PollConfig, PollEvent, Poller};

const RUN_CHANNEL_CAPACITY: usize = 32;

/// Event stream of one peek run: progress updates followed by exactly one
/// terminal event.
#[derive(Debug)]
pub enum RunEvent {
    Progress { percent: f64 },
    Finished(RankedResultSet),
    Failed(OrchestratorError),
}

/// Drives the full lifecycle of peek tasks against one backend.
///
/// Validation, session lookup and submission failures surface as an
/// immediate `Err` from [`run_peek`](Self::run_peek); once a task exists on
/// the backend, everything else arrives through the returned [`PeekRun`].
pub struct PeekRunner {
    client: Arc<PeekClient>,
    session: SessionStore,
    poll_config: PollConfig,
    event_bus: Option<EventBus>,
    in_flight: Arc<AtomicBool>,
}

impl PeekRunner {
    pub fn new(client: PeekClient, session: SessionStore) -> Self {
        Self {
            client: Arc::new(client),
            session,
            poll_config: PollConfig::default(),
            event_bus: None,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.poll_config = config;
        self
    }

    /// Publish lifecycle events on a bus in addition to the per-run stream.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Submit a strategy against a course and start driving the task to a
    /// terminal state.
    ///
    /// At most one run per runner is active at a time; a second call while
    /// one is in flight fails with `AlreadyInFlight`.
    pub async fn run_peek(&self, course_id: &str, strategy_json: &str) -> Result<PeekRun> {
        let guard =
            InFlightGuard::acquire(&self.in_flight).ok_or(OrchestratorError::AlreadyInFlight)?;

        let token = self.session.token()?;

        let handle = match self.client.submit(&token, course_id, strategy_json).await {
            Ok(handle) => handle,
            Err(e) => {
                if matches!(e, PeekError::Unauthorized) {
                    warn!("token rejected at submission, invalidating session");
                    let identity = self.session.identity();
                    self.session.invalidate();
                    self.publish(Event::SessionInvalidated { identity });
                }
                return Err(OrchestratorError::Submit(e));
            }
        };

        info!(task_id = %handle.id(), course_id, "peek task submitted");
        self.publish(Event::TaskSubmitted {
            task_id: handle.id().to_string(),
            course_id: course_id.to_string(),
        });

        let (tx, rx) = mpsc::channel(RUN_CHANNEL_CAPACITY);
        let poller = Poller::new(Arc::clone(&self.client)).with_config(self.poll_config.clone());
        let mut poll_stream = poller.poll(token, handle.id());

        let bus = self.event_bus.clone();
        let task_id = handle.id().to_string();

        tokio::spawn(async move {
            // Holds the in-flight slot until this run is over, however it
            // ends. Released before the terminal send so a caller that has
            // observed the terminal event can start the next run right away.
            let mut guard = Some(guard);

            while let Some(event) = poll_stream.next_event().await {
                match event {
                    PollEvent::Progress { percent } => {
                        publish_to(
                            &bus,
                            Event::TaskProgress {
                                task_id: task_id.clone(),
                                percent,
                            },
                        );
                        if tx.send(RunEvent::Progress { percent }).await.is_err() {
                            // Caller dropped the run; the poll stream goes
                            // with us and the loop stops at its next cycle.
                            return;
                        }
                    }
                    PollEvent::Done { raw_result } => {
                        let outcome = match normalizer::normalize(&raw_result) {
                            Ok(ranked) => {
                                info!(task_id = %task_id, entries = ranked.len(), "peek run finished");
                                publish_to(
                                    &bus,
                                    Event::TaskProgress {
                                        task_id: task_id.clone(),
                                        percent: 100.0,
                                    },
                                );
                                publish_to(
                                    &bus,
                                    Event::TaskCompleted {
                                        task_id: task_id.clone(),
                                        entries: ranked.len(),
                                    },
                                );
                                RunEvent::Finished(ranked)
                            }
                            Err(e) => {
                                error!(task_id = %task_id, error = %e, "terminal payload failed to normalize");
                                publish_to(
                                    &bus,
                                    Event::TaskFailed {
                                        task_id: task_id.clone(),
                                        reason: e.to_string(),
                                    },
                                );
                                RunEvent::Failed(OrchestratorError::Normalize(e))
                            }
                        };
                        guard.take();
                        let _ = tx.send(outcome).await;
                        return;
                    }
                    PollEvent::Failed { reason } => {
                        error!(task_id = %task_id, error = %reason, "peek run failed");
                        publish_to(
                            &bus,
                            Event::TaskFailed {
                                task_id: task_id.clone(),
                                reason: reason.to_string(),
                            },
                        );
                        guard.take();
                        let _ = tx.send(RunEvent::Failed(OrchestratorError::Poll(reason))).await;
                        return;
                    }
                }
            }
        });

        Ok(PeekRun { task: handle, rx })
    }

    fn publish(&self, event: Event) {
        publish_to(&self.event_bus, event);
    }
}

fn publish_to(bus: &Option<EventBus>, event: Event) {
    if let Some(bus) = bus {
        bus.publish(event);
    }
}

/// One in-flight peek run. Dropping it cancels the underlying poll at the
/// next interval boundary.
#[derive(Debug)]
pub struct PeekRun {
    task: TaskHandle,
    rx: mpsc::Receiver<RunEvent>,
}

impl PeekRun {
    pub fn task(&self) -> &TaskHandle {
        &self.task
    }

    /// The next run event, or `None` once the run is over.
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.rx.recv().await
    }

    /// Drain to the terminal event, reporting progress through the callback.
    pub async fn wait_with_progress<F>(mut self, mut on_progress: F) -> Result<RankedResultSet>
    where
        F: FnMut(f64),
    {
        loop {
            match self.next_event().await {
                Some(RunEvent::Progress { percent }) => on_progress(percent),
                Some(RunEvent::Finished(ranked)) => return Ok(ranked),
                Some(RunEvent::Failed(e)) => return Err(e),
                None => return Err(OrchestratorError::Cancelled),
            }
        }
    }

    /// Drain to the terminal event, discarding progress.
    pub async fn wait(self) -> Result<RankedResultSet> {
        self.wait_with_progress(|_| {}).await
    }
}
