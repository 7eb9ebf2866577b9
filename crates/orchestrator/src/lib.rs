//! Task lifecycle orchestration for the peek backend.
//!
//! Composes the session store, the HTTP client, the status poller and the
//! result normalizer into one observable operation: submit a strategy
//! against a course, watch progress, receive a ranked result or a
//! stage-tagged error.

pub mod error;
pub mod normalizer;
pub mod poller;
pub mod runner;

mod guard;

pub use error::{OrchestratorError, Result, Stage};
pub use normalizer::{normalize, NormalizeError};
pub use poller::{
    PollConfig, PollError, PollEvent, PollStream, Poller, StatusSource, DEFAULT_POLL_INTERVAL,
};
pub use runner::{PeekRun, PeekRunner, RunEvent};
