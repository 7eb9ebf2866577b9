use peek::PeekError;
use peek_core::CoreError;
use thiserror::Error;

use crate::normalizer::NormalizeError;
use crate::poller::PollError;

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Session,
    Submit,
    Poll,
    Normalize,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Submit => "submit",
            Self::Poll => "poll",
            Self::Normalize => "normalize",
        }
    }
}

/// Terminal failure of one peek run. Each variant names the stage that
/// produced it; the underlying error is preserved via `source()`.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("session: {0}")]
    Session(#[from] CoreError),

    #[error("submit: {0}")]
    Submit(#[from] PeekError),

    #[error("poll: {0}")]
    Poll(#[from] PollError),

    #[error("normalize: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("a peek run is already in flight")]
    AlreadyInFlight,

    #[error("run cancelled before a terminal event")]
    Cancelled,
}

impl OrchestratorError {
    /// The originating stage, when the error came out of the pipeline.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Session(_) => Some(Stage::Session),
            Self::Submit(_) => Some(Stage::Submit),
            Self::Poll(_) => Some(Stage::Poll),
            Self::Normalize(_) => Some(Stage::Normalize),
            Self::AlreadyInFlight | Self::Cancelled => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
