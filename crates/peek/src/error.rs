use thiserror::Error;

#[derive(Debug, Error)]
pub enum PeekError {
    /// Rejected locally, before anything is sent over the wire.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend rejected the session token")]
    Unauthorized,

    #[error("service unavailable: status {status}: {body}")]
    ServiceUnavailable { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl PeekError {
    /// True for failures where the backend could not be reached or did not
    /// produce a usable answer, as opposed to an explicit auth rejection or
    /// a locally rejected input.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_) | Self::ServiceUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, PeekError>;
