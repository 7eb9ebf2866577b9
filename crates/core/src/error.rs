use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No session is held, or it was cleared or invalidated. Recovery is
    /// re-authentication, never a retry.
    #[error("no authenticated session")]
    Unauthenticated,
}

pub type Result<T> = std::result::Result<T, CoreError>;
