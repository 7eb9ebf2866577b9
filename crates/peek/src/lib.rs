//! HTTP client for the peek backend.
//!
//! Thin typed wrapper over the three backend endpoints: course-catalog
//! fetch, task submission and task status. No polling or retry logic lives
//! here; drivers sit in the `orchestrator` crate.

pub mod client;
pub mod error;
pub mod types;

pub use client::PeekClient;
pub use error::{PeekError, Result};
pub use types::*;
