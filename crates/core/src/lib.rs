//! Domain types for the coursepeek workspace.
//!
//! Pure data and local state only: no I/O, no async runtime. Everything the
//! client, poller and orchestrator crates share lives here.

pub mod domain;
pub mod error;

pub use domain::bid::{BidEntry, RankedResultSet};
pub use domain::session::{Session, SessionStore};
pub use domain::task::{Task, TaskHandle, TaskStatus};
pub use error::{CoreError, Result};
