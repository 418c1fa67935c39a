//! Sync job model and command rendering.
//!
//! A job is two endpoints plus a set of option toggles. Rendering is a pure
//! function of the job and the configured executables: the same job always
//! yields the same argument vector and the same shell line, which is what the
//! preview shows, what bookmarks store, and what the shell-based launch modes
//! execute.

use thiserror::Error;

mod endpoint;
mod options;
mod render;

pub use endpoint::{Endpoint, EndpointConfig, Side};
pub use options::SyncOptions;
pub use render::{RenderedCommand, SyncJob};

/// Errors raised when a job cannot be launched as entered.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum JobError {
    /// Raised when an active field of an endpoint is blank.
    #[error("{side} {field} is empty")]
    MissingField {
        /// Side the blank field belongs to.
        side: Side,
        /// Human readable field name.
        field: String,
    },
    /// Raised when both sides are remote; rsync needs one local side.
    #[error("source and target cannot both be remote")]
    BothRemote,
}

#[cfg(test)]
mod tests;
