//! External process execution.
//!
//! Everything the launcher does ends in spawning one external program:
//! `rsync`, `ssh`, a shell, or `osascript`. This module describes such a
//! spawn as a [`LaunchCommand`] and runs it through a [`CommandRunner`] so
//! callers can swap in scripted doubles under test.

mod streaming;
mod types;

pub use streaming::StreamingCommandRunner;
pub use types::{
    CommandOutput, CommandRunner, Credentials, LaunchCommand, ProcessCommandRunner, RunnerError,
    SSHPASS_ENV,
};

#[cfg(test)]
mod tests;
