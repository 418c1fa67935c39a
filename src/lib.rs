//! Core library for the rsync launcher.
//!
//! The crate turns a pair of endpoints plus option toggles into one rsync
//! invocation, launches it directly or through a shell or AppleScript, keeps
//! named bookmarks of past jobs, and browses remote directories over ssh.

pub mod bookmarks;
pub mod config;
pub mod job;
pub mod launch;
pub mod process;
pub mod remote_ls;
pub mod test_support;
pub mod util;

pub use bookmarks::{Bookmark, BookmarkError, BookmarkStore};
pub use config::{ConfigError, LauncherConfig};
pub use job::{Endpoint, EndpointConfig, JobError, RenderedCommand, Side, SyncJob, SyncOptions};
pub use launch::{LaunchError, LaunchMode, LaunchReport, Launcher};
pub use process::{
    CommandOutput, CommandRunner, Credentials, LaunchCommand, ProcessCommandRunner, RunnerError,
    StreamingCommandRunner,
};
pub use remote_ls::{
    EntryKind, ListError, RemoteEntry, RemoteHost, RemoteLister, RemoteListing, parse_listing,
};
