//! Isolated environment for binary-level tests.
//!
//! Each sandbox owns a temporary home directory so configuration discovery
//! and the bookmark store never touch the real user profile. The rsync
//! binary defaults to `echo`, which prints the argument vector instead of
//! transferring anything.
//!
//! ```rust
//! #[path = "common/sandbox.rs"]
//! mod sandbox;
//! ```

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Temporary home directory plus a command builder bound to it.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    /// Creates an empty sandbox.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
        }
    }

    /// Location of the bookmark store inside the sandbox.
    pub fn bookmarks_path(&self) -> PathBuf {
        self.dir.path().join("state").join("bookmarks.json")
    }

    /// Path of a file inside the sandbox.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// `rsync-launcher` command with the sandbox environment applied.
    pub fn command(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("rsync-launcher");
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env("RSYNC_LAUNCHER_BOOKMARKS_PATH", self.bookmarks_path())
            .env("RSYNC_LAUNCHER_RSYNC_BIN", "echo")
            .env_remove("RSYNC_LAUNCHER_CONFIG_PATH")
            .env_remove("RSYNC_LAUNCHER_LAUNCH_MODE")
            .env_remove("RSYNC_LAUNCHER_LOG")
            .current_dir(self.dir.path());
        cmd
    }
}
