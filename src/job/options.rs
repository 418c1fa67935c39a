//! rsync option toggles.

use serde::{Deserialize, Serialize};

/// Boolean toggles mapped one-to-one onto rsync flags.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase", default)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each field mirrors an independent rsync command-line switch"
)]
pub struct SyncOptions {
    /// `-a`: archive mode.
    pub archive: bool,
    /// `-v`: verbose output.
    pub verbose: bool,
    /// `--progress`: per-file progress.
    pub progress: bool,
    /// `--dry-run`: report without transferring.
    pub dry_run: bool,
    /// `--delete`: remove target files missing from the source.
    pub delete: bool,
    /// `-h`: human-readable numbers.
    pub human_readable: bool,
    /// Copy the contents of the source directory rather than the directory
    /// itself, by giving the source a trailing slash.
    pub copy_contents: bool,
}

impl SyncOptions {
    /// Enabled rsync flags in their fixed render order.
    #[must_use]
    pub fn flags(&self) -> Vec<&'static str> {
        [
            (self.archive, "-a"),
            (self.verbose, "-v"),
            (self.progress, "--progress"),
            (self.dry_run, "--dry-run"),
            (self.delete, "--delete"),
            (self.human_readable, "-h"),
        ]
        .into_iter()
        .filter_map(|(enabled, flag)| enabled.then_some(flag))
        .collect()
    }

    /// Applies the copy-contents rule to a source location.
    ///
    /// A trailing `/` is appended only when the option is set, the location
    /// is non-empty, and it does not already end in `/`.
    #[must_use]
    pub fn source_location(&self, mut location: String) -> String {
        if self.copy_contents && !location.is_empty() && !location.ends_with('/') {
            location.push('/');
        }
        location
    }
}
