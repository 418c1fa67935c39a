//! Command-line interface definitions for the `rsync-launcher` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI for the `rsync-launcher` binary.
#[derive(Debug, Parser)]
#[command(
    name = "rsync-launcher",
    about = "Compose, preview, launch, and bookmark rsync jobs",
    version,
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Print the rsync command line for a job without running it.
    #[command(name = "preview", disable_help_flag = true)]
    Preview(PreviewCommand),
    /// Run a job and exit with rsync's status.
    #[command(name = "run", disable_help_flag = true)]
    Run(RunCommand),
    /// List a remote directory over ssh.
    #[command(name = "ls")]
    Ls(LsCommand),
    /// Manage saved jobs.
    #[command(subcommand)]
    Bookmark(BookmarkCommand),
}

/// Endpoints and rsync toggles shared by every job-shaped subcommand.
///
/// `-h` means `--human-readable` here, as it does for rsync, so commands that
/// flatten these arguments only offer `--help`.
#[derive(Debug, Args)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag mirrors an independent rsync switch"
)]
pub(crate) struct JobArgs {
    /// Source: a local path or `[user@]host:path`.
    #[arg(value_name = "SOURCE")]
    pub(crate) source: String,
    /// Target: a local path or `[user@]host:path`.
    #[arg(value_name = "TARGET")]
    pub(crate) target: String,
    /// Archive mode (`-a`).
    #[arg(short = 'a', long)]
    pub(crate) archive: bool,
    /// Verbose output (`-v`).
    #[arg(short = 'v', long)]
    pub(crate) verbose: bool,
    /// Per-file progress (`--progress`).
    #[arg(long)]
    pub(crate) progress: bool,
    /// Report what would change without transferring (`--dry-run`).
    #[arg(long)]
    pub(crate) dry_run: bool,
    /// Delete target files missing from the source (`--delete`).
    #[arg(long)]
    pub(crate) delete: bool,
    /// Human-readable numbers (`-h`).
    #[arg(short = 'h', long)]
    pub(crate) human_readable: bool,
    /// Copy the contents of the source directory, not the directory itself.
    #[arg(long)]
    pub(crate) contents: bool,
    /// Private key for a remote source.
    #[arg(long, value_name = "KEY")]
    pub(crate) source_identity: Option<String>,
    /// Private key for a remote target.
    #[arg(long, value_name = "KEY")]
    pub(crate) target_identity: Option<String>,
    /// SSH port for a remote source.
    #[arg(long, value_name = "PORT")]
    pub(crate) source_port: Option<u16>,
    /// SSH port for a remote target.
    #[arg(long, value_name = "PORT")]
    pub(crate) target_port: Option<u16>,
    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    pub(crate) help: Option<bool>,
}

/// How a job is started.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum ModeArg {
    /// Spawn rsync with an argument vector.
    Direct,
    /// Run the preview line with `sh -c`.
    Shell,
    /// Run the preview line through `osascript` and `do shell script`.
    Applescript,
    /// Open the preview line in a new Terminal window.
    Terminal,
}

/// Arguments for `rsync-launcher preview`.
#[derive(Debug, Parser)]
pub(crate) struct PreviewCommand {
    /// Job to render.
    #[command(flatten)]
    pub(crate) job: JobArgs,
}

/// Arguments for `rsync-launcher run`.
#[derive(Debug, Parser)]
pub(crate) struct RunCommand {
    /// Job to run.
    #[command(flatten)]
    pub(crate) job: JobArgs,
    /// Launch mode; defaults to the configured `launch_mode`.
    #[arg(long, value_enum)]
    pub(crate) mode: Option<ModeArg>,
    /// Prompt for an SSH password and pass it on through `sshpass`.
    #[arg(long)]
    pub(crate) ask_password: bool,
}

/// Arguments for `rsync-launcher ls`.
#[derive(Debug, Parser)]
pub(crate) struct LsCommand {
    /// Remote directory as `[user@]host:path`; an empty path lists the login
    /// directory.
    #[arg(value_name = "LOCATION")]
    pub(crate) location: String,
    /// Private key passed to ssh with `-i`.
    #[arg(long, value_name = "KEY")]
    pub(crate) identity: Option<String>,
    /// SSH port.
    #[arg(long, short = 'p', value_name = "PORT")]
    pub(crate) port: Option<u16>,
    /// Prompt for an SSH password and pass it on through `sshpass`.
    #[arg(long)]
    pub(crate) ask_password: bool,
    /// Only show directories.
    #[arg(long, short = 'd')]
    pub(crate) dirs_only: bool,
    /// Print entries as JSON.
    #[arg(long)]
    pub(crate) json: bool,
}

/// `rsync-launcher bookmark` subcommands.
#[derive(Debug, Subcommand)]
pub(crate) enum BookmarkCommand {
    /// Save a job under a name.
    #[command(name = "save", disable_help_flag = true)]
    Save(BookmarkSaveCommand),
    /// List bookmarks, most recently used first.
    #[command(name = "list")]
    List(BookmarkListCommand),
    /// Show one bookmark.
    #[command(name = "show")]
    Show(BookmarkKey),
    /// Run a bookmarked job and mark it as used.
    #[command(name = "run")]
    Run(BookmarkRunCommand),
    /// Delete a bookmark.
    #[command(name = "remove")]
    Remove(BookmarkKey),
}

/// Arguments for `rsync-launcher bookmark save`.
#[derive(Debug, Parser)]
pub(crate) struct BookmarkSaveCommand {
    /// Bookmark name; defaults to `<source name> → <target name>`.
    #[arg(long, short = 'n')]
    pub(crate) name: Option<String>,
    /// Job to save.
    #[command(flatten)]
    pub(crate) job: JobArgs,
}

/// Arguments for `rsync-launcher bookmark list`.
#[derive(Debug, Parser)]
pub(crate) struct BookmarkListCommand {
    /// Maximum number of bookmarks; defaults to the configured `recent_limit`.
    #[arg(long, conflicts_with = "all")]
    pub(crate) limit: Option<usize>,
    /// List every bookmark.
    #[arg(long)]
    pub(crate) all: bool,
}

/// A bookmark id or name.
#[derive(Debug, Parser)]
pub(crate) struct BookmarkKey {
    /// Bookmark id or exact name.
    #[arg(value_name = "ID_OR_NAME")]
    pub(crate) key: String,
}

/// Arguments for `rsync-launcher bookmark run`.
#[derive(Debug, Parser)]
pub(crate) struct BookmarkRunCommand {
    /// Bookmark id or exact name.
    #[arg(value_name = "ID_OR_NAME")]
    pub(crate) key: String,
    /// Launch mode; defaults to the configured `launch_mode`.
    #[arg(long, value_enum)]
    pub(crate) mode: Option<ModeArg>,
    /// Prompt for an SSH password and pass it on through `sshpass`.
    #[arg(long)]
    pub(crate) ask_password: bool,
}
