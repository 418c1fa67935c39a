//! Browsing directories on a remote host.
//!
//! Listings come from `ls -la` run over ssh with the C locale, so the column
//! layout stays predictable, and are parsed by [`parse_listing`].

use shell_escape::unix::escape;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, LauncherConfig};
use crate::job::{Endpoint, EndpointConfig};
use crate::process::{CommandRunner, Credentials, LaunchCommand, ProcessCommandRunner, RunnerError};
use crate::util::expand_tilde;

mod parser;

pub use parser::{EntryKind, RemoteEntry, parse_listing};

/// Errors surfaced while listing a remote directory.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ListError {
    /// Raised when the launcher configuration fails validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Raised when the endpoint is not a usable remote host.
    #[error("invalid remote host: {0}")]
    InvalidHost(String),
    /// Raised when ssh cannot be spawned.
    #[error(transparent)]
    Runner(#[from] RunnerError),
    /// Raised when the remote `ls` exits with a non-zero status.
    #[error("{program} exited with status {status_text}: {stderr}")]
    CommandFailure {
        /// Command name used for the attempted operation.
        program: String,
        /// Exit status as reported by the OS.
        status: Option<i32>,
        /// Human readable representation of the exit status.
        status_text: String,
        /// Stderr captured from the process.
        stderr: String,
    },
}

/// SSH connection details for a listing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RemoteHost {
    /// Login name; blank lets ssh choose.
    pub user: String,
    /// Host name or address.
    pub host: String,
    /// Non-default SSH port.
    pub port: Option<u16>,
    /// Private key path, tilde allowed.
    pub identity: Option<String>,
}

impl RemoteHost {
    /// Builds a host from the remote side of a job.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidHost`] when the endpoint is local or its
    /// host is blank.
    pub fn from_endpoint(endpoint: &EndpointConfig) -> Result<Self, ListError> {
        match endpoint.endpoint() {
            Endpoint::Local { .. } => Err(ListError::InvalidHost(String::from(
                "expected [user@]host:path",
            ))),
            Endpoint::Remote { host, .. } if host.is_empty() => {
                Err(ListError::InvalidHost(String::from("host is empty")))
            }
            Endpoint::Remote {
                user,
                host,
                identity,
                port,
                ..
            } => Ok(Self {
                user: user.to_owned(),
                host: unbracket(host).to_owned(),
                port,
                identity: identity.map(str::to_owned),
            }),
        }
    }

    /// `user@host`, or just `host` when the user is blank.
    #[must_use]
    pub fn destination(&self) -> String {
        let user = self.user.trim();
        if user.is_empty() {
            self.host.trim().to_owned()
        } else {
            format!("{user}@{}", self.host.trim())
        }
    }
}

/// ssh takes IPv6 addresses bare, while rsync locations bracket them.
fn unbracket(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
        .unwrap_or(host)
}

/// Parsed contents of one remote directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteListing {
    /// Directory that was listed, as requested.
    pub path: String,
    /// Entries, directories first.
    pub entries: Vec<RemoteEntry>,
}

impl RemoteListing {
    /// Subdirectories of the listed directory.
    #[must_use]
    pub fn directories(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.entries.iter().filter(|entry| entry.kind.is_dir())
    }

    /// Everything that is not a directory.
    #[must_use]
    pub fn files(&self) -> impl Iterator<Item = &RemoteEntry> {
        self.entries.iter().filter(|entry| !entry.kind.is_dir())
    }

    /// Remote path of `entry` inside this listing.
    #[must_use]
    pub fn path_of(&self, entry: &RemoteEntry) -> String {
        join_remote(&self.path, &entry.name)
    }
}

/// Lists remote directories over ssh.
#[derive(Clone, Debug)]
pub struct RemoteLister<R: CommandRunner> {
    config: LauncherConfig,
    runner: R,
}

impl RemoteLister<ProcessCommandRunner> {
    /// Convenience constructor that captures ssh output.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Config`] when validation fails.
    pub fn with_process_runner(config: LauncherConfig) -> Result<Self, ListError> {
        Self::new(config, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> RemoteLister<R> {
    /// Creates a lister using the provided configuration and runner.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Config`] when configuration validation fails.
    pub fn new(config: LauncherConfig, runner: R) -> Result<Self, ListError> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    /// Builds the ssh invocation that lists `path` on `host`.
    #[must_use]
    pub fn build_command(&self, host: &RemoteHost, path: &str) -> LaunchCommand {
        let mut command = LaunchCommand::new(self.config.ssh_bin.as_str());
        if let Some(port) = host.port {
            command = command.arg("-p").arg(port.to_string());
        }
        if let Some(identity) = host.identity.as_deref() {
            command = command.arg("-i").arg(expand_tilde(identity));
        }
        command.arg(host.destination()).arg(list_command(path))
    }

    /// Lists `path` on `host`; a blank path lists the login directory.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::InvalidHost`] for a blank host,
    /// [`ListError::Runner`] when ssh cannot be spawned, and
    /// [`ListError::CommandFailure`] when the remote command fails.
    pub fn list(
        &self,
        host: &RemoteHost,
        path: &str,
        credentials: Option<&Credentials>,
    ) -> Result<RemoteListing, ListError> {
        if host.host.trim().is_empty() {
            return Err(ListError::InvalidHost(String::from("host is empty")));
        }

        let command = self
            .build_command(host, path)
            .with_credentials(&self.config.sshpass_bin, credentials);
        debug!(destination = %host.destination(), path, "listing remote directory");
        let output = self.runner.run(&command)?;
        if !output.is_success() {
            return Err(ListError::CommandFailure {
                program: self.config.ssh_bin.clone(),
                status: output.code,
                status_text: output.status_text(),
                stderr: output.stderr,
            });
        }

        let entries = parse_listing(&output.stdout);
        debug!(count = entries.len(), "parsed remote listing");
        Ok(RemoteListing {
            path: path.trim().to_owned(),
            entries,
        })
    }
}

/// Remote shell command for listing `path`.
///
/// A leading `~` is left unquoted so the remote shell expands it.
fn list_command(path: &str) -> String {
    let base = "LC_ALL=C ls -la";
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return base.to_owned();
    }
    if trimmed == "~" {
        return format!("{base} ~");
    }
    match trimmed.strip_prefix("~/") {
        Some("") => format!("{base} ~/"),
        Some(rest) => format!("{base} ~/{}", escape(rest.into())),
        None => format!("{base} {}", escape(trimmed.into())),
    }
}

/// Appends `name` to a remote directory path.
#[must_use]
pub fn join_remote(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_owned()
    } else if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Parent of a remote directory path.
///
/// `/` is its own parent. A relative path with one component yields the
/// empty path, which lists the login directory.
#[must_use]
pub fn parent_remote(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.starts_with('/') {
            String::from("/")
        } else {
            String::new()
        };
    }
    match trimmed.rsplit_once('/') {
        Some(("", _)) => String::from("/"),
        Some((parent, _)) => parent.to_owned(),
        None => String::new(),
    }
}
