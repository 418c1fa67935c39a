//! Source and target endpoint descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::JobError;
use crate::util::basename;

/// Which side of a sync job an endpoint sits on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    /// The side files are copied from.
    Source,
    /// The side files are copied to.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// User-entered fields for one side of a job, in the shape bookmarks persist.
///
/// Both the local and remote fields are kept regardless of `is_remote` so a
/// bookmark restores exactly what was entered.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Whether the remote fields are active.
    pub is_remote: bool,
    /// Remote login name; may be blank to let ssh pick the default.
    #[serde(default)]
    pub user: String,
    /// Remote host name or address.
    #[serde(default)]
    pub host: String,
    /// Path on the remote host.
    #[serde(default)]
    pub remote_path: String,
    /// Path on the local machine.
    #[serde(default)]
    pub local_path: String,
    /// Whether `ssh_key_path` should be passed to ssh.
    #[serde(rename = "useSSHKey", default)]
    pub use_ssh_key: bool,
    /// Private key used for the remote side.
    #[serde(rename = "sshKeyPath", default)]
    pub ssh_key_path: String,
    /// SSH port, when not the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Resolved view of an [`EndpointConfig`] with whitespace trimmed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endpoint<'a> {
    /// A directory on this machine.
    Local {
        /// Local path.
        path: &'a str,
    },
    /// A directory reached over ssh.
    Remote {
        /// Login name, possibly empty.
        user: &'a str,
        /// Host name or address.
        host: &'a str,
        /// Path on the remote host.
        path: &'a str,
        /// Private key path, when key authentication is enabled.
        identity: Option<&'a str>,
        /// Non-default SSH port.
        port: Option<u16>,
    },
}

impl EndpointConfig {
    /// Builds a local endpoint.
    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            local_path: path.into(),
            ..Self::default()
        }
    }

    /// Builds a remote endpoint without key authentication.
    #[must_use]
    pub fn remote(
        user: impl Into<String>,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            is_remote: true,
            user: user.into(),
            host: host.into(),
            remote_path: path.into(),
            ..Self::default()
        }
    }

    /// Enables key authentication with the given private key.
    #[must_use]
    pub fn with_identity(mut self, key_path: impl Into<String>) -> Self {
        self.use_ssh_key = true;
        self.ssh_key_path = key_path.into();
        self
    }

    /// Sets a non-default SSH port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Parses an rsync-style location.
    ///
    /// `[user@]host:path` is remote, with IPv6 hosts in brackets
    /// (`bob@[fe80::1]:/srv`). Everything else is local, including strings
    /// where a `/` appears before the first `:` (`./a:b`, `/x:y`).
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let Some((authority, path)) = split_authority(trimmed) else {
            return Self::local(trimmed);
        };
        if authority.is_empty() || authority.contains('/') {
            return Self::local(trimmed);
        }
        match authority.split_once('@') {
            Some((user, host)) => Self::remote(user, host, path),
            None => Self::remote("", authority, path),
        }
    }

    /// Resolves the active fields into an [`Endpoint`].
    #[must_use]
    pub fn endpoint(&self) -> Endpoint<'_> {
        if self.is_remote {
            Endpoint::Remote {
                user: self.user.trim(),
                host: self.host.trim(),
                path: self.remote_path.trim(),
                identity: self.identity(),
                port: self.port,
            }
        } else {
            Endpoint::Local {
                path: self.local_path.trim(),
            }
        }
    }

    /// Returns the private key path when this endpoint is remote, key
    /// authentication is enabled, and the path is not blank.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        let key = self.ssh_key_path.trim();
        (self.is_remote && self.use_ssh_key && !key.is_empty()).then_some(key)
    }

    /// Renders the location the way rsync expects it.
    ///
    /// Remote endpoints render as `user@host:path`, or `host:path` when the
    /// user is blank.
    #[must_use]
    pub fn location(&self) -> String {
        match self.endpoint() {
            Endpoint::Local { path } => path.to_owned(),
            Endpoint::Remote {
                user, host, path, ..
            } if user.is_empty() => format!("{host}:{path}"),
            Endpoint::Remote {
                user, host, path, ..
            } => format!("{user}@{host}:{path}"),
        }
    }

    /// Last path component of the active path, used to name bookmarks.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.endpoint() {
            Endpoint::Local { path } | Endpoint::Remote { path, .. } => basename(path),
        }
    }

    /// Checks that the active fields are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::MissingField`] naming the blank field.
    pub fn validate(&self, side: Side) -> Result<(), JobError> {
        let missing = |field: &str| JobError::MissingField {
            side,
            field: field.to_owned(),
        };
        match self.endpoint() {
            Endpoint::Local { path } if path.is_empty() => Err(missing("local path")),
            Endpoint::Remote { host, .. } if host.is_empty() => Err(missing("host")),
            Endpoint::Remote { path, .. } if path.is_empty() => Err(missing("remote path")),
            Endpoint::Local { .. } | Endpoint::Remote { .. } => Ok(()),
        }
    }
}

/// Splits `[user@]host:path` at the colon ending the host, skipping the
/// colons inside a bracketed IPv6 address.
fn split_authority(location: &str) -> Option<(&str, &str)> {
    let host_start = location.find('@').map_or(0, |at| at + 1);
    if location.get(host_start..)?.starts_with('[') {
        let close = location.find("]:")?;
        return Some((location.get(..=close)?, location.get(close + 2..)?));
    }
    location.split_once(':')
}
