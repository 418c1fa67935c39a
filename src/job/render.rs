//! Rendering a [`SyncJob`] into an rsync command line.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use shell_escape::unix::escape;

use super::endpoint::{EndpointConfig, Side};
use super::options::SyncOptions;
use super::JobError;
use crate::process::LaunchCommand;
use crate::util::expand_tilde;

/// One sync job: where from, where to, and how.
#[derive(Clone, Debug, Default, Deserialize, Serialize, Eq, PartialEq)]
pub struct SyncJob {
    /// Endpoint files are copied from.
    pub source: EndpointConfig,
    /// Endpoint files are copied to.
    pub target: EndpointConfig,
    /// rsync toggles.
    pub options: SyncOptions,
}

/// Canonical argument vector of a rendered job.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedCommand {
    /// Executable, normally `rsync`.
    pub program: String,
    /// Arguments in render order.
    pub args: Vec<String>,
}

impl RenderedCommand {
    /// Renders a single shell line, escaping every element.
    #[must_use]
    pub fn to_shell_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(&self.args)
            .map(|part| escape(Cow::from(part.as_str())))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Converts into a spawnable invocation.
    #[must_use]
    pub fn into_launch_command(self) -> LaunchCommand {
        LaunchCommand::new(self.program).args(self.args)
    }
}

impl SyncJob {
    /// Creates a job from its parts.
    #[must_use]
    pub const fn new(source: EndpointConfig, target: EndpointConfig, options: SyncOptions) -> Self {
        Self {
            source,
            target,
            options,
        }
    }

    /// Renders the job with the given `rsync` and `ssh` executables.
    #[must_use]
    pub fn render(&self, rsync_bin: &str, ssh_bin: &str) -> RenderedCommand {
        RenderedCommand {
            program: rsync_bin.to_owned(),
            args: self.rsync_args(ssh_bin),
        }
    }

    /// Builds the rsync argument vector: flags, optional `-e` remote shell,
    /// source, target.
    #[must_use]
    pub fn rsync_args(&self, ssh_bin: &str) -> Vec<String> {
        let mut args: Vec<String> = self
            .options
            .flags()
            .into_iter()
            .map(str::to_owned)
            .collect();

        if let Some(remote_shell) = self.remote_shell(ssh_bin) {
            args.push(String::from("-e"));
            args.push(remote_shell);
        }

        args.push(self.options.source_location(self.source.location()));
        args.push(self.target.location());
        args
    }

    /// The ssh command rsync should use, when the job needs anything beyond
    /// rsync's default transport.
    ///
    /// The identity comes from the source when it is remote and uses a key,
    /// otherwise from the target under the same rule. The port follows the
    /// first remote endpoint.
    #[must_use]
    pub fn remote_shell(&self, ssh_bin: &str) -> Option<String> {
        let identity = self.source.identity().or_else(|| self.target.identity());
        let port = self.transport_port();
        if identity.is_none() && port.is_none() {
            return None;
        }

        let mut shell = String::from(ssh_bin);
        if let Some(number) = port {
            shell.push_str(" -p ");
            shell.push_str(&number.to_string());
        }
        if let Some(key) = identity {
            let expanded = expand_tilde(key);
            shell.push_str(" -i ");
            shell.push_str(&escape(Cow::from(expanded.as_str())));
        }
        Some(shell)
    }

    /// Checks both endpoints and rejects remote-to-remote jobs.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::MissingField`] for blank fields or
    /// [`JobError::BothRemote`] when neither side is local.
    pub fn validate(&self) -> Result<(), JobError> {
        self.source.validate(Side::Source)?;
        self.target.validate(Side::Target)?;
        if self.source.is_remote && self.target.is_remote {
            return Err(JobError::BothRemote);
        }
        Ok(())
    }

    /// Suggested bookmark name, `"<source> → <target>"` by basename.
    #[must_use]
    pub fn suggest_name(&self) -> String {
        format!(
            "{} → {}",
            self.source.display_name(),
            self.target.display_name()
        )
    }

    fn transport_port(&self) -> Option<u16> {
        [&self.source, &self.target]
            .into_iter()
            .find(|endpoint| endpoint.is_remote)
            .and_then(|endpoint| endpoint.port)
    }
}
