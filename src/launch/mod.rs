//! Launching rendered jobs.
//!
//! The launcher turns a [`SyncJob`] into a [`LaunchCommand`] for the chosen
//! [`LaunchMode`], runs it through a [`CommandRunner`], and reports the exit
//! code. A non-zero rsync status is part of the report rather than an error,
//! so callers can surface it the same way rsync would.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, LauncherConfig};
use crate::job::{JobError, RenderedCommand, SyncJob};
use crate::process::{
    CommandOutput, CommandRunner, Credentials, LaunchCommand, RunnerError, StreamingCommandRunner,
};

mod applescript;
mod mode;

pub use applescript::quote as applescript_quote;
pub use mode::{LaunchMode, UnknownLaunchMode};

/// Errors surfaced while preparing or running a launch.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum LaunchError {
    /// Raised when the launcher configuration fails validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Raised when the job is incomplete or cannot be expressed as one
    /// rsync invocation.
    #[error("invalid job: {0}")]
    Job(#[from] JobError),
    /// Raised when a password is supplied for a mode that cannot pass it on.
    #[error("password authentication is not supported in {mode} mode; use direct or shell")]
    PasswordUnsupported {
        /// Mode that was requested.
        mode: LaunchMode,
    },
    /// Raised when the process cannot be spawned or supervised.
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Outcome of a launch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchReport {
    /// Shell line that was launched, as shown in previews.
    pub command_line: String,
    /// Mode used.
    pub mode: LaunchMode,
    /// Exit status and captured output of the spawned process.
    pub output: CommandOutput,
}

impl LaunchReport {
    /// Returns `true` when the spawned process exited with status zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.output.is_success()
    }
}

/// Renders and launches sync jobs.
#[derive(Clone, Debug)]
pub struct Launcher<R: CommandRunner> {
    config: LauncherConfig,
    runner: R,
}

impl Launcher<StreamingCommandRunner> {
    /// Convenience constructor that echoes output to the terminal.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Config`] when validation fails.
    pub fn with_streaming_runner(config: LauncherConfig) -> Result<Self, LaunchError> {
        Self::new(config, StreamingCommandRunner)
    }
}

impl<R: CommandRunner> Launcher<R> {
    /// Creates a launcher using the provided configuration and runner.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Config`] when configuration validation fails.
    pub fn new(config: LauncherConfig, runner: R) -> Result<Self, LaunchError> {
        config.validate()?;
        Ok(Self { config, runner })
    }

    /// Renders `job` with the configured executables.
    #[must_use]
    pub fn render(&self, job: &SyncJob) -> RenderedCommand {
        job.render(&self.config.rsync_bin, &self.config.ssh_bin)
    }

    /// Shell line for `job`, identical to what the shell-based modes run.
    #[must_use]
    pub fn preview(&self, job: &SyncJob) -> String {
        self.render(job).to_shell_line()
    }

    /// Builds the process invocation for `job` in `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::PasswordUnsupported`] when credentials are
    /// supplied for a mode that cannot forward them.
    pub fn build_launch_command(
        &self,
        job: &SyncJob,
        mode: LaunchMode,
        credentials: Option<&Credentials>,
    ) -> Result<LaunchCommand, LaunchError> {
        if credentials.is_some() && !mode.supports_password() {
            return Err(LaunchError::PasswordUnsupported { mode });
        }

        let rendered = self.render(job);
        let command = match mode {
            LaunchMode::Direct => rendered.into_launch_command(),
            LaunchMode::Shell => LaunchCommand::new(self.config.shell_bin.as_str())
                .arg("-c")
                .arg(rendered.to_shell_line()),
            LaunchMode::AppleScript => LaunchCommand::new(self.config.osascript_bin.as_str())
                .args(applescript::do_shell_script(&rendered.to_shell_line())),
            LaunchMode::Terminal => LaunchCommand::new(self.config.osascript_bin.as_str())
                .args(applescript::terminal_do_script(&rendered.to_shell_line())),
        };

        Ok(command.with_credentials(&self.config.sshpass_bin, credentials))
    }

    /// Validates and launches `job`, returning the exit status and output.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Job`] for an incomplete job,
    /// [`LaunchError::PasswordUnsupported`] for credentials the mode cannot
    /// forward, and [`LaunchError::Runner`] when the process cannot be
    /// spawned.
    pub fn launch(
        &self,
        job: &SyncJob,
        mode: LaunchMode,
        credentials: Option<&Credentials>,
    ) -> Result<LaunchReport, LaunchError> {
        job.validate()?;
        let command = self.build_launch_command(job, mode, credentials)?;
        let command_line = self.preview(job);

        info!(%mode, "$ {command_line}");
        debug!(program = %command.program, args = command.args.len(), "spawning");
        let output = self.runner.run(&command)?;
        if !output.is_success() {
            warn!(%mode, status = %output.status_text(), "launch finished with a failure status");
        }

        Ok(LaunchReport {
            command_line,
            mode,
            output,
        })
    }
}

#[cfg(test)]
mod tests;
