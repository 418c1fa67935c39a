//! Configuration loading via `ortho-config`.
//!
//! [`LauncherConfig`] names the external binaries the launcher shells out to,
//! where bookmarks live, and which launch mode is used when none is given on
//! the command line. Values merge defaults, `rsync-launcher.toml`, and
//! `RSYNC_LAUNCHER_*` environment variables.

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::launch::LaunchMode;
use crate::util::expand_tilde;

/// Default location of the bookmark store.
pub const DEFAULT_BOOKMARKS_PATH: &str = "~/.config/rsync-launcher/bookmarks.json";

/// Default number of bookmarks listed as "recent".
pub const DEFAULT_RECENT_LIMIT: usize = 8;

const CONFIG_FILE: &str = "rsync-launcher.toml";

/// Launcher settings loaded via `ortho-config`.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "RSYNC_LAUNCHER",
    discovery(
        app_name = "rsync-launcher",
        env_var = "RSYNC_LAUNCHER_CONFIG_PATH",
        config_file_name = "rsync-launcher.toml",
        dotfile_name = ".rsync-launcher.toml",
        project_file_name = "rsync-launcher.toml"
    )
)]
pub struct LauncherConfig {
    /// Path to the `rsync` executable.
    #[ortho_config(default = "rsync".to_owned())]
    pub rsync_bin: String,
    /// Path to the `ssh` executable, used as rsync's remote shell and for
    /// remote listings.
    #[ortho_config(default = "ssh".to_owned())]
    pub ssh_bin: String,
    /// Shell used by the `shell` launch mode.
    #[ortho_config(default = "sh".to_owned())]
    pub shell_bin: String,
    /// Path to `osascript`, used by the `applescript` and `terminal` modes.
    #[ortho_config(default = "osascript".to_owned())]
    pub osascript_bin: String,
    /// Path to `sshpass`, used when an SSH password is supplied.
    #[ortho_config(default = "sshpass".to_owned())]
    pub sshpass_bin: String,
    /// Location of the bookmark JSON file. Supports a leading `~/`.
    #[ortho_config(default = DEFAULT_BOOKMARKS_PATH.to_owned())]
    pub bookmarks_path: String,
    /// Launch mode used when the command line does not pick one.
    #[ortho_config(default = "direct".to_owned())]
    pub launch_mode: String,
    /// Number of bookmarks shown by `bookmark list` without `--limit`.
    #[ortho_config(default = DEFAULT_RECENT_LIMIT)]
    pub recent_limit: usize,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

const REQUIRED_FIELDS: [FieldMetadata; 6] = [
    FieldMetadata::new("rsync binary", "RSYNC_LAUNCHER_RSYNC_BIN", "rsync_bin"),
    FieldMetadata::new("ssh binary", "RSYNC_LAUNCHER_SSH_BIN", "ssh_bin"),
    FieldMetadata::new("shell binary", "RSYNC_LAUNCHER_SHELL_BIN", "shell_bin"),
    FieldMetadata::new("osascript binary", "RSYNC_LAUNCHER_OSASCRIPT_BIN", "osascript_bin"),
    FieldMetadata::new("sshpass binary", "RSYNC_LAUNCHER_SSHPASS_BIN", "sshpass_bin"),
    FieldMetadata::new("bookmark file", "RSYNC_LAUNCHER_BOOKMARKS_PATH", "bookmarks_path"),
];

impl LauncherConfig {
    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("rsync-launcher")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and TOML key that provide the offending value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required value is blank
    /// and [`ConfigError::InvalidValue`] when a value cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            &self.rsync_bin,
            &self.ssh_bin,
            &self.shell_bin,
            &self.osascript_bin,
            &self.sshpass_bin,
            &self.bookmarks_path,
        ];
        for (value, metadata) in values.into_iter().zip(REQUIRED_FIELDS.iter()) {
            Self::require_field(value, metadata)?;
        }

        if self.recent_limit == 0 {
            return Err(ConfigError::InvalidValue(format!(
                "recent_limit must be at least 1: set RSYNC_LAUNCHER_RECENT_LIMIT or \
                 recent_limit in {CONFIG_FILE}"
            )));
        }

        self.default_launch_mode()?;
        Ok(())
    }

    /// Parses the configured default launch mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown mode name.
    pub fn default_launch_mode(&self) -> Result<LaunchMode, ConfigError> {
        self.launch_mode.parse().map_err(|_| {
            ConfigError::InvalidValue(format!(
                "unknown launch_mode '{}': expected direct, shell, applescript or terminal \
                 (RSYNC_LAUNCHER_LAUNCH_MODE or launch_mode in {CONFIG_FILE})",
                self.launch_mode.trim()
            ))
        })
    }

    /// Returns the bookmark file location with `~/` expanded.
    #[must_use]
    pub fn bookmarks_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(expand_tilde(self.bookmarks_path.trim()))
    }

    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to {CONFIG_FILE}",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is present but unusable.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
