//! Launch mode selection.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// How a rendered job is executed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LaunchMode {
    /// Spawn `rsync` directly with the argument vector.
    #[default]
    Direct,
    /// Run the shell line through `sh -c`.
    Shell,
    /// Run the shell line through AppleScript `do shell script`.
    AppleScript,
    /// Open the shell line in a new Terminal.app window.
    Terminal,
}

impl LaunchMode {
    /// Whether the child's output comes back to the caller.
    #[must_use]
    pub const fn captures_output(self) -> bool {
        !matches!(self, Self::Terminal)
    }

    /// Whether an SSH password can be injected through the environment.
    #[must_use]
    pub const fn supports_password(self) -> bool {
        matches!(self, Self::Direct | Self::Shell)
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::Shell => "shell",
            Self::AppleScript => "applescript",
            Self::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// Returned when a launch mode name is not recognised.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown launch mode '{0}'")]
pub struct UnknownLaunchMode(pub String);

impl FromStr for LaunchMode {
    type Err = UnknownLaunchMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "shell" => Ok(Self::Shell),
            "applescript" => Ok(Self::AppleScript),
            "terminal" => Ok(Self::Terminal),
            _ => Err(UnknownLaunchMode(value.trim().to_owned())),
        }
    }
}
