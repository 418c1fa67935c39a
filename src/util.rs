//! Utility functions for path manipulation.

use camino::Utf8Path;

/// Expands a leading `~/` prefix to the user's home directory.
///
/// If the `HOME` environment variable is not set, the function returns the
/// input string unchanged.
///
/// # Examples
///
/// ```
/// # use rsync_launcher::util::expand_tilde;
/// let home = std::env::var("HOME").expect("HOME should be set");
/// assert_eq!(expand_tilde("~/.ssh/id_ed25519"), format!("{home}/.ssh/id_ed25519"));
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return format!("{}/{rest}", home.to_string_lossy());
    }
    path.to_owned()
}

/// Returns the last component of `path`, ignoring trailing slashes.
///
/// The root directory yields `/` and an empty path yields an empty string.
#[must_use]
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "" } else { "/" };
    }
    Utf8Path::new(trimmed).file_name().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn expand_tilde_expands_home_prefix() {
        let home = std::env::var("HOME").expect("HOME should be set");
        let expanded = expand_tilde("~/.ssh/id_ed25519");
        assert_eq!(expanded, format!("{home}/.ssh/id_ed25519"));
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths_unchanged() {
        let path = "/absolute/path/to/key";
        assert_eq!(expand_tilde(path), path);
    }

    #[test]
    fn expand_tilde_leaves_bare_tilde_unchanged() {
        assert_eq!(expand_tilde("~"), "~");
    }

    #[rstest]
    #[case("/home/me/photos", "photos")]
    #[case("/home/me/photos/", "photos")]
    #[case("photos", "photos")]
    #[case("/", "/")]
    #[case("", "")]
    fn basename_returns_last_component(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(basename(path), expected);
    }
}
