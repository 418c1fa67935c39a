//! Parser for `ls -la` output.

use serde::Serialize;

/// File type taken from the first character of the permission string.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// `d`
    Directory,
    /// `-`
    File,
    /// `l`
    Symlink,
    /// Devices, sockets, pipes and anything else.
    Other,
}

impl EntryKind {
    fn from_permissions(permissions: &str) -> Self {
        match permissions.chars().next() {
            Some('d') => Self::Directory,
            Some('-') => Self::File,
            Some('l') => Self::Symlink,
            _ => Self::Other,
        }
    }

    /// Returns `true` for directories.
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Directory)
    }
}

/// One row of a remote directory listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RemoteEntry {
    /// File name, with spacing preserved.
    pub name: String,
    /// File type.
    pub kind: EntryKind,
    /// Size in bytes; zero for device files and unparseable sizes.
    pub size: u64,
    /// Permission string such as `drwxr-xr-x`.
    pub permissions: String,
    /// Modification time exactly as `ls` printed it.
    pub modified: String,
    /// Target of a symbolic link.
    pub link_target: Option<String>,
}

const MIN_FIELDS: usize = 9;
const LINK_ARROW: &str = " -> ";

/// Parses `ls -la` output into entries, directories first, then by name.
///
/// Blank lines, `total` lines, lines with fewer than nine fields, and the
/// `.` and `..` entries are skipped.
#[must_use]
pub fn parse_listing(text: &str) -> Vec<RemoteEntry> {
    let mut entries: Vec<RemoteEntry> = text.lines().filter_map(parse_line).collect();
    entries.sort_by(|left, right| {
        right
            .kind
            .is_dir()
            .cmp(&left.kind.is_dir())
            .then_with(|| left.name.cmp(&right.name))
    });
    entries
}

fn parse_line(raw: &str) -> Option<RemoteEntry> {
    let line = raw.trim_end_matches('\r');
    let trimmed = line.trim();
    if trimmed.is_empty() || is_total_line(trimmed) {
        return None;
    }

    let (head, _) = split_fields(line, 5)?;
    let permissions = head.first()?;
    let size_field = head.get(4)?;

    // Device files print `major, minor` in place of the size.
    let is_device = size_field.ends_with(',');
    let fixed = if is_device { MIN_FIELDS } else { MIN_FIELDS - 1 };
    let (fields, rest) = split_fields(line, fixed)?;
    if rest.is_empty() {
        return None;
    }

    let size = if is_device {
        0
    } else {
        size_field.parse().unwrap_or(0)
    };
    let modified = fields.get(fixed - 3..fixed)?.join(" ");
    let kind = EntryKind::from_permissions(permissions);

    let (name, link_target) = match (kind, rest.split_once(LINK_ARROW)) {
        (EntryKind::Symlink, Some((name, target))) => (name, Some(target.to_owned())),
        _ => (rest, None),
    };
    if matches!(name, "." | "..") {
        return None;
    }

    Some(RemoteEntry {
        name: name.to_owned(),
        kind,
        size,
        permissions: (*permissions).to_owned(),
        modified,
        link_target,
    })
}

fn is_total_line(line: &str) -> bool {
    let mut parts = line.split_whitespace();
    parts.next() == Some("total") && parts.count() <= 1
}

/// Splits off `count` whitespace-separated fields and returns them with the
/// rest of the line after the single separator that follows the last field.
fn split_fields(line: &str, count: usize) -> Option<(Vec<&str>, &str)> {
    let mut fields = Vec::with_capacity(count);
    let mut rest = line;
    for _ in 0..count {
        rest = rest.trim_start();
        let end = rest.find(char::is_whitespace)?;
        let (field, tail) = rest.split_at(end);
        fields.push(field);
        rest = tail;
    }
    Some((fields, rest.strip_prefix(char::is_whitespace).unwrap_or(rest)))
}
