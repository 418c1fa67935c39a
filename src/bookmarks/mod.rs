//! Persisted job presets.
//!
//! Bookmarks are kept as a pretty-printed JSON array. A missing file is an
//! empty store; a file that no longer parses is moved aside to
//! `<name>.corrupt-<timestamp>` and the store starts empty, with a warning, so
//! a damaged store never blocks launching jobs and is never overwritten.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::job::{EndpointConfig, SyncJob, SyncOptions};

mod timestamp;

/// A named snapshot of one sync job.
#[derive(Clone, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Stable identifier, a UUID v4 for bookmarks created here.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Source endpoint fields.
    pub source: EndpointConfig,
    /// Target endpoint fields.
    pub target: EndpointConfig,
    /// Option toggles.
    pub options: SyncOptions,
    /// Command line rendered when the bookmark was saved.
    pub command: String,
    /// When the bookmark was saved or last run.
    #[serde(with = "timestamp")]
    pub last_used: DateTime<Utc>,
}

impl Bookmark {
    /// Snapshots `job` under `name` with a fresh id.
    #[must_use]
    pub fn from_job(name: impl Into<String>, job: &SyncJob, command: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            source: job.source.clone(),
            target: job.target.clone(),
            options: job.options,
            command: command.into(),
            last_used: Utc::now(),
        }
    }

    /// Restores the job this bookmark was taken from.
    #[must_use]
    pub fn job(&self) -> SyncJob {
        SyncJob::new(self.source.clone(), self.target.clone(), self.options)
    }
}

/// Errors raised while reading or writing the bookmark file.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when bookmarks cannot be serialised.
    #[error("failed to serialise bookmarks for {path}: {message}")]
    Serialise {
        /// Destination path.
        path: Utf8PathBuf,
        /// Serializer error message.
        message: String,
    },
    /// Raised when no bookmark matches an id or name.
    #[error("no bookmark with id or name '{key}'")]
    NotFound {
        /// Id or name that was looked up.
        key: String,
    },
}

/// Bookmark list bound to the file it persists to.
#[derive(Clone, Debug)]
pub struct BookmarkStore {
    path: Utf8PathBuf,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    /// Loads bookmarks from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Io`] when the file exists but cannot be read,
    /// or when an unparseable file cannot be moved aside. A missing or
    /// unparseable file yields an empty store.
    pub fn load(path: impl Into<Utf8PathBuf>) -> Result<Self, BookmarkError> {
        let store_path = path.into();
        let bookmarks: Vec<Bookmark> = match read_file(&store_path)? {
            None => Vec::new(),
            Some(contents) if contents.trim().is_empty() => Vec::new(),
            Some(contents) => match serde_json::from_str(&contents) {
                Ok(parsed) => parsed,
                Err(err) => {
                    let backup = quarantine_file(&store_path)?;
                    warn!(
                        path = %store_path,
                        backup = %backup,
                        error = %err,
                        "ignoring unreadable bookmark file"
                    );
                    Vec::new()
                }
            },
        };
        debug!(path = %store_path, count = bookmarks.len(), "loaded bookmarks");
        Ok(Self {
            path: store_path,
            bookmarks,
        })
    }

    /// File the store persists to.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// All bookmarks in stored order, newest additions first.
    #[must_use]
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Writes the store, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::Io`] or [`BookmarkError::Serialise`].
    pub fn save(&self) -> Result<(), BookmarkError> {
        let rendered =
            serde_json::to_string_pretty(&self.bookmarks).map_err(|err| BookmarkError::Serialise {
                path: self.path.clone(),
                message: err.to_string(),
            })?;
        write_file(&self.path, &rendered)
    }

    /// Inserts `bookmark` at the front, replacing any bookmark with the same
    /// id, and saves.
    ///
    /// # Errors
    ///
    /// Propagates [`BookmarkStore::save`] failures.
    pub fn add(&mut self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        self.bookmarks.retain(|existing| existing.id != bookmark.id);
        self.bookmarks.insert(0, bookmark);
        self.save()
    }

    /// Bookmarks ordered by last use, most recent first, at most `limit`.
    #[must_use]
    pub fn recent(&self, limit: usize) -> Vec<&Bookmark> {
        let mut ordered: Vec<&Bookmark> = self.bookmarks.iter().collect();
        ordered.sort_by(|left, right| right.last_used.cmp(&left.last_used));
        ordered.truncate(limit);
        ordered
    }

    /// Looks a bookmark up by exact id, then by exact name. When several
    /// bookmarks share a name the most recently used wins.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Bookmark> {
        self.bookmarks
            .iter()
            .find(|bookmark| bookmark.id == key)
            .or_else(|| {
                self.recent(self.bookmarks.len())
                    .into_iter()
                    .find(|bookmark| bookmark.name == key)
            })
    }

    /// Marks the bookmark matching `key` as used now and saves.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::NotFound`] or a save failure.
    pub fn touch(&mut self, key: &str) -> Result<Bookmark, BookmarkError> {
        let id = self.resolve_id(key)?;
        let mut touched = None;
        for bookmark in &mut self.bookmarks {
            if bookmark.id == id {
                bookmark.last_used = Utc::now();
                touched = Some(bookmark.clone());
                break;
            }
        }
        let bookmark = touched.ok_or_else(|| not_found(key))?;
        self.save()?;
        Ok(bookmark)
    }

    /// Removes the bookmark matching `key` and saves.
    ///
    /// # Errors
    ///
    /// Returns [`BookmarkError::NotFound`] or a save failure.
    pub fn remove(&mut self, key: &str) -> Result<Bookmark, BookmarkError> {
        let id = self.resolve_id(key)?;
        let position = self
            .bookmarks
            .iter()
            .position(|bookmark| bookmark.id == id)
            .ok_or_else(|| not_found(key))?;
        let removed = self.bookmarks.remove(position);
        self.save()?;
        Ok(removed)
    }

    fn resolve_id(&self, key: &str) -> Result<String, BookmarkError> {
        self.find(key)
            .map(|bookmark| bookmark.id.clone())
            .ok_or_else(|| not_found(key))
    }
}

fn not_found(key: &str) -> BookmarkError {
    BookmarkError::NotFound {
        key: key.to_owned(),
    }
}

fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &str), BookmarkError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| BookmarkError::Io {
        path: path.to_path_buf(),
        message: String::from("bookmark path is missing a filename"),
    })?;
    Ok((parent, file_name))
}

fn read_file(path: &Utf8Path) -> Result<Option<String>, BookmarkError> {
    let (parent, file_name) = split_path(path)?;
    let io_error = |err: io::Error| BookmarkError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    };

    let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(io_error(err)),
    };
    match dir.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(io_error(err)),
    }
}

fn quarantine_file(path: &Utf8Path) -> Result<Utf8PathBuf, BookmarkError> {
    let (parent, file_name) = split_path(path)?;
    let backup_name = format!("{file_name}.corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3f"));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| BookmarkError::Io {
        path: parent.to_path_buf(),
        message: err.to_string(),
    })?;
    dir.rename(file_name, &dir, &backup_name).map_err(|err| BookmarkError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(parent.join(backup_name))
}

fn write_file(path: &Utf8Path, contents: &str) -> Result<(), BookmarkError> {
    let (parent, file_name) = split_path(path)?;
    let io_error = |target: &Utf8Path, err: io::Error| BookmarkError::Io {
        path: target.to_path_buf(),
        message: err.to_string(),
    };

    Dir::create_ambient_dir_all(parent, ambient_authority())
        .map_err(|err| io_error(parent, err))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| io_error(parent, err))?;
    dir.write(file_name, contents)
        .map_err(|err| io_error(path, err))
}
