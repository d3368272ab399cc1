//! Durable queue of scorecard payloads that have not been confirmed uploaded.
//!
//! Entries live as one JSON file per key in a directory that any number of processes may
//! share. Reads and writes are not isolated from each other: a reader must treat a missing
//! entry as "already handled elsewhere".

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicU64, Ordering},
};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

const ENTRY_EXTENSION: &str = "json";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Result alias for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Failures raised by the fallback queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Filesystem operation failed.
    #[error("fallback queue I/O failed for `{path}`")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Key would escape the queue directory.
    #[error("invalid fallback queue key `{0}`")]
    InvalidKey(String),
}

/// Directory-backed store of pending payloads keyed by `{base_key}.{suffix}`.
#[derive(Debug, Clone)]
pub struct FallbackQueue {
    dir: PathBuf,
    base_key: String,
}

impl FallbackQueue {
    /// Queue rooted at `dir`; the directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>, base_key: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_key: base_key.into(),
        }
    }

    /// Directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full key for `suffix`.
    pub fn key_for(&self, suffix: &str) -> String {
        format!("{}.{}", self.base_key, suffix)
    }

    /// Suffix of a key produced by [`FallbackQueue::key_for`].
    pub fn suffix_of<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(&self.base_key)?
            .strip_prefix('.')
            .filter(|suffix| !suffix.is_empty())
    }

    /// Store `payload` under `suffix`, replacing any previous entry. Returns the key.
    pub async fn put(&self, suffix: &str, payload: &str) -> QueueResult<String> {
        let key = self.key_for(suffix);
        let path = self.entry_path(&key)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| io_error(&self.dir, source))?;

        let tmp = self.dir.join(format!(
            ".{key}.tmp.{}.{}",
            process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::write(&tmp, payload.as_bytes())
            .await
            .map_err(|source| io_error(&tmp, source))?;
        if let Err(source) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(io_error(&path, source));
        }

        debug!(key = %key, "stored payload in fallback queue");
        Ok(key)
    }

    /// Read the entry for `key`, `None` when it does not exist.
    pub async fn get(&self, key: &str) -> QueueResult<Option<String>> {
        let path = self.entry_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(io_error(&path, source)),
        }
    }

    /// Delete the entry for `key`. Returns whether an entry was removed.
    pub async fn remove(&self, key: &str) -> QueueResult<bool> {
        let path = self.entry_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(io_error(&path, source)),
        }
    }

    /// Delete the entry for `key` only if it still holds `payload`.
    ///
    /// Keeps a newer payload written by another save between read and delete.
    pub async fn remove_if_unchanged(&self, key: &str, payload: &str) -> QueueResult<bool> {
        match self.get(key).await? {
            Some(current) if current == payload => self.remove(key).await,
            _ => Ok(false),
        }
    }

    /// Every key currently present, sorted.
    pub async fn keys(&self) -> QueueResult<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(&self.dir, source)),
        };

        let prefix = format!("{}.", self.base_key);
        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|source| io_error(&self.dir, source))?
        {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(key) = name.strip_suffix(&format!(".{ENTRY_EXTENSION}")) else {
                continue;
            };
            if key.starts_with(&prefix) && key.len() > prefix.len() {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Number of pending entries.
    pub async fn len(&self) -> QueueResult<usize> {
        Ok(self.keys().await?.len())
    }

    /// Whether nothing is pending.
    pub async fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len().await? == 0)
    }

    fn entry_path(&self, key: &str) -> QueueResult<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
        {
            return Err(QueueError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{ENTRY_EXTENSION}")))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> QueueError {
    QueueError::Io {
        path: path.to_path_buf(),
        source,
    }
}
