#[cfg(feature = "remote-store")]
pub mod remote;

use std::fmt;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::dao::storage::StorageResult;

/// Kind of document addressed on the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// A single scorecard, keyed by scorecard id.
    Scorecard,
    /// A userspace course catalog, keyed by userspace id.
    Courses,
}

impl DocumentKind {
    /// Path segment used by the remote store.
    pub fn segment(self) -> &'static str {
        match self {
            DocumentKind::Scorecard => "scorecard",
            DocumentKind::Courses => "courses",
        }
    }
}

/// Address of one document: `{kind}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    /// Document type.
    pub kind: DocumentKind,
    /// Identifier within that type.
    pub id: String,
}

impl DocumentKey {
    /// Key of a scorecard document.
    pub fn scorecard(id: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::Scorecard,
            id: id.into(),
        }
    }

    /// Key of a userspace course catalog.
    pub fn courses(userspace: impl Into<String>) -> Self {
        Self {
            kind: DocumentKind::Courses,
            id: userspace.into(),
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.segment(), self.id)
    }
}

/// Abstraction over the remote document store.
///
/// Uploads are full-document overwrites, so replaying one is always safe.
pub trait PersistenceGateway: Send + Sync {
    /// Overwrite the document at `key` with the serialized JSON `payload`.
    fn upload(&self, key: DocumentKey, payload: String) -> BoxFuture<'static, StorageResult<()>>;
    /// Read the document at `key`, `None` when it does not exist.
    fn download(&self, key: DocumentKey) -> BoxFuture<'static, StorageResult<Option<Value>>>;
    /// Probe the store.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_render_as_paths() {
        assert_eq!(
            DocumentKey::scorecard("1700000000000-abcdef").to_string(),
            "scorecard/1700000000000-abcdef"
        );
        assert_eq!(DocumentKey::courses("0a1b").to_string(), "courses/0a1b");
    }
}
