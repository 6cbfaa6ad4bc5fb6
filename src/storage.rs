//! Artifact storage abstraction.
//!
//! The pipelines read and write named text artifacts (timed sources, prompt
//! templates, corrected text, subtitles, analysis records) through the
//! [`Storage`] trait so the same code runs against an object store in
//! production and [`MemoryStore`] in tests and single-process tools.
//!
//! Keys are flat strings; "directories" exist only as key prefixes.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors raised by storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The backend could not be reached or refused the request.
    #[error("storage request failed: {0}")]
    Request(String),
    /// The object exists but its content could not be decoded as text.
    #[error("object {key} could not be decoded: {reason}")]
    Decode { key: String, reason: String },
}

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// Text-artifact store used by the pipelines.
///
/// Implementations must be safe to share across tasks behind an `Arc`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch an object; `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store an object, replacing any previous content under `key`.
    async fn put(&self, key: &str, content: &str) -> Result<(), StorageError>;

    /// List keys that start with `prefix` and end with `suffix`, in
    /// lexicographic order.  Either filter may be empty.
    async fn list(&self, prefix: &str, suffix: &str) -> Result<Vec<String>, StorageError>;

    /// Delete every object whose key starts with `prefix`; returns the
    /// number of keys removed.
    async fn delete_prefix(&self, prefix: &str) -> Result<usize, StorageError>;
}

// Compile-time proof that the trait stays object-safe (we hand out
// `Arc<dyn Storage>`).
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Storage>) {}
};

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory [`Storage`] backend.
///
/// Keys iterate in lexicographic order, matching the listing contract of the
/// object stores this stands in for.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, StorageError> {
        self.objects
            .lock()
            .map_err(|_| StorageError::Request("memory store mutex poisoned".into()))
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn put(&self, key: &str, content: &str) -> Result<(), StorageError> {
        self.lock()?.insert(key.to_string(), content.to_string());
        Ok(())
    }

    async fn list(&self, prefix: &str, suffix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .lock()?
            .keys()
            .filter(|k| k.starts_with(prefix) && k.ends_with(suffix))
            .cloned()
            .collect())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let mut objects = self.lock()?;
        let doomed: Vec<String> = objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        for key in &doomed {
            objects.remove(key);
        }
        Ok(doomed.len())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        store.put("a/clip.txt", "hello").await.unwrap();

        assert_eq!(store.get("a/clip.txt").await.unwrap(), Some("hello".into()));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites_existing_content() {
        let store = MemoryStore::new();
        store.put("k", "old").await.unwrap();
        store.put("k", "new").await.unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some("new".into()));
    }

    #[tokio::test]
    async fn list_filters_by_prefix_and_suffix() {
        let store = MemoryStore::new();
        store.put("job/a.timed.txt", "x").await.unwrap();
        store.put("job/a.time", "x").await.unwrap();
        store.put("job/b.timed.txt", "x").await.unwrap();
        store.put("other/c.timed.txt", "x").await.unwrap();

        let keys = store.list("job/", ".timed.txt").await.unwrap();
        assert_eq!(keys, vec!["job/a.timed.txt", "job/b.timed.txt"]);
    }

    #[tokio::test]
    async fn list_with_empty_filters_returns_all_sorted() {
        let store = MemoryStore::new();
        store.put("b", "2").await.unwrap();
        store.put("a", "1").await.unwrap();

        assert_eq!(store.list("", "").await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn delete_prefix_removes_and_counts() {
        let store = MemoryStore::new();
        store.put("clip.time", "x").await.unwrap();
        store.put("clip.txt", "x").await.unwrap();
        store.put("clip.vtt", "x").await.unwrap();
        store.put("clip2.txt", "x").await.unwrap();

        let removed = store.delete_prefix("clip.").await.unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.get("clip.txt").await.unwrap(), None);
        // The longer stem survives a shorter stem's cleanup.
        assert_eq!(store.get("clip2.txt").await.unwrap(), Some("x".into()));
    }

    #[tokio::test]
    async fn delete_prefix_without_matches_returns_zero() {
        let store = MemoryStore::new();
        store.put("keep", "x").await.unwrap();

        assert_eq!(store.delete_prefix("gone.").await.unwrap(), 0);
        assert_eq!(store.get("keep").await.unwrap(), Some("x".into()));
    }
}
