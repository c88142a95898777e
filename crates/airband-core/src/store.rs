//! Shared in-memory store of directory entries.
//!
//! Loader tasks append batches from background tasks while the app core
//! reads snapshots; the write lock guarantees a snapshot never observes a
//! partially-appended batch. `rev` increments on every mutation so readers
//! can tell whether their projection is stale.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::entry::DirectoryEntry;

#[derive(Debug, Default)]
struct StoreInner {
    entries: Vec<DirectoryEntry>,
    rev: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DirectoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one source's entries as a single atomic batch.
    /// Returns the new revision.
    pub async fn append_batch(&self, batch: Vec<DirectoryEntry>) -> u64 {
        let mut inner = self.inner.write().await;
        inner.entries.extend(batch);
        inner.rev += 1;
        inner.rev
    }

    /// Snapshot of all entries plus the revision they correspond to.
    pub async fn snapshot(&self) -> (Vec<DirectoryEntry>, u64) {
        let inner = self.inner.read().await;
        (inner.entries.clone(), inner.rev)
    }

    pub async fn rev(&self) -> u64 {
        self.inner.read().await.rev
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(name: &str) -> DirectoryEntry {
        DirectoryEntry::new("test", name, "http://example.com", "MP3", "Rock")
    }

    #[tokio::test]
    async fn append_bumps_rev_and_keeps_order() {
        let store = DirectoryStore::new();
        assert_eq!(store.rev().await, 0);

        let rev = store.append_batch(vec![e("A"), e("B")]).await;
        assert_eq!(rev, 1);
        let rev = store.append_batch(vec![e("C")]).await;
        assert_eq!(rev, 2);

        let (entries, rev) = store.snapshot().await;
        assert_eq!(rev, 2);
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn snapshot_of_empty_store() {
        let store = DirectoryStore::new();
        let (entries, rev) = store.snapshot().await;
        assert!(entries.is_empty());
        assert_eq!(rev, 0);
        assert!(store.is_empty().await);
    }
}
