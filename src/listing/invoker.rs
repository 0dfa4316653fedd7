//! Traversal invoker - runs one path's store traversal as its own task
//!
//! The traversal task and the consumer run concurrently over a bounded
//! feed. The consumer must drain the feed before it trusts the terminal
//! result: [`Traversal::finish`] enforces that order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cancel::CancelToken;
use crate::error::ListError;
use crate::store::{LsOptions, Store, StoreEntry};

use super::types::EntryRecord;

/// Entries buffered between the traversal task and its consumer.
const FEED_CAPACITY: usize = 32;

/// A running traversal of one path.
pub struct Traversal {
    path: String,
    feed: mpsc::Receiver<StoreEntry>,
    task: JoinHandle<Result<(), ListError>>,
}

impl Traversal {
    /// Start traversing `path` on a new task.
    ///
    /// Cancelling `cancel` drops the in-flight store call, which closes the
    /// feed, and makes the terminal result [`ListError::Cancelled`].
    pub fn spawn(
        store: Arc<dyn Store>,
        path: &str,
        options: LsOptions,
        cancel: CancelToken,
    ) -> Self {
        let (tx, feed) = mpsc::channel(FEED_CAPACITY);
        let task_path = path.to_string();
        let task = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(ListError::Cancelled),
                result = store.ls(&task_path, options, tx) => {
                    result.map_err(|source| ListError::Resolve { path: task_path.clone(), source })
                }
            }
        });

        Self {
            path: path.to_string(),
            feed,
            task,
        }
    }

    /// Next entry in traversal order, or `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<EntryRecord> {
        let entry = EntryRecord::from(self.feed.recv().await?);
        if entry.name.is_empty() {
            tracing::warn!(path = %self.path, cid = %entry.cid, "entry with empty name");
        }
        Some(entry)
    }

    /// Drain whatever is left in the feed, then wait for the terminal result.
    ///
    /// Must be called even when the feed produced nothing: an empty feed is
    /// not proof of success.
    pub async fn finish(mut self) -> Result<(), ListError> {
        while self.feed.recv().await.is_some() {}
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(ListError::Task(e.to_string())),
        }
    }
}

impl Drop for Traversal {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cancel::CancelScope;
    use crate::error::StoreError;
    use crate::store::{Link, MemoryStore};

    fn store_with(names: &[&str]) -> MemoryStore {
        let mut store = MemoryStore::new();
        let links = names
            .iter()
            .map(|n| Link::new(*n, store.put_file(n.as_bytes())))
            .collect();
        let root = store.put_directory(links);
        store.set_root(root);
        store
    }

    fn resolving() -> LsOptions {
        LsOptions {
            resolve_children: true,
        }
    }

    #[tokio::test]
    async fn test_feed_then_success() {
        let scope = CancelScope::new();
        let store: Arc<dyn Store> = Arc::new(store_with(&["b", "a", "c"]));
        let mut traversal = Traversal::spawn(store, ".", resolving(), scope.token());

        let mut names = Vec::new();
        while let Some(entry) = traversal.next().await {
            names.push(entry.name);
        }
        assert_eq!(names, vec!["b", "a", "c"]);
        traversal.finish().await.unwrap();
    }

    #[tokio::test]
    async fn test_error_surfaces_after_empty_feed() {
        let scope = CancelScope::new();
        let store: Arc<dyn Store> = Arc::new(store_with(&["a"]));
        let mut traversal = Traversal::spawn(store, "missing", resolving(), scope.token());

        assert!(traversal.next().await.is_none());
        match traversal.finish().await {
            Err(ListError::Resolve { path, source }) => {
                assert_eq!(path, "missing");
                assert!(matches!(source, StoreError::NotFound(_)));
            }
            other => panic!("expected resolve error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_finish_drains_unread_entries() {
        let scope = CancelScope::new();
        let names: Vec<String> = (0..200).map(|i| format!("f{:03}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let store: Arc<dyn Store> = Arc::new(store_with(&refs));
        let traversal = Traversal::spawn(store, ".", resolving(), scope.token());

        // More entries than the feed holds; finish must not deadlock.
        tokio::time::timeout(Duration::from_secs(5), traversal.finish())
            .await
            .expect("finish should drain the feed")
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancel_closes_feed_and_reports_cancellation() {
        let scope = CancelScope::new();
        let store: Arc<dyn Store> = Arc::new(
            store_with(&["a", "b", "c", "d"]).with_latency(Duration::from_secs(60)),
        );
        let mut traversal = Traversal::spawn(store, ".", resolving(), scope.token());

        scope.cancel();
        let next = tokio::time::timeout(Duration::from_secs(1), traversal.next())
            .await
            .expect("feed should close promptly");
        assert!(next.is_none());
        let result = traversal.finish().await;
        assert!(matches!(result, Err(ListError::Cancelled)));
    }

    #[tokio::test]
    async fn test_empty_name_is_passed_through() {
        let scope = CancelScope::new();
        let mut store = MemoryStore::new();
        let file = store.put_file(b"anon");
        let root = store.put_directory(vec![Link::new("", file)]);
        store.set_root(root);
        let mut traversal = Traversal::spawn(Arc::new(store), ".", resolving(), scope.token());

        let entry = traversal.next().await.unwrap();
        assert_eq!(entry.name, "");
        assert!(traversal.next().await.is_none());
        traversal.finish().await.unwrap();
    }
}
