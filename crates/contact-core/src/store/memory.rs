//! In-memory implementation of the `MessageStore` port.
//!
//! Used when no data directory is configured, and in tests. Contents are
//! lost when the process exits.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::MessageStore;
use crate::error::{StorageError, StoreResult};
use crate::model::{ContactMessage, MessageId, ValidatedSubmission};

#[derive(Debug, Default)]
struct Ledger {
    last_id: MessageId,
    messages: Vec<ContactMessage>,
}

/// In-memory [`MessageStore`]
///
/// Id assignment and append happen under a single write lock, so the
/// vector order is the id order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMessageStore {
    ledger: Arc<RwLock<Ledger>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages; `0` if the lock is poisoned
    pub fn len(&self) -> usize {
        self.ledger
            .read()
            .map(|guard| guard.messages.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, submission: ValidatedSubmission) -> StoreResult<ContactMessage> {
        let mut guard = self
            .ledger
            .write()
            .map_err(|e| StorageError::unavailable(format!("lock poisoned: {e}")))?;

        let id = guard
            .last_id
            .checked_add(1)
            .ok_or_else(|| StorageError::unavailable("message id space exhausted"))?;

        let message = submission.into_message(id, Utc::now());
        guard.last_id = id;
        guard.messages.push(message.clone());

        Ok(message)
    }

    async fn list(&self) -> StoreResult<Vec<ContactMessage>> {
        let guard = self
            .ledger
            .read()
            .map_err(|e| StorageError::unavailable(format!("lock poisoned: {e}")))?;

        Ok(guard.messages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_submission;
    use serde_json::json;
    use std::collections::HashSet;

    fn submission(name: &str) -> ValidatedSubmission {
        validate_submission(&json!({
            "name": name,
            "email": "visitor@example.com",
            "message": format!("Message from {}", name),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = InMemoryMessageStore::new();

        let first = store.create(submission("A")).await.unwrap();
        let second = store.create(submission("B")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = InMemoryMessageStore::new();
        for name in ["A", "B", "C"] {
            store.create(submission(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_list_is_repeatable() {
        let store = InMemoryMessageStore::new();
        store.create(submission("A")).await.unwrap();
        store.create(submission("B")).await.unwrap();

        let first = store.list().await.unwrap();
        let second = store.list().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemoryMessageStore::new();
        assert!(store.is_empty());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_unique_ids() {
        let store = InMemoryMessageStore::new();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(submission(&format!("v{i}"))).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            let message = handle.await.unwrap().unwrap();
            assert!(ids.insert(message.id), "duplicate id {}", message.id);
        }

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 64);
        assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
    }
}
