//! Durable `MessageStore` backed by sled
//!
//! Records live in the `contact_messages` tree as JSON, keyed by the
//! big-endian message id so that tree iteration yields insertion order.

use std::future::Future;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::MessageStore;
use crate::error::{StorageError, StoreResult};
use crate::model::{ContactMessage, ValidatedSubmission};

const TREE_NAME: &str = "contact_messages";

/// sled-backed [`MessageStore`]
pub struct SledMessageStore {
    db: sled::Db,
    messages: sled::Tree,
    /// Serializes id generation and insert so id order equals insertion order
    append_lock: Mutex<()>,
}

impl SledMessageStore {
    /// Open (or create) a store in the given directory
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Open a store that is deleted when dropped
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> StoreResult<Self> {
        let messages = db.open_tree(TREE_NAME)?;
        Ok(Self {
            db,
            messages,
            append_lock: Mutex::new(()),
        })
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn append(&self, submission: ValidatedSubmission) -> StoreResult<ContactMessage> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|e| StorageError::unavailable(format!("append lock poisoned: {e}")))?;

        // sled ids start at 0; stored ids start at 1
        let id = self.db.generate_id()? + 1;
        let message = submission.into_message(id, Utc::now());
        let record = serde_json::to_vec(&message)?;
        self.messages.insert(id.to_be_bytes(), record)?;

        Ok(message)
    }

    /// Wait for `flush`; if it fails the appended record is removed again so
    /// a failed `create` leaves nothing behind.
    async fn commit<F>(&self, message: ContactMessage, flush: F) -> StoreResult<ContactMessage>
    where
        F: Future<Output = sled::Result<usize>>,
    {
        if let Err(e) = flush.await {
            self.messages.remove(message.id.to_be_bytes())?;
            tracing::warn!(
                message_id = message.id,
                error = %e,
                "Rolled back unflushed contact message"
            );
            return Err(e.into());
        }
        Ok(message)
    }
}

impl std::fmt::Debug for SledMessageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledMessageStore")
            .field("tree", &TREE_NAME)
            .field("len", &self.messages.len())
            .finish()
    }
}

#[async_trait]
impl MessageStore for SledMessageStore {
    fn backend(&self) -> &'static str {
        "sled"
    }

    async fn create(&self, submission: ValidatedSubmission) -> StoreResult<ContactMessage> {
        let message = self.append(submission)?;
        let message = self.commit(message, self.messages.flush_async()).await?;

        tracing::debug!(message_id = message.id, "Contact message persisted");
        Ok(message)
    }

    async fn list(&self) -> StoreResult<Vec<ContactMessage>> {
        self.messages
            .iter()
            .values()
            .map(|record| -> StoreResult<ContactMessage> {
                let bytes = record?;
                Ok(serde_json::from_slice(&bytes)?)
            })
            .collect()
    }
}
