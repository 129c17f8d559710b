//! Message store port and adapters
//!
//! The store is the single source of truth for submissions. It is
//! append-only: messages are created and listed, never updated or deleted.
//!
//! Implementations must ensure:
//! - ids are unique and strictly increasing in insertion order
//! - concurrent `create` calls never share an id or lose a write
//! - `list` returns messages oldest first

pub mod memory;
pub mod sled_store;

pub use memory::InMemoryMessageStore;
pub use sled_store::SledMessageStore;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{ContactMessage, ValidatedSubmission};

/// Port for contact message persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Append a submission, assigning its id and creation timestamp
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot record the message.
    async fn create(&self, submission: ValidatedSubmission) -> StoreResult<ContactMessage>;

    /// All stored messages in insertion order
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn list(&self) -> StoreResult<Vec<ContactMessage>>;
}
