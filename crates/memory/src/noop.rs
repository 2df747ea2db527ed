//! No-op ledger — disables conversation history entirely.

use async_trait::async_trait;
use switchtower_core::error::StorageError;
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{Message, ThreadId};

/// A no-op ledger that records nothing.
pub struct NoopLedger;

#[async_trait]
impl MemoryLedger for NoopLedger {
    fn name(&self) -> &str {
        "none"
    }

    async fn store(
        &self,
        _thread_id: &ThreadId,
        _sender: &str,
        _content: &str,
    ) -> Result<(), StorageError> {
        Ok(())
    }

    async fn history(&self, _thread_id: &ThreadId) -> Result<Vec<Message>, StorageError> {
        Ok(Vec::new())
    }

    async fn thread_ids(&self) -> Result<Vec<ThreadId>, StorageError> {
        Ok(Vec::new())
    }
}
