//! Conversation ledger trait — append-only per-thread message history.
//!
//! The ledger is an observability/history aid, not a correctness
//! dependency of routing: orchestrators wrap every write so that a
//! [`StorageError`] is logged and swallowed, never surfaced to the
//! orchestration caller.
//!
//! Implementations must serialize writes per thread (single-writer
//! discipline per `thread_id`) so concurrent orchestrations on the same
//! thread never interleave message order, while distinct threads
//! proceed independently.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::message::{Message, ThreadId};

/// The core conversation-ledger trait.
///
/// Implementations: in-memory, file/JSONL, no-op.
#[async_trait]
pub trait MemoryLedger: Send + Sync {
    /// The backend name (e.g., "in_memory", "file", "none").
    fn name(&self) -> &str;

    /// Append one message to the thread's ledger.
    ///
    /// The thread is created implicitly if this is its first write.
    async fn store(
        &self,
        thread_id: &ThreadId,
        sender: &str,
        content: &str,
    ) -> std::result::Result<(), StorageError>;

    /// The full ordered history of a thread. Unknown threads are empty.
    async fn history(
        &self,
        thread_id: &ThreadId,
    ) -> std::result::Result<Vec<Message>, StorageError>;

    /// All thread ids this ledger has seen.
    async fn thread_ids(&self) -> std::result::Result<Vec<ThreadId>, StorageError>;
}
