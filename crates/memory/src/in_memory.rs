//! In-memory ledger — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use switchtower_core::error::StorageError;
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{Message, Thread, ThreadId};
use tokio::sync::{Mutex, RwLock};

/// An in-memory ledger that keeps each thread behind its own lock.
///
/// The outer map lock is held only long enough to find or create the
/// thread entry; appends then serialize on the per-thread mutex, so
/// writes to the same thread keep their order while distinct threads
/// never contend.
pub struct InMemoryLedger {
    threads: RwLock<HashMap<ThreadId, Arc<Mutex<Thread>>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            threads: RwLock::new(HashMap::new()),
        }
    }

    /// Find the thread entry, creating it on first use.
    async fn entry(&self, thread_id: &ThreadId) -> Arc<Mutex<Thread>> {
        if let Some(existing) = self.threads.read().await.get(thread_id) {
            return existing.clone();
        }
        let mut threads = self.threads.write().await;
        threads
            .entry(thread_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Thread::new(thread_id.clone()))))
            .clone()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryLedger for InMemoryLedger {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn store(
        &self,
        thread_id: &ThreadId,
        sender: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let entry = self.entry(thread_id).await;
        let mut thread = entry.lock().await;
        thread.push(Message::new(sender, content));
        Ok(())
    }

    async fn history(&self, thread_id: &ThreadId) -> Result<Vec<Message>, StorageError> {
        let Some(entry) = self.threads.read().await.get(thread_id).cloned() else {
            return Ok(Vec::new());
        };
        let thread = entry.lock().await;
        Ok(thread.messages.clone())
    }

    async fn thread_ids(&self) -> Result<Vec<ThreadId>, StorageError> {
        Ok(self.threads.read().await.keys().cloned().collect())
    }
}
