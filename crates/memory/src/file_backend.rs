//! File-based ledger — persistent JSON-lines storage.
//!
//! Each thread gets its own JSONL file under the root directory, one
//! JSON-encoded [`Message`] per line, appended on every write. Simple,
//! portable, human-inspectable, and requires zero external services.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use switchtower_core::error::StorageError;
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{Message, ThreadId};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// A file-backed ledger using one JSONL file per thread.
///
/// Writes to the same thread serialize on a per-thread lock; distinct
/// threads write to distinct files and never contend.
pub struct FileLedger {
    root: PathBuf,
    locks: RwLock<HashMap<ThreadId, Arc<Mutex<()>>>>,
}

impl FileLedger {
    /// Create a ledger rooted at the given directory.
    ///
    /// The directory is created on the first write if it is missing.
    pub fn new(root: PathBuf) -> Self {
        debug!(root = %root.display(), "File ledger opened");
        Self {
            root,
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// File name for a thread, with unsafe characters replaced.
    fn path_for(&self, thread_id: &ThreadId) -> PathBuf {
        let safe: String = thread_id
            .as_str()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.jsonl"))
    }

    async fn write_lock(&self, thread_id: &ThreadId) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.read().await.get(thread_id) {
            return existing.clone();
        }
        let mut locks = self.locks.write().await;
        locks
            .entry(thread_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl MemoryLedger for FileLedger {
    fn name(&self) -> &str {
        "file"
    }

    async fn store(
        &self,
        thread_id: &ThreadId,
        sender: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let lock = self.write_lock(thread_id).await;
        let _guard = lock.lock().await;

        std::fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::Storage(format!("Failed to create ledger directory: {e}")))?;

        let line = serde_json::to_string(&Message::new(sender, content))
            .map_err(|e| StorageError::Storage(format!("Failed to serialize message: {e}")))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path_for(thread_id))
            .map_err(|e| StorageError::Storage(format!("Failed to open ledger file: {e}")))?;

        writeln!(file, "{line}")
            .map_err(|e| StorageError::Storage(format!("Failed to append message: {e}")))?;

        Ok(())
    }

    async fn history(&self, thread_id: &ThreadId) -> Result<Vec<Message>, StorageError> {
        let content = match std::fs::read_to_string(self.path_for(thread_id)) {
            Ok(c) => c,
            // No file yet means no writes yet
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::ReadFailed(format!("{e}"))),
        };

        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<Message>(line) {
                Ok(msg) => Some(msg),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted ledger line");
                    None
                }
            })
            .collect())
    }

    async fn thread_ids(&self) -> Result<Vec<ThreadId>, StorageError> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::ReadFailed(format!("{e}"))),
        };

        Ok(entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let path = e.path();
                if path.extension().and_then(|x| x.to_str()) == Some("jsonl") {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .map(ThreadId::from)
                } else {
                    None
                }
            })
            .collect())
    }
}
