//! Message and Thread domain types.
//!
//! These are the value objects that flow through the system: a caller
//! sends a message on a thread, the orchestrator routes it to an agent,
//! and both sides of the exchange are appended to the thread's ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The sender name used for end-user messages in the ledger.
pub const USER_SENDER: &str = "user";

/// Unique identifier for a conversation thread.
///
/// Stable for the lifetime of the conversation; never reissued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message in a thread. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message — [`USER_SENDER`] or an agent's identity.
    pub sender: String,

    /// The text content.
    pub content: String,

    /// When the message was written.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a message with an arbitrary sender.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an end-user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(USER_SENDER, content)
    }

    /// Create a message attributed to a named agent.
    pub fn from_agent(agent: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(agent, content)
    }

    /// Whether this message came from the end user.
    pub fn is_user(&self) -> bool {
        self.sender == USER_SENDER
    }
}

/// A thread is an ordered, append-only sequence of messages.
///
/// Threads are created implicitly on first use and never deleted by
/// this core. Message order is the order of ledger writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Unique thread ID.
    pub id: ThreadId,

    /// Ordered messages.
    pub messages: Vec<Message>,

    /// When this thread was created.
    pub created_at: DateTime<Utc>,

    /// When the last message was appended.
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Create a new empty thread with the given id.
    pub fn new(id: ThreadId) -> Self {
        let now = Utc::now();
        Self {
            id,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message to the thread.
    pub fn push(&mut self, message: Message) {
        self.updated_at = Utc::now();
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
