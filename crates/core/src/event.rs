//! Structured step events — the orchestrator's observable trace.
//!
//! Every routing decision and every ReAct cycle publishes a typed event
//! instead of printing verbose text. Tests subscribe to the bus and
//! assert on step sequences; transports can forward events to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// All step events emitted during orchestration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepEvent {
    /// Routing resolved a target agent for the message.
    AgentResolved {
        thread_id: String,
        agent: String,
        /// How the agent was chosen: "override", "classifier",
        /// "default", or "first_registered".
        via: String,
        timestamp: DateTime<Utc>,
    },

    /// A reasoning step was generated.
    Thought {
        thread_id: String,
        step_index: usize,
        content: String,
        timestamp: DateTime<Utc>,
    },

    /// The loop chose an agent and a task for this step.
    ActionSelected {
        thread_id: String,
        step_index: usize,
        agent: String,
        task: String,
        timestamp: DateTime<Utc>,
    },

    /// An action produced a new observation.
    Observation {
        thread_id: String,
        step_index: usize,
        content: String,
        timestamp: DateTime<Utc>,
    },

    /// The termination check ran for this step.
    TerminationCheck {
        thread_id: String,
        step_index: usize,
        is_final: bool,
        timestamp: DateTime<Utc>,
    },

    /// A collaborator call failed; the step was consumed.
    StepFailed {
        thread_id: String,
        step_index: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },

    /// A ledger write failed and was swallowed.
    MemoryWriteFailed {
        thread_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl StepEvent {
    /// Short event name, for log lines and wire framing.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AgentResolved { .. } => "agent_resolved",
            Self::Thought { .. } => "thought",
            Self::ActionSelected { .. } => "action_selected",
            Self::Observation { .. } => "observation",
            Self::TerminationCheck { .. } => "termination_check",
            Self::StepFailed { .. } => "step_failed",
            Self::MemoryWriteFailed { .. } => "memory_write_failed",
        }
    }
}

/// A broadcast-based bus for step events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub. Publishing
/// with no subscribers is a no-op.
pub struct EventBus {
    sender: broadcast::Sender<Arc<StepEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: StepEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<StepEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
