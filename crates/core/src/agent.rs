//! Agent trait — the abstraction over worker agents.
//!
//! An agent takes a task description and produces text, either as a
//! complete response or as a lazy stream of chunks. The orchestrator
//! calls `handle` or `handle_stream` without knowing what sits behind
//! the trait — an LLM-backed specialist, a tool runner, or a test stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::message::ThreadId;

/// A finite, non-restartable sequence of response chunks.
pub type ChunkStream = mpsc::Receiver<std::result::Result<String, AgentError>>;

/// Name and description of a registered agent.
///
/// This is all the orchestration core knows about an agent's
/// capabilities: the descriptor feeds classification and task-generation
/// prompts, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// The agent's unique registered name.
    pub name: String,

    /// Human-readable description of what the agent specializes in.
    pub description: String,
}

impl AgentDescriptor {
    /// Build a descriptor from an agent handle.
    pub fn of(agent: &dyn Agent) -> Self {
        Self {
            name: agent.name().to_string(),
            description: agent.description().to_string(),
        }
    }
}

/// The core Agent trait.
///
/// Implementations are external collaborators; the orchestration core
/// only dispatches tasks and consumes responses.
#[async_trait]
pub trait Agent: Send + Sync {
    /// The unique name this agent registers under (e.g., "billing").
    fn name(&self) -> &str;

    /// What this agent specializes in, for classification input.
    fn description(&self) -> &str;

    /// Handle a task and return the complete response text.
    async fn handle(
        &self,
        task: &str,
        thread_id: &ThreadId,
    ) -> std::result::Result<String, AgentError>;

    /// Handle a task, yielding the response as a stream of chunks.
    ///
    /// The stream is finite and not restartable. The default
    /// implementation calls [`Agent::handle`] and yields the whole
    /// response as a single chunk.
    async fn handle_stream(
        &self,
        task: &str,
        thread_id: &ThreadId,
    ) -> std::result::Result<ChunkStream, AgentError> {
        let response = self.handle(task, thread_id).await?;
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.send(Ok(response)).await;
        Ok(rx)
    }
}
