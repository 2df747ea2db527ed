//! The strategy contract and shared orchestration plumbing.
//!
//! All three strategies expose one operation:
//! `orchestrate(thread_id, message, options, sink) -> Reply`.
//!
//! Routing failure is a normal, recoverable outcome modeled as
//! [`Reply::NoSuitableAgent`] — never an error. The only error that
//! crosses this boundary is [`OrchestrationError`], raised when an
//! agent backend fails outside the ReAct loop.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use switchtower_core::agent::Agent;
use switchtower_core::error::{AgentError, OrchestrationError};
use switchtower_core::event::{EventBus, StepEvent};
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::ThreadId;
use tracing::{debug, warn};

use crate::sink::StreamSink;

/// Fixed sentinel text rendered when no agent can be resolved.
pub const NO_SUITABLE_AGENT: &str = "no suitable agent";

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct OrchestrateOptions {
    /// Explicit agent override. Always wins over any classifier
    /// decision; an unregistered name resolves to
    /// [`Reply::NoSuitableAgent`].
    pub agent_name: Option<String>,
}

impl OrchestrateOptions {
    /// Options with an explicit agent override.
    pub fn with_agent(name: impl Into<String>) -> Self {
        Self {
            agent_name: Some(name.into()),
        }
    }
}

/// The normalized outcome of an orchestration call.
///
/// Callers branch on the variant; transports that only want text call
/// [`Reply::text`], which renders the no-agent case as the
/// [`NO_SUITABLE_AGENT`] sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// An agent (or the reasoning loop) produced an answer.
    Answer {
        /// The resolved agent, when a single agent handled the call.
        agent: Option<String>,
        /// The full response text. When the call was streamed, this is
        /// exactly the concatenation of the delivered chunks.
        text: String,
    },

    /// No agent could be resolved for the message.
    NoSuitableAgent,
}

impl Reply {
    /// The response text, rendering routing failure as the sentinel.
    pub fn text(&self) -> &str {
        match self {
            Self::Answer { text, .. } => text,
            Self::NoSuitableAgent => NO_SUITABLE_AGENT,
        }
    }

    /// Consume into the response text.
    pub fn into_text(self) -> String {
        match self {
            Self::Answer { text, .. } => text,
            Self::NoSuitableAgent => NO_SUITABLE_AGENT.to_string(),
        }
    }

    /// The agent that handled the call, if a single one did.
    pub fn agent(&self) -> Option<&str> {
        match self {
            Self::Answer { agent, .. } => agent.as_deref(),
            Self::NoSuitableAgent => None,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer { .. })
    }
}

/// An orchestration strategy.
///
/// One call is one logical sequential flow: no internal fan-out across
/// agents, and every collaborator call is a suspension point that holds
/// no lock.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Route `message` on `thread_id` and return the reply.
    ///
    /// When `sink` is supplied the agent is invoked in streaming mode
    /// and each chunk is forwarded as it is produced; the returned text
    /// equals the concatenation of the forwarded chunks.
    async fn orchestrate(
        &self,
        thread_id: &ThreadId,
        message: &str,
        options: OrchestrateOptions,
        sink: Option<&dyn StreamSink>,
    ) -> Result<Reply, OrchestrationError>;
}

// ── Shared plumbing ───────────────────────────────────────────────────────

/// The outcome of one agent invocation.
pub(crate) struct AgentReply {
    /// Accumulated response text (prefix included).
    pub text: String,
    /// The sink consumer went away mid-stream; the response must not
    /// be written to the ledger.
    pub cancelled: bool,
}

/// Await a collaborator future with the per-call timeout applied.
pub(crate) async fn bounded<T>(
    who: &str,
    timeout_secs: u64,
    fut: impl Future<Output = Result<T, AgentError>> + Send,
) -> Result<T, AgentError> {
    match tokio::time::timeout(Duration::from_secs(timeout_secs), fut).await {
        Ok(result) => result,
        Err(_) => Err(AgentError::Timeout {
            agent: who.to_string(),
            timeout_secs,
        }),
    }
}

/// Invoke an agent, blocking or streaming, with an attribution prefix.
///
/// The prefix is emitted (and accumulated) identically on both paths,
/// so streamed chunk concatenation always equals the blocking return
/// value.
pub(crate) async fn invoke_agent(
    agent: &Arc<dyn Agent>,
    task: &str,
    thread_id: &ThreadId,
    prefix: &str,
    sink: Option<&dyn StreamSink>,
    timeout_secs: u64,
) -> Result<AgentReply, AgentError> {
    let Some(sink) = sink else {
        let response = bounded(agent.name(), timeout_secs, agent.handle(task, thread_id)).await?;
        return Ok(AgentReply {
            text: format!("{prefix}{response}"),
            cancelled: false,
        });
    };

    let mut rx = bounded(
        agent.name(),
        timeout_secs,
        agent.handle_stream(task, thread_id),
    )
    .await?;

    let mut text = String::from(prefix);
    if !prefix.is_empty() && !sink.emit(prefix) {
        debug!(agent = %agent.name(), "Stream consumer gone before first chunk");
        return Ok(AgentReply {
            text,
            cancelled: true,
        });
    }

    loop {
        let chunk = match tokio::time::timeout(Duration::from_secs(timeout_secs), rx.recv()).await {
            Err(_) => {
                return Err(AgentError::Timeout {
                    agent: agent.name().to_string(),
                    timeout_secs,
                });
            }
            Ok(None) => break,
            Ok(Some(Err(e))) => return Err(e),
            Ok(Some(Ok(chunk))) => chunk,
        };

        text.push_str(&chunk);
        if !sink.emit(&chunk) {
            debug!(agent = %agent.name(), "Stream consumer gone; dropping remainder");
            return Ok(AgentReply {
                text,
                cancelled: true,
            });
        }
    }

    Ok(AgentReply {
        text,
        cancelled: false,
    })
}

/// Write to the ledger, swallowing and reporting any failure.
///
/// History is an observability aid, not a correctness dependency of
/// routing; a failed write must never surface to the caller.
pub(crate) async fn store_best_effort(
    memory: &Arc<dyn MemoryLedger>,
    events: &Arc<EventBus>,
    thread_id: &ThreadId,
    sender: &str,
    content: &str,
) {
    if let Err(e) = memory.store(thread_id, sender, content).await {
        warn!(thread = %thread_id, sender, error = %e, "Ledger write failed; continuing");
        events.publish(StepEvent::MemoryWriteFailed {
            thread_id: thread_id.to_string(),
            error: e.to_string(),
            timestamp: Utc::now(),
        });
    }
}
