//! Error types for the Switchtower domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each collaborator has its own bounded-context error enum; the
//! top-level [`Error`] rolls them up with `#[from]` conversions.
//!
//! Routing failure ("no suitable agent") is deliberately *not* part of
//! this taxonomy — it is a normal outcome, modeled as a reply variant
//! by the orchestrator crate.

use thiserror::Error;

/// The top-level error type for all Switchtower operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Agent errors ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Classifier errors ---
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),

    // --- Ledger errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Orchestration errors ---
    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures raised by a worker agent backend.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Agent backend failed: {agent} — {reason}")]
    Backend { agent: String, reason: String },

    #[error("Agent call timed out: {agent} after {timeout_secs}s")]
    Timeout { agent: String, timeout_secs: u64 },

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),
}

/// Failures raised by the classifier collaborator.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    #[error("Classification failed: {0}")]
    Backend(String),

    #[error("Classifier timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

/// Failures raised by a conversation ledger backend.
///
/// Orchestrators always catch and log these; they never reach the
/// orchestration caller.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),
}

/// The only error an `orchestrate` call surfaces to its caller.
///
/// Raised when an agent backend fails outside the ReAct loop, where
/// swallowing the failure would hide a real outage. Inside the loop the
/// same failure is captured as a step observation instead.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("Agent execution failed: {0}")]
    AgentExecution(#[from] AgentError),
}
