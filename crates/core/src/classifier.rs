//! Classifier trait — selects the best-fit agent for a message.
//!
//! The classifier is given the message, the thread it belongs to, and
//! the descriptors of every candidate agent. It answers with a chosen
//! agent name or none; none means "I can't route this" and triggers the
//! orchestrator's fallback chain. The classifier's internal decision
//! model (an LLM, a keyword table, anything) is out of scope here.

use async_trait::async_trait;

use crate::agent::AgentDescriptor;
use crate::error::ClassifierError;
use crate::message::ThreadId;

/// A chosen agent name, or none to trigger fallback.
///
/// Orchestrators demote names that are not currently registered to none
/// before acting on them.
pub type ClassificationResult = Option<String>;

/// The core Classifier trait.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Select the best-fit candidate for the message, or none.
    async fn classify(
        &self,
        message: &str,
        thread_id: &ThreadId,
        candidates: &[AgentDescriptor],
    ) -> std::result::Result<ClassificationResult, ClassifierError>;
}
