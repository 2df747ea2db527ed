//! Classifier-routed strategy — single-shot agent selection.
//!
//! The classifier picks the best-fit agent from the full candidate set;
//! the resolved agent's bracketed name prefixes the response so callers
//! can attribute it. Resolution order: explicit override > classifier
//! result > configured default > no suitable agent.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use switchtower_core::agent::Agent;
use switchtower_core::classifier::Classifier;
use switchtower_core::error::OrchestrationError;
use switchtower_core::event::{EventBus, StepEvent};
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{ThreadId, USER_SENDER};
use switchtower_core::registry::AgentRegistry;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::sink::StreamSink;
use crate::strategy::{OrchestrateOptions, Orchestrator, Reply, invoke_agent, store_best_effort};

/// Routes each message to the agent the classifier selects.
pub struct RoutedOrchestrator {
    registry: Arc<AgentRegistry>,
    classifier: Arc<dyn Classifier>,
    memory: Arc<dyn MemoryLedger>,
    events: Arc<EventBus>,
    config: OrchestratorConfig,
}

impl RoutedOrchestrator {
    pub fn new(
        registry: Arc<AgentRegistry>,
        classifier: Arc<dyn Classifier>,
        memory: Arc<dyn MemoryLedger>,
        events: Arc<EventBus>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            classifier,
            memory,
            events,
            config,
        }
    }

    /// Resolve the target agent and how it was chosen.
    async fn resolve(
        &self,
        thread_id: &ThreadId,
        message: &str,
        options: &OrchestrateOptions,
    ) -> Option<(Arc<dyn Agent>, &'static str)> {
        // The override always wins, even over a disagreeing classifier;
        // an unregistered override does not fall through.
        if let Some(name) = &options.agent_name {
            return self.registry.get(name).map(|a| (a, "override"));
        }

        let candidates = self.registry.descriptors();
        if !candidates.is_empty() {
            let timeout = Duration::from_secs(self.config.call_timeout_secs);
            let decision = tokio::time::timeout(
                timeout,
                self.classifier.classify(message, thread_id, &candidates),
            )
            .await;

            match decision {
                Ok(Ok(Some(name))) => {
                    if let Some(agent) = self.registry.get(&name) {
                        return Some((agent, "classifier"));
                    }
                    // A classification must name a registered agent or
                    // be none; demote anything else to none.
                    warn!(thread = %thread_id, agent = %name, "Classifier chose unregistered agent");
                }
                Ok(Ok(None)) => {
                    debug!(thread = %thread_id, "Classifier declined to route");
                }
                Ok(Err(e)) => {
                    warn!(thread = %thread_id, error = %e, "Classifier failed; falling back");
                }
                Err(_) => {
                    warn!(thread = %thread_id, "Classifier timed out; falling back");
                }
            }
        }

        let name = self.config.default_agent_name.as_ref()?;
        self.registry.get(name).map(|a| (a, "default"))
    }
}

#[async_trait]
impl Orchestrator for RoutedOrchestrator {
    async fn orchestrate(
        &self,
        thread_id: &ThreadId,
        message: &str,
        options: OrchestrateOptions,
        sink: Option<&dyn StreamSink>,
    ) -> Result<Reply, OrchestrationError> {
        let Some((agent, via)) = self.resolve(thread_id, message, &options).await else {
            debug!(thread = %thread_id, "No agent resolvable; replying with sentinel");
            return Ok(Reply::NoSuitableAgent);
        };

        if self.config.verbose {
            info!(thread = %thread_id, agent = %agent.name(), via, "Classifier routing");
        } else {
            debug!(thread = %thread_id, agent = %agent.name(), via, "Classifier routing");
        }
        self.events.publish(StepEvent::AgentResolved {
            thread_id: thread_id.to_string(),
            agent: agent.name().to_string(),
            via: via.to_string(),
            timestamp: Utc::now(),
        });

        store_best_effort(&self.memory, &self.events, thread_id, USER_SENDER, message).await;

        // The attribution prefix is part of the response text on both
        // the streamed and blocking paths, so chunk concatenation
        // always equals the blocking return value.
        let prefix = format!("[{}] ", agent.name());
        let reply = invoke_agent(
            &agent,
            message,
            thread_id,
            &prefix,
            sink,
            self.config.call_timeout_secs,
        )
        .await?;

        if reply.cancelled {
            debug!(thread = %thread_id, "Caller aborted mid-stream; response not persisted");
        } else {
            store_best_effort(
                &self.memory,
                &self.events,
                thread_id,
                agent.name(),
                &reply.text,
            )
            .await;
        }

        Ok(Reply::Answer {
            agent: Some(agent.name().to_string()),
            text: reply.text,
        })
    }
}
