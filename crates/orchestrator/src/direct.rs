//! Direct strategy — default selection without a classifier.
//!
//! Resolution order: explicit override > configured default > first
//! registered agent. The simplest strategy, for deployments with a
//! single worker or caller-side routing.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use switchtower_core::agent::Agent;
use switchtower_core::error::OrchestrationError;
use switchtower_core::event::{EventBus, StepEvent};
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{ThreadId, USER_SENDER};
use switchtower_core::registry::AgentRegistry;
use tracing::{debug, info};

use crate::config::OrchestratorConfig;
use crate::sink::StreamSink;
use crate::strategy::{OrchestrateOptions, Orchestrator, Reply, invoke_agent, store_best_effort};

/// Routes every message to one agent picked without classification.
pub struct DirectOrchestrator {
    registry: Arc<AgentRegistry>,
    memory: Arc<dyn MemoryLedger>,
    events: Arc<EventBus>,
    config: OrchestratorConfig,
}

impl DirectOrchestrator {
    pub fn new(
        registry: Arc<AgentRegistry>,
        memory: Arc<dyn MemoryLedger>,
        events: Arc<EventBus>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            memory,
            events,
            config,
        }
    }

    /// Resolve the target agent and how it was chosen.
    ///
    /// An explicitly named agent (override or default) that is not
    /// registered resolves to nothing rather than falling through.
    fn resolve(&self, options: &OrchestrateOptions) -> Option<(Arc<dyn Agent>, &'static str)> {
        if let Some(name) = &options.agent_name {
            return self.registry.get(name).map(|a| (a, "override"));
        }
        if let Some(name) = &self.config.default_agent_name {
            return self.registry.get(name).map(|a| (a, "default"));
        }
        self.registry.first().map(|a| (a, "first_registered"))
    }
}

#[async_trait]
impl Orchestrator for DirectOrchestrator {
    async fn orchestrate(
        &self,
        thread_id: &ThreadId,
        message: &str,
        options: OrchestrateOptions,
        sink: Option<&dyn StreamSink>,
    ) -> Result<Reply, OrchestrationError> {
        let Some((agent, via)) = self.resolve(&options) else {
            debug!(thread = %thread_id, "No agent resolvable; replying with sentinel");
            return Ok(Reply::NoSuitableAgent);
        };

        if self.config.verbose {
            info!(thread = %thread_id, agent = %agent.name(), via, "Direct routing");
        } else {
            debug!(thread = %thread_id, agent = %agent.name(), via, "Direct routing");
        }
        self.events.publish(StepEvent::AgentResolved {
            thread_id: thread_id.to_string(),
            agent: agent.name().to_string(),
            via: via.to_string(),
            timestamp: Utc::now(),
        });

        store_best_effort(&self.memory, &self.events, thread_id, USER_SENDER, message).await;

        let reply = invoke_agent(
            &agent,
            message,
            thread_id,
            "",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn direct(
        registry: Arc<AgentRegistry>,
        config: OrchestratorConfig,
    ) -> (DirectOrchestrator, Arc<dyn MemoryLedger>) {
        let memory = test_ledger();
        let orchestrator = DirectOrchestrator::new(
            registry,
            memory.clone(),
            Arc::new(EventBus::default()),
            config,
        );
        (orchestrator, memory)
    }

    #[tokio::test]
    async fn empty_registry_yields_sentinel() {
        let (orchestrator, memory) =
            direct(registry_of(vec![]), OrchestratorConfig::default());

        let reply = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "hello",
                OrchestrateOptions::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(reply, Reply::NoSuitableAgent);
        assert_eq!(reply.text(), "no suitable agent");
        // Routing failure must leave no trace in the ledger
        assert!(memory
            .history(&ThreadId::from("t-1"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn first_registered_wins_without_config() {
        let registry = registry_of(vec![
            Arc::new(EchoAgent::named("alpha")),
            Arc::new(EchoAgent::named("beta")),
        ]);
        let (orchestrator, _) = direct(registry, OrchestratorConfig::default());

        let reply = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "ping",
                OrchestrateOptions::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(reply.agent(), Some("alpha"));
        assert_eq!(reply.text(), "ping");
    }

    #[tokio::test]
    async fn default_agent_beats_registration_order() {
        let registry = registry_of(vec![
            Arc::new(EchoAgent::named("alpha")),
            Arc::new(EchoAgent::named("beta")),
        ]);
        let config = OrchestratorConfig::default().with_default_agent("beta");
        let (orchestrator, _) = direct(registry, config);

        let reply = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "ping",
                OrchestrateOptions::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(reply.agent(), Some("beta"));
    }

    #[tokio::test]
    async fn unknown_override_yields_sentinel() {
        let registry = registry_of(vec![Arc::new(EchoAgent::named("alpha"))]);
        let (orchestrator, memory) = direct(registry, OrchestratorConfig::default());

        let reply = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "ping",
                OrchestrateOptions::with_agent("ghost"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(reply, Reply::NoSuitableAgent);
        assert!(memory
            .history(&ThreadId::from("t-1"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn writes_user_then_response() {
        let registry = registry_of(vec![Arc::new(EchoAgent::named("echo"))]);
        let (orchestrator, memory) = direct(registry, OrchestratorConfig::default());
        let thread = ThreadId::from("t-1");

        orchestrator
            .orchestrate(&thread, "hi", OrchestrateOptions::default(), None)
            .await
            .unwrap();

        let history = memory.history(&thread).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender, "user");
        assert_eq!(history[0].content, "hi");
        assert_eq!(history[1].sender, "echo");
        assert_eq!(history[1].content, "hi");
    }

    #[tokio::test]
    async fn ledger_failure_is_swallowed() {
        let registry = registry_of(vec![Arc::new(EchoAgent::named("echo"))]);
        let memory: Arc<dyn MemoryLedger> = Arc::new(FailingLedger);
        let events = Arc::new(EventBus::default());
        let mut bus_rx = events.subscribe();
        let orchestrator = DirectOrchestrator::new(
            registry,
            memory,
            events,
            OrchestratorConfig::default(),
        );

        let reply = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "still works",
                OrchestrateOptions::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(reply.text(), "still works");

        // The swallowed failures are still observable on the bus
        let mut failures = 0;
        while let Ok(event) = bus_rx.try_recv() {
            if matches!(event.as_ref(), StepEvent::MemoryWriteFailed { .. }) {
                failures += 1;
            }
        }
        assert_eq!(failures, 2);
    }

    #[tokio::test]
    async fn agent_failure_propagates() {
        let registry = registry_of(vec![Arc::new(FailingAgent::named("down"))]);
        let (orchestrator, _) = direct(registry, OrchestratorConfig::default());

        let err = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "ping",
                OrchestrateOptions::default(),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestrationError::AgentExecution(_)));
    }

    #[tokio::test]
    async fn streamed_equals_blocking() {
        let registry = registry_of(vec![Arc::new(ChunkedEchoAgent::named("chunky"))]);
        let (orchestrator, _) = direct(registry.clone(), OrchestratorConfig::default());

        let blocking = orchestrator
            .orchestrate(
                &ThreadId::from("t-1"),
                "one two three",
                OrchestrateOptions::default(),
                None,
            )
            .await
            .unwrap();

        let sink = CollectingSink::new();
        let streamed = orchestrator
            .orchestrate(
                &ThreadId::from("t-2"),
                "one two three",
                OrchestrateOptions::default(),
                Some(&sink),
            )
            .await
            .unwrap();

        assert_eq!(sink.concatenated(), blocking.text());
        assert_eq!(streamed.text(), blocking.text());
    }
}
