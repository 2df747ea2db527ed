//! ReAct strategy — the bounded Thought → Action → Observation loop.
//!
//! When a single agent's answer is insufficient, this strategy reasons
//! step by step: generate a thought, pick an agent and derive a task
//! for it, dispatch the task, and fold the response back in as the next
//! observation. A dedicated decision call checks after each cycle
//! whether the current observation already answers the original query.
//!
//! # Termination
//!
//! The loop is strictly bounded: a step budget initialized from
//! `max_steps` decrements every cycle, and at most `max_steps + 1`
//! cycles run. If the budget runs out without a positive termination
//! check, the last observation is returned as the final answer — the
//! caller gets the best available text rather than an error.
//!
//! # Failure degradation
//!
//! Inside the loop, collaborator failures and timeouts are step
//! failures: they become the cycle's observation and consume budget. A
//! malformed action falls back to the default agent (dispatching the
//! thought as the task) or, if none resolves, ends the loop early with
//! the current thought as the answer. Nothing inside the loop raises.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use switchtower_core::agent::{Agent, AgentDescriptor};
use switchtower_core::classifier::Classifier;
use switchtower_core::error::{AgentError, OrchestrationError};
use switchtower_core::event::{EventBus, StepEvent};
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{ThreadId, USER_SENDER};
use switchtower_core::registry::AgentRegistry;
use tracing::{debug, info, warn};

use crate::action::{ActionSpec, MalformedActionError};
use crate::config::OrchestratorConfig;
use crate::sink::StreamSink;
use crate::strategy::{OrchestrateOptions, Orchestrator, Reply, bounded, store_best_effort};

/// Label wrapped around every observation inside the loop; stripped
/// from the final answer.
const OBSERVATION_LABEL: &str = "Observation:";

/// Drives multi-step reasoning across the registered agents.
///
/// The `reasoner` is the free-form generation collaborator used for
/// thoughts, task derivation, and termination decisions; worker agents
/// are dispatched through the registry.
pub struct ReactOrchestrator {
    registry: Arc<AgentRegistry>,
    classifier: Arc<dyn Classifier>,
    reasoner: Arc<dyn Agent>,
    memory: Arc<dyn MemoryLedger>,
    events: Arc<EventBus>,
    config: OrchestratorConfig,
}

/// Why a cycle could not produce a dispatchable action.
enum ActionFailure {
    /// The action text violated the contract — recoverable via the
    /// default-agent fallback.
    Malformed(MalformedActionError),
    /// A collaborator call failed or timed out — a step failure that
    /// consumes budget.
    Collaborator(String),
}

impl ReactOrchestrator {
    pub fn new(
        registry: Arc<AgentRegistry>,
        classifier: Arc<dyn Classifier>,
        reasoner: Arc<dyn Agent>,
        memory: Arc<dyn MemoryLedger>,
        events: Arc<EventBus>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            classifier,
            reasoner,
            memory,
            events,
            config,
        }
    }

    fn thought_prompt(query: &str, observation: &str) -> String {
        format!(
            "You are coordinating specialist agents to answer a question.\n\
             Question: {query}\n\
             Current information: {observation}\n\
             State, in one or two sentences, what should be figured out or done next."
        )
    }

    fn action_prompt(thought: &str, agent: &AgentDescriptor) -> String {
        format!(
            "Turn this reasoning step into a task for the chosen agent.\n\
             Reasoning: {thought}\n\
             Agent: {} — {}\n\
             Describe what the agent should accomplish, not how to do it.\n\
             Reply with exactly two lines:\n\
             agent: {}\n\
             task: <the task description>",
            agent.name, agent.description, agent.name
        )
    }

    fn termination_prompt(query: &str, observation: &str) -> String {
        format!(
            "Question: {query}\n\
             {OBSERVATION_LABEL} {observation}\n\
             Does the observation fully answer the question? Reply yes or no."
        )
    }

    /// Whether the current observation already answers the query.
    ///
    /// Guard: an observation identical to the original message can
    /// never be final — the first cycle's observation is seeded with
    /// the user's message, and finishing there would answer nothing.
    async fn is_final(
        &self,
        thread_id: &ThreadId,
        query: &str,
        observation: &str,
        step_index: usize,
    ) -> bool {
        let is_final = if observation == query {
            false
        } else {
            let prompt = Self::termination_prompt(query, observation);
            match bounded(
                self.reasoner.name(),
                self.config.call_timeout_secs,
                self.reasoner.handle(&prompt, thread_id),
            )
            .await
            {
                Ok(verdict) => {
                    let verdict = verdict.trim().to_lowercase();
                    verdict.starts_with("yes") || verdict.starts_with("true")
                }
                Err(e) => {
                    warn!(thread = %thread_id, error = %e, "Termination check failed; continuing");
                    false
                }
            }
        };

        self.events.publish(StepEvent::TerminationCheck {
            thread_id: thread_id.to_string(),
            step_index,
            is_final,
            timestamp: Utc::now(),
        });
        is_final
    }

    async fn generate_thought(
        &self,
        thread_id: &ThreadId,
        query: &str,
        observation: &str,
    ) -> Result<String, AgentError> {
        let prompt = Self::thought_prompt(query, observation);
        bounded(
            self.reasoner.name(),
            self.config.call_timeout_secs,
            self.reasoner.handle(&prompt, thread_id),
        )
        .await
    }

    /// Pick a target agent for the thought and derive its task.
    ///
    /// An explicit override pins the target; otherwise the classifier
    /// chooses. The reasoner then emits the action in the two-line wire
    /// form, validated into an [`ActionSpec`] at this boundary.
    async fn determine_action(
        &self,
        thread_id: &ThreadId,
        thought: &str,
        pinned: Option<&str>,
    ) -> Result<ActionSpec, ActionFailure> {
        let candidates = self.registry.descriptors();
        if candidates.is_empty() {
            return Err(ActionFailure::Malformed(
                MalformedActionError::NoAgentSelected,
            ));
        }

        let chosen = if let Some(name) = pinned {
            name.to_string()
        } else {
            let timeout = Duration::from_secs(self.config.call_timeout_secs);
            match tokio::time::timeout(
                timeout,
                self.classifier.classify(thought, thread_id, &candidates),
            )
            .await
            {
                Ok(Ok(Some(name))) => name,
                Ok(Ok(None)) => {
                    return Err(ActionFailure::Malformed(
                        MalformedActionError::NoAgentSelected,
                    ));
                }
                Ok(Err(e)) => return Err(ActionFailure::Collaborator(e.to_string())),
                Err(_) => {
                    return Err(ActionFailure::Collaborator(
                        "classifier timed out".to_string(),
                    ));
                }
            }
        };

        let Some(descriptor) = candidates.into_iter().find(|c| c.name == chosen) else {
            return Err(ActionFailure::Malformed(MalformedActionError::UnknownAgent(
                chosen,
            )));
        };

        let prompt = Self::action_prompt(thought, &descriptor);
        let raw = bounded(
            self.reasoner.name(),
            self.config.call_timeout_secs,
            self.reasoner.handle(&prompt, thread_id),
        )
        .await
        .map_err(|e| ActionFailure::Collaborator(e.to_string()))?;

        let spec = ActionSpec::parse(&raw).map_err(ActionFailure::Malformed)?;
        if self.registry.get(&spec.agent_name).is_none() {
            return Err(ActionFailure::Malformed(MalformedActionError::UnknownAgent(
                spec.agent_name,
            )));
        }
        Ok(spec)
    }

    /// Dispatch the action and wrap the outcome as the next observation.
    ///
    /// An agent failure here is recoverable: it becomes the
    /// observation text and the loop keeps its remaining budget.
    async fn execute_action(&self, thread_id: &ThreadId, spec: &ActionSpec) -> String {
        let Some(agent) = self.registry.get(&spec.agent_name) else {
            return format!(
                "{OBSERVATION_LABEL} the {} agent is no longer registered",
                spec.agent_name
            );
        };

        match bounded(
            agent.name(),
            self.config.call_timeout_secs,
            agent.handle(&spec.task, thread_id),
        )
        .await
        {
            Ok(response) => format!("{OBSERVATION_LABEL} {response}"),
            Err(e) => {
                warn!(thread = %thread_id, agent = %spec.agent_name, error = %e, "Action failed; captured as observation");
                format!("{OBSERVATION_LABEL} the {} agent failed: {e}", spec.agent_name)
            }
        }
    }

    /// Strip the internal observation label from the final answer.
    fn final_answer(observation: &str) -> &str {
        observation
            .strip_prefix(OBSERVATION_LABEL)
            .map(str::trim_start)
            .unwrap_or(observation)
    }
}

#[async_trait]
impl Orchestrator for ReactOrchestrator {
    async fn orchestrate(
        &self,
        thread_id: &ThreadId,
        message: &str,
        options: OrchestrateOptions,
        sink: Option<&dyn StreamSink>,
    ) -> Result<Reply, OrchestrationError> {
        let max_steps = self.config.effective_max_steps();
        info!(thread = %thread_id, max_steps, "ReAct loop starting");

        store_best_effort(&self.memory, &self.events, thread_id, USER_SENDER, message).await;

        // The initial observation is the user's message itself; the
        // termination guard keeps it from ever counting as final.
        let mut observation = message.to_string();
        let mut budget = i64::from(max_steps);
        let mut step_index = 0usize;
        let mut early_final: Option<String> = None;

        while budget >= 0 {
            if self
                .is_final(thread_id, message, &observation, step_index)
                .await
            {
                debug!(thread = %thread_id, step_index, "Observation accepted as final");
                break;
            }

            let thought = match self.generate_thought(thread_id, message, &observation).await {
                Ok(thought) => thought,
                Err(e) => {
                    warn!(thread = %thread_id, error = %e, "Thought generation failed; step consumed");
                    self.events.publish(StepEvent::StepFailed {
                        thread_id: thread_id.to_string(),
                        step_index,
                        reason: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    observation = format!("{OBSERVATION_LABEL} step failed: {e}");
                    budget -= 1;
                    step_index += 1;
                    continue;
                }
            };

            if self.config.verbose {
                info!(thread = %thread_id, step_index, thought = %thought, "Thought");
            } else {
                debug!(thread = %thread_id, step_index, thought = %thought, "Thought");
            }
            self.events.publish(StepEvent::Thought {
                thread_id: thread_id.to_string(),
                step_index,
                content: thought.clone(),
                timestamp: Utc::now(),
            });

            match self
                .determine_action(thread_id, &thought, options.agent_name.as_deref())
                .await
            {
                Ok(spec) => {
                    self.events.publish(StepEvent::ActionSelected {
                        thread_id: thread_id.to_string(),
                        step_index,
                        agent: spec.agent_name.clone(),
                        task: spec.task.clone(),
                        timestamp: Utc::now(),
                    });

                    observation = self.execute_action(thread_id, &spec).await;
                    self.events.publish(StepEvent::Observation {
                        thread_id: thread_id.to_string(),
                        step_index,
                        content: observation.clone(),
                        timestamp: Utc::now(),
                    });
                }
                Err(ActionFailure::Collaborator(reason)) => {
                    warn!(thread = %thread_id, step_index, %reason, "Step failed");
                    self.events.publish(StepEvent::StepFailed {
                        thread_id: thread_id.to_string(),
                        step_index,
                        reason: reason.clone(),
                        timestamp: Utc::now(),
                    });
                    observation = format!("{OBSERVATION_LABEL} step failed: {reason}");
                }
                Err(ActionFailure::Malformed(e)) => {
                    warn!(thread = %thread_id, error = %e, "Malformed action; trying default agent");

                    let fallback = self
                        .config
                        .default_agent_name
                        .as_ref()
                        .and_then(|name| self.registry.get(name));

                    match fallback {
                        Some(agent) => {
                            // Dispatch the thought itself as the task
                            let spec = ActionSpec {
                                agent_name: agent.name().to_string(),
                                task: thought.clone(),
                            };
                            self.events.publish(StepEvent::ActionSelected {
                                thread_id: thread_id.to_string(),
                                step_index,
                                agent: spec.agent_name.clone(),
                                task: spec.task.clone(),
                                timestamp: Utc::now(),
                            });
                            observation = self.execute_action(thread_id, &spec).await;
                            self.events.publish(StepEvent::Observation {
                                thread_id: thread_id.to_string(),
                                step_index,
                                content: observation.clone(),
                                timestamp: Utc::now(),
                            });
                        }
                        None => {
                            debug!(thread = %thread_id, "No fallback agent; ending loop with current thought");
                            early_final = Some(thought);
                            break;
                        }
                    }
                }
            }

            budget -= 1;
            step_index += 1;
        }

        let answer = match early_final {
            Some(thought) => thought,
            None => Self::final_answer(&observation).to_string(),
        };

        // A streamed ReAct call delivers the final answer as one chunk,
        // so chunk concatenation still equals the blocking return value.
        let cancelled = match sink {
            Some(sink) => !sink.emit(&answer),
            None => false,
        };

        if cancelled {
            debug!(thread = %thread_id, "Caller aborted; answer not persisted");
        } else {
            store_best_effort(
                &self.memory,
                &self.events,
                thread_id,
                self.reasoner.name(),
                &answer,
            )
            .await;
        }

        info!(thread = %thread_id, steps = step_index, "ReAct loop complete");
        Ok(Reply::Answer {
            agent: None,
            text: answer,
        })
    }
}
