//! Agent registry — ordered lookup of registered worker agents.
//!
//! The registry is read-mostly: it is populated once at startup with
//! `&mut self` registration, then shared behind an `Arc` so concurrent
//! orchestrations read it without any synchronization. Registration
//! order is stable and observable — the direct strategy's "first
//! registered agent" fallback depends on it.
//!
//! The registry is injected into orchestrators as an explicit
//! dependency, never reached through a process-wide singleton.

use std::sync::Arc;
use tracing::info;

use crate::agent::{Agent, AgentDescriptor};

/// An ordered registry of worker agents, keyed by name.
pub struct AgentRegistry {
    agents: Vec<Arc<dyn Agent>>,
}

impl AgentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Register an agent.
    ///
    /// Re-registering a name replaces the handle in place, keeping the
    /// original registration position.
    pub fn register(&mut self, agent: Arc<dyn Agent>) {
        let name = agent.name().to_string();
        match self.agents.iter().position(|a| a.name() == name) {
            Some(index) => {
                self.agents[index] = agent;
                info!(agent = %name, "Replaced registered agent");
            }
            None => {
                self.agents.push(agent);
                info!(agent = %name, "Registered agent");
            }
        }
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.iter().find(|a| a.name() == name).cloned()
    }

    /// The first registered agent, if any.
    pub fn first(&self) -> Option<Arc<dyn Agent>> {
        self.agents.first().cloned()
    }

    /// All registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    /// Descriptors for all registered agents, in registration order.
    pub fn descriptors(&self) -> Vec<AgentDescriptor> {
        self.agents
            .iter()
            .map(|a| AgentDescriptor::of(a.as_ref()))
            .collect()
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
