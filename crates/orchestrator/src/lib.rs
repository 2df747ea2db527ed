//! The orchestration strategies — the heart of Switchtower.
//!
//! One operation, three interchangeable strategies:
//!
//! 1. **Direct** — override > configured default > first registered
//!    agent, no classifier involved.
//! 2. **Routed** — a classifier picks the best-fit agent in one shot;
//!    the response carries the agent's bracketed name as attribution.
//! 3. **ReAct** — a bounded Thought → Action → Observation loop that
//!    coordinates multiple agents until an observation answers the
//!    original query or the step budget runs out.
//!
//! All strategies share the same contract: routing failure is the
//! [`Reply::NoSuitableAgent`] outcome (rendered as the
//! `"no suitable agent"` sentinel), ledger writes are best-effort, and
//! a supplied [`StreamSink`] receives exactly the chunks whose
//! concatenation equals the blocking return value.

pub mod action;
pub mod config;
pub mod direct;
pub mod react;
pub mod routed;
pub mod sink;
pub mod strategy;

pub use action::{ActionSpec, MalformedActionError};
pub use config::OrchestratorConfig;
pub use direct::DirectOrchestrator;
pub use react::ReactOrchestrator;
pub use routed::RoutedOrchestrator;
pub use sink::{ChannelSink, StreamSink};
pub use strategy::{NO_SUITABLE_AGENT, OrchestrateOptions, Orchestrator, Reply};

#[cfg(test)]
pub(crate) mod test_helpers;
