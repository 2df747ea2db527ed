//! Orchestrator configuration, consumed at construction time.
//!
//! This core does not load configuration files; the caller builds an
//! [`OrchestratorConfig`] (or deserializes one from its own config
//! surface) and hands it to the strategy constructors.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Construction-time settings shared by all orchestration strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum ReAct reasoning steps per call (≥ 1).
    ///
    /// The loop runs at most `max_steps + 1` Thought/Action/Observation
    /// cycles before returning the last observation as the answer.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Fallback agent when routing cannot decide.
    #[serde(default)]
    pub default_agent_name: Option<String>,

    /// Per-collaborator-call timeout in seconds.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,

    /// Raise per-step logging from debug to info.
    #[serde(default)]
    pub verbose: bool,
}

fn default_max_steps() -> u32 {
    5
}

fn default_call_timeout() -> u64 {
    60
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            default_agent_name: None,
            call_timeout_secs: default_call_timeout(),
            verbose: false,
        }
    }
}

impl OrchestratorConfig {
    /// Set the default agent name.
    pub fn with_default_agent(mut self, name: impl Into<String>) -> Self {
        self.default_agent_name = Some(name.into());
        self
    }

    /// Set the step budget.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// The step budget with the ≥ 1 floor applied.
    pub(crate) fn effective_max_steps(&self) -> u32 {
        if self.max_steps == 0 {
            warn!("max_steps of 0 clamped to 1");
            1
        } else {
            self.max_steps
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.call_timeout_secs, 60);
        assert!(config.default_agent_name.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn deserialize_with_missing_fields() {
        let config: OrchestratorConfig = serde_json::from_str(r#"{"verbose": true}"#).unwrap();
        assert_eq!(config.max_steps, 5);
        assert!(config.verbose);
    }

    #[test]
    fn zero_steps_clamped() {
        let config = OrchestratorConfig::default().with_max_steps(0);
        assert_eq!(config.effective_max_steps(), 1);
    }

    #[test]
    fn builder_sets_default_agent() {
        let config = OrchestratorConfig::default().with_default_agent("billing");
        assert_eq!(config.default_agent_name.as_deref(), Some("billing"));
    }
}
