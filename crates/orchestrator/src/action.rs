//! Validated action parsing for the ReAct loop.
//!
//! An action is the strict two-line wire form the reasoner emits:
//!
//! ```text
//! agent: <name>
//! task: <what to accomplish>
//! ```
//!
//! Parsing happens at the decision boundary and produces either a
//! validated [`ActionSpec`] or a typed [`MalformedActionError`]. A
//! malformed action is recoverable — the loop falls back to the default
//! agent or ends early — never a crash.

use thiserror::Error;

/// A validated action: which agent to dispatch and what to ask of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    /// Target agent's registered name.
    pub agent_name: String,

    /// The task description — what to do, never how.
    pub task: String,
}

/// Why an action could not be validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedActionError {
    #[error("expected exactly two non-empty lines, got {0}")]
    WrongShape(usize),

    #[error("first line must be 'agent: <name>'")]
    MissingAgentField,

    #[error("second line must be 'task: <description>'")]
    MissingTaskField,

    #[error("classifier selected no agent for the action")]
    NoAgentSelected,

    #[error("action names unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("action task is empty")]
    EmptyTask,
}

impl ActionSpec {
    /// Parse the two-line wire form.
    ///
    /// Blank lines are ignored; field labels are required in order.
    pub fn parse(raw: &str) -> Result<Self, MalformedActionError> {
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        if lines.len() != 2 {
            return Err(MalformedActionError::WrongShape(lines.len()));
        }

        let agent_name = lines[0]
            .strip_prefix("agent:")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(MalformedActionError::MissingAgentField)?;

        let task = lines[1]
            .strip_prefix("task:")
            .map(str::trim)
            .ok_or(MalformedActionError::MissingTaskField)?;

        if task.is_empty() {
            return Err(MalformedActionError::EmptyTask);
        }

        Ok(Self {
            agent_name: agent_name.to_string(),
            task: task.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_action() {
        let spec = ActionSpec::parse("agent: ec2\ntask: stop the runaway instance").unwrap();
        assert_eq!(spec.agent_name, "ec2");
        assert_eq!(spec.task, "stop the runaway instance");
    }

    #[test]
    fn tolerates_surrounding_blank_lines() {
        let spec = ActionSpec::parse("\nagent: billing\n\ntask: summarize this month\n").unwrap();
        assert_eq!(spec.agent_name, "billing");
    }

    #[test]
    fn extra_prose_is_wrong_shape() {
        let err = ActionSpec::parse("Sure, here's the plan:\nagent: ec2\ntask: stop it").unwrap_err();
        assert_eq!(err, MalformedActionError::WrongShape(3));
    }

    #[test]
    fn swapped_fields_rejected() {
        let err = ActionSpec::parse("task: stop it\nagent: ec2").unwrap_err();
        assert_eq!(err, MalformedActionError::MissingAgentField);
    }

    #[test]
    fn empty_task_rejected() {
        let err = ActionSpec::parse("agent: ec2\ntask:").unwrap_err();
        assert_eq!(err, MalformedActionError::EmptyTask);
    }

    #[test]
    fn missing_agent_name_rejected() {
        let err = ActionSpec::parse("agent:\ntask: do something").unwrap_err();
        assert_eq!(err, MalformedActionError::MissingAgentField);
    }
}
