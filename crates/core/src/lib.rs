//! # Switchtower Core
//!
//! Domain types, collaborator traits, and error definitions for the
//! Switchtower orchestration runtime. This crate has **zero framework
//! dependencies** — it defines the domain model that the memory and
//! orchestrator crates implement against.
//!
//! ## Design Philosophy
//!
//! Every collaborator the orchestration core talks to — worker agents,
//! the classifier, the conversation ledger — is defined as a trait
//! here. Implementations live in their own crates (or in the caller's
//! code). This enables:
//! - Swapping implementations via construction-time injection
//! - Easy testing with scripted stub collaborators
//! - A clean dependency graph (all crates depend inward on core)

pub mod agent;
pub mod classifier;
pub mod error;
pub mod event;
pub mod memory;
pub mod message;
pub mod registry;

// Re-export key types at crate root for ergonomics
pub use agent::{Agent, AgentDescriptor, ChunkStream};
pub use classifier::{ClassificationResult, Classifier};
pub use error::{
    AgentError, ClassifierError, Error, OrchestrationError, Result, StorageError,
};
pub use event::{EventBus, StepEvent};
pub use memory::MemoryLedger;
pub use message::{Message, Thread, ThreadId, USER_SENDER};
pub use registry::AgentRegistry;
