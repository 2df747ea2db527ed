//! Shared test doubles for strategy tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use switchtower_core::agent::{Agent, AgentDescriptor, ChunkStream};
use switchtower_core::classifier::{ClassificationResult, Classifier};
use switchtower_core::error::{AgentError, ClassifierError, StorageError};
use switchtower_core::memory::MemoryLedger;
use switchtower_core::message::{Message, ThreadId};
use switchtower_core::registry::AgentRegistry;
use switchtower_memory::InMemoryLedger;
use tokio::sync::mpsc;

use crate::sink::StreamSink;

/// Build a shared registry from a list of agents.
pub(crate) fn registry_of(agents: Vec<Arc<dyn Agent>>) -> Arc<AgentRegistry> {
    let mut registry = AgentRegistry::new();
    for agent in agents {
        registry.register(agent);
    }
    Arc::new(registry)
}

/// Fresh in-memory ledger behind the trait object the strategies take.
pub(crate) fn test_ledger() -> Arc<dyn MemoryLedger> {
    Arc::new(InMemoryLedger::new())
}

/// Returns the task verbatim.
pub(crate) struct EchoAgent {
    name: String,
}

impl EchoAgent {
    pub(crate) fn named(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Agent for EchoAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "echoes the task"
    }
    async fn handle(&self, task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        Ok(task.to_string())
    }
}

/// Echoes the task, streamed one word-chunk at a time.
pub(crate) struct ChunkedEchoAgent {
    name: String,
}

impl ChunkedEchoAgent {
    pub(crate) fn named(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Agent for ChunkedEchoAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "echoes the task in chunks"
    }
    async fn handle(&self, task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        Ok(task.to_string())
    }
    async fn handle_stream(
        &self,
        task: &str,
        _thread_id: &ThreadId,
    ) -> Result<ChunkStream, AgentError> {
        let chunks: Vec<String> = task.split_inclusive(' ').map(str::to_string).collect();
        let (tx, rx) = mpsc::channel(chunks.len().max(1));
        for chunk in chunks {
            let _ = tx.send(Ok(chunk)).await;
        }
        Ok(rx)
    }
}

/// Always fails with a backend error.
pub(crate) struct FailingAgent {
    name: String,
}

impl FailingAgent {
    pub(crate) fn named(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Agent for FailingAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "always fails"
    }
    async fn handle(&self, _task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        Err(AgentError::Backend {
            agent: self.name.clone(),
            reason: "backend unavailable".into(),
        })
    }
}

/// Sleeps past any sane timeout before answering.
pub(crate) struct SlowAgent {
    name: String,
    delay_secs: u64,
}

impl SlowAgent {
    pub(crate) fn named(name: &str, delay_secs: u64) -> Self {
        Self {
            name: name.into(),
            delay_secs,
        }
    }
}

#[async_trait]
impl Agent for SlowAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "answers eventually"
    }
    async fn handle(&self, _task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        tokio::time::sleep(std::time::Duration::from_secs(self.delay_secs)).await;
        Ok("late".into())
    }
}

/// Returns scripted responses in sequence; panics when exhausted.
pub(crate) struct ScriptedAgent {
    name: String,
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedAgent {
    pub(crate) fn new(name: &str, responses: &[&str]) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "scripted responses"
    }
    async fn handle(&self, _task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap();
        if index >= responses.len() {
            panic!(
                "ScriptedAgent '{}': no more responses (call #{}, have {})",
                self.name,
                index,
                responses.len()
            );
        }
        Ok(responses[index].clone())
    }
}

/// A reasoner that answers by prompt shape instead of call order,
/// for loop tests that run an unbounded number of cycles.
pub(crate) struct LoopingReasoner {
    term_answer: String,
    action: String,
}

impl LoopingReasoner {
    pub(crate) fn new(term_answer: &str, action: &str) -> Self {
        Self {
            term_answer: term_answer.into(),
            action: action.into(),
        }
    }
}

#[async_trait]
impl Agent for LoopingReasoner {
    fn name(&self) -> &str {
        "reasoner"
    }
    fn description(&self) -> &str {
        "rule-based reasoner stub"
    }
    async fn handle(&self, task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        if task.contains("Reply yes or no") {
            Ok(self.term_answer.clone())
        } else if task.contains("Reply with exactly two lines") {
            Ok(self.action.clone())
        } else {
            Ok("keep digging".into())
        }
    }
}

/// Counts invocations, answering the same text every time.
pub(crate) struct CountingAgent {
    name: String,
    calls: Arc<AtomicUsize>,
}

impl CountingAgent {
    pub(crate) fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Agent for CountingAgent {
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        "counts calls"
    }
    async fn handle(&self, _task: &str, _thread_id: &ThreadId) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("partial result".into())
    }
}

/// Always answers with the same classification.
pub(crate) struct FixedClassifier {
    choice: Option<String>,
}

impl FixedClassifier {
    pub(crate) fn choosing(name: &str) -> Self {
        Self {
            choice: Some(name.into()),
        }
    }

    pub(crate) fn declining() -> Self {
        Self { choice: None }
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(
        &self,
        _message: &str,
        _thread_id: &ThreadId,
        _candidates: &[AgentDescriptor],
    ) -> Result<ClassificationResult, ClassifierError> {
        Ok(self.choice.clone())
    }
}

/// Always fails to classify.
pub(crate) struct ErrClassifier;

#[async_trait]
impl Classifier for ErrClassifier {
    async fn classify(
        &self,
        _message: &str,
        _thread_id: &ThreadId,
        _candidates: &[AgentDescriptor],
    ) -> Result<ClassificationResult, ClassifierError> {
        Err(ClassifierError::Backend("classifier offline".into()))
    }
}

/// A ledger whose every operation fails.
pub(crate) struct FailingLedger;

#[async_trait]
impl MemoryLedger for FailingLedger {
    fn name(&self) -> &str {
        "failing"
    }
    async fn store(
        &self,
        _thread_id: &ThreadId,
        _sender: &str,
        _content: &str,
    ) -> Result<(), StorageError> {
        Err(StorageError::Storage("disk full".into()))
    }
    async fn history(&self, _thread_id: &ThreadId) -> Result<Vec<Message>, StorageError> {
        Err(StorageError::ReadFailed("disk full".into()))
    }
    async fn thread_ids(&self) -> Result<Vec<ThreadId>, StorageError> {
        Err(StorageError::ReadFailed("disk full".into()))
    }
}

/// Records emitted chunks; optionally pretends the consumer left after
/// a fixed number of chunks.
pub(crate) struct CollectingSink {
    chunks: Mutex<Vec<String>>,
    limit: Option<usize>,
}

impl CollectingSink {
    pub(crate) fn new() -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            limit: None,
        }
    }

    pub(crate) fn with_limit(limit: usize) -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            limit: Some(limit),
        }
    }

    pub(crate) fn chunks(&self) -> Vec<String> {
        self.chunks.lock().unwrap().clone()
    }

    pub(crate) fn concatenated(&self) -> String {
        self.chunks.lock().unwrap().concat()
    }
}

impl StreamSink for CollectingSink {
    fn emit(&self, chunk: &str) -> bool {
        let mut chunks = self.chunks.lock().unwrap();
        if self.limit.is_some_and(|limit| chunks.len() >= limit) {
            return false;
        }
        chunks.push(chunk.to_string());
        true
    }
}
