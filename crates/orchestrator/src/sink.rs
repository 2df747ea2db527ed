//! Stream sinks — where incremental output goes.
//!
//! A sink receives response chunks as the agent produces them. The
//! contract is deliberately small: `emit` is synchronous and returns
//! whether the consumer is still listening, which is how cancellation
//! propagates back into the orchestrator. Once a sink reports the
//! consumer gone, the orchestrator stops forwarding and skips the
//! trailing ledger write (nothing of the aborted response is persisted).

use tokio::sync::mpsc;

/// Consumer of streamed response chunks.
pub trait StreamSink: Send + Sync {
    /// Deliver one chunk. Returns false once the consumer has gone
    /// away; the caller must stop forwarding.
    fn emit(&self, chunk: &str) -> bool;
}

/// A sink backed by an unbounded tokio channel.
///
/// `emit` fails only when the receiver has been dropped, so a slow
/// consumer is buffered rather than mistaken for a cancelled one.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StreamSink for ChannelSink {
    fn emit(&self, chunk: &str) -> bool {
        self.tx.send(chunk.to_string()).is_ok()
    }
}
