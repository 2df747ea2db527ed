//! Conversation ledger implementations for Switchtower.

pub mod file_backend;
pub mod in_memory;
pub mod noop;

pub use file_backend::FileLedger;
pub use in_memory::InMemoryLedger;
pub use noop::NoopLedger;
