//! Infrastructure adapters: document hosts and poll timers.

pub mod document;
pub mod timer;

pub use document::InMemoryDocument;
pub use timer::{ManualTimer, PollRequest};
