//! Document hosts.

pub mod memory;

pub use memory::InMemoryDocument;
