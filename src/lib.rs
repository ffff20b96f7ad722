//! # Lazyload
//!
//! An on-demand loader for scripts and stylesheets.
//!
//! Callers hand the loader ordered batches of resource locations. The loader
//! inserts one node per location into the host document, tracks each node to
//! completion and invokes the batch callback exactly once after the whole batch
//! finished. Scripts and stylesheets run through independent FIFO queues, so a
//! slow stylesheet never delays a script batch and vice versa.
//!
//! ## How loading proceeds
//!
//! - **Capability detection**: the host is probed once. Engines that keep
//!   execution order under concurrent fetch get all scripts of a batch at
//!   once; everything else loads scripts strictly one after another.
//! - **Completion detection**: native load/error events where the engine has
//!   them, ready-state transitions on legacy engines, and bounded polling of
//!   stylesheet state where neither fires reliably.
//! - **Bounded polling**: a poll that never confirms a node eventually
//!   force-finishes it, so one broken stylesheet cannot stall the queue.
//! - **Reentrancy**: callbacks receive the loader and may submit follow-up
//!   batches ahead of everything already waiting, or halt the queue.
//!
//! ```rust,ignore
//! use lazyload::builders::LoaderBuilder;
//! use lazyload::config::LoaderConfig;
//! use lazyload::core::{BatchRequest, HostProbe, LoadSignal};
//! use lazyload::infra::InMemoryDocument;
//!
//! let document = InMemoryDocument::new(HostProbe::new(user_agent));
//! let mut loader = LoaderBuilder::new(LoaderConfig::default())
//!     .host(document)
//!     .build::<()>()?;
//!
//! let nodes = loader.load_code(
//!     BatchRequest::new(["vendor.js", "app.js"]).on_complete(|_, _, snapshot| {
//!         tracing::info!(done = snapshot.done_count, "scripts ready");
//!     }),
//! );
//! for node in nodes {
//!     loader.signal(node, LoadSignal::Load);
//! }
//! ```
//!
//! With the `tokio-runtime` feature the loader can also run as a service task
//! behind a cloneable handle; see [`runtime::LoaderService`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core loading abstractions: capabilities, queues, dispatch and tracking.
pub mod core;
/// Configuration model for polling and node decoration.
pub mod config;
/// Builders to construct loaders from configuration.
pub mod builders;
/// Infrastructure adapters: document hosts and poll timers.
pub mod infra;
/// Runtime adapters and the tokio-hosted loader service.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::builders::LoaderBuilder;
pub use crate::config::LoaderConfig;
pub use crate::core::{
    BatchRequest, CapabilityRecord, Flow, Host, HostProbe, LazyLoader, LoadSignal, LoaderError,
    NodeId, ProgressSnapshot, ResourceClass,
};
