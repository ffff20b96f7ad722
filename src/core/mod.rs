//! Core scheduling abstractions: capability detection, queues, dispatch and
//! completion tracking.

pub mod error;
pub mod resource;
pub mod capability;
pub mod host;
pub mod dispatch;
pub mod batch;
pub(crate) mod queue;
pub mod tracker;
pub mod snapshot;
pub mod loader;

pub use error::{AppResult, LoaderError};
pub use resource::{BatchId, Flow, ResourceClass, UrlList};
pub use capability::{CapabilityRecord, EngineClass, HostProbe};
pub use host::{Host, LoadSignal, NodeId, NodeKind, NodeSpec, PollTimer};
pub use dispatch::{Detection, NodeDecoration, Strategy};
pub use batch::{BatchCallback, BatchRequest};
pub use tracker::{Outcome, PollBudget, PollVerdict, UrlState};
pub use snapshot::ProgressSnapshot;
pub use loader::{ClassStats, LazyLoader};
