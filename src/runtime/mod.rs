//! Runtime adapters: the spawning seam and the tokio-hosted loader service.

pub mod service;
pub mod spawn;
pub mod tokio_spawner;

pub use service::{LoaderHandle, LoaderService};
pub use spawn::Spawn;
pub use tokio_spawner::TokioSpawner;
