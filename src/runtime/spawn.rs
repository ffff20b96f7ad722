//! Spawning abstraction.

use std::future::Future;

/// Abstraction for spawning background futures on a runtime.
pub trait Spawn {
    /// Spawn a future that runs to completion in the background.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
