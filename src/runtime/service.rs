//! Loader service: owns a [`LazyLoader`] on one task and marshals every
//! submission, completion signal and poll tick onto it.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::builders::LoaderBuilder;
use crate::core::{
    BatchRequest, ClassStats, Host, LazyLoader, LoadSignal, LoaderError, NodeId, PollTimer,
    ResourceClass,
};
use crate::runtime::Spawn;

/// Commands processed by the service task, one at a time.
enum Command<H, P> {
    Submit {
        class: ResourceClass,
        request: BatchRequest<H, P>,
        reply: oneshot::Sender<Vec<NodeId>>,
    },
    Advance {
        class: ResourceClass,
        reply: oneshot::Sender<Vec<NodeId>>,
    },
    Signal {
        node: NodeId,
        signal: LoadSignal,
    },
    PollTick(ResourceClass),
    Stats {
        class: ResourceClass,
        reply: oneshot::Sender<ClassStats>,
    },
    Shutdown,
}

/// Timer that sleeps on the runtime and posts the tick back to the service.
///
/// Holds only a weak sender so outstanding ticks do not keep the service alive.
struct ChannelTimer<H, P, S> {
    spawner: S,
    tx: mpsc::WeakUnboundedSender<Command<H, P>>,
}

impl<H, P, S> PollTimer for ChannelTimer<H, P, S>
where
    H: 'static,
    P: Send + 'static,
    S: Spawn,
{
    fn schedule_poll(&mut self, class: ResourceClass, delay: Duration) {
        let tx = self.tx.clone();
        self.spawner.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::PollTick(class));
            }
        });
    }
}

/// Entry point for running a loader on a tokio runtime.
pub struct LoaderService;

impl LoaderService {
    /// Build the loader from `builder`, spawn its task and return a handle.
    ///
    /// The builder's timer is replaced by one that schedules ticks on
    /// `spawner`. The task stops once every handle is dropped or
    /// [`LoaderHandle::shutdown`] is called.
    pub fn start<H, P, S>(
        builder: LoaderBuilder<H>,
        spawner: S,
    ) -> Result<LoaderHandle<H, P>, LoaderError>
    where
        H: Host + Send + 'static,
        P: Send + 'static,
        S: Spawn + Send + 'static,
        S: Clone,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let timer = ChannelTimer {
            spawner: spawner.clone(),
            tx: tx.downgrade(),
        };
        let loader = builder.timer(timer).build::<P>()?;
        spawner.spawn(run(loader, rx));
        Ok(LoaderHandle { tx })
    }
}

async fn run<H: Host, P>(mut loader: LazyLoader<H, P>, mut rx: mpsc::UnboundedReceiver<Command<H, P>>) {
    tracing::info!("loader service started");
    while let Some(command) = rx.recv().await {
        match command {
            Command::Submit {
                class,
                request,
                reply,
            } => {
                let _ = reply.send(loader.submit(class, request));
            }
            Command::Advance { class, reply } => {
                let _ = reply.send(loader.advance(class));
            }
            Command::Signal { node, signal } => loader.signal(node, signal),
            Command::PollTick(class) => loader.poll_tick(class),
            Command::Stats { class, reply } => {
                let _ = reply.send(loader.stats(class));
            }
            Command::Shutdown => break,
        }
    }
    tracing::info!("loader service stopped");
}

/// Cloneable handle to a running loader service.
pub struct LoaderHandle<H, P> {
    tx: mpsc::UnboundedSender<Command<H, P>>,
}

impl<H, P> Clone for LoaderHandle<H, P> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<H, P> LoaderHandle<H, P> {
    /// Load scripts; resolves to the nodes created by this submission.
    pub async fn load_code(&self, request: BatchRequest<H, P>) -> Result<Vec<NodeId>, LoaderError> {
        self.submit(ResourceClass::Code, request).await
    }

    /// Load stylesheets; resolves to the nodes created by this submission.
    pub async fn load_style(&self, request: BatchRequest<H, P>) -> Result<Vec<NodeId>, LoaderError> {
        self.submit(ResourceClass::Style, request).await
    }

    /// Submit a batch for `class`.
    pub async fn submit(
        &self,
        class: ResourceClass,
        request: BatchRequest<H, P>,
    ) -> Result<Vec<NodeId>, LoaderError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit {
            class,
            request,
            reply,
        })?;
        rx.await.map_err(|_| LoaderError::ServiceClosed)
    }

    /// Resume a halted class.
    pub async fn advance(&self, class: ResourceClass) -> Result<Vec<NodeId>, LoaderError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Advance { class, reply })?;
        rx.await.map_err(|_| LoaderError::ServiceClosed)
    }

    /// Counters of `class`.
    pub async fn stats(&self, class: ResourceClass) -> Result<ClassStats, LoaderError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Stats { class, reply })?;
        rx.await.map_err(|_| LoaderError::ServiceClosed)
    }

    /// Forward a completion signal from the host.
    pub fn signal(&self, node: NodeId, signal: LoadSignal) -> Result<(), LoaderError> {
        self.send(Command::Signal { node, signal })
    }

    /// Stop the service task after the commands already queued.
    pub fn shutdown(&self) -> Result<(), LoaderError> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command<H, P>) -> Result<(), LoaderError> {
        self.tx.send(command).map_err(|_| LoaderError::ServiceClosed)
    }
}
