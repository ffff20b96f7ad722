//! Batch submissions and their completion callbacks.

use crate::core::{BatchId, Flow, LazyLoader, ProgressSnapshot, UrlList};

/// Completion callback of a batch.
///
/// Receives the loader (for reentrant submissions), the batch payload and a
/// progress snapshot. Its return value decides whether the class queue keeps
/// advancing.
pub type BatchCallback<H, P> =
    Box<dyn FnOnce(&mut LazyLoader<H, P>, Option<P>, &ProgressSnapshot) -> Flow + Send>;

/// A caller's request to load an ordered group of URLs.
///
/// ```rust,ignore
/// let nodes = loader.load_code(
///     BatchRequest::new(["vendor.js", "app.js"])
///         .with_payload("boot")
///         .on_complete(|_loader, payload, snapshot| {
///             tracing::info!(?payload, done = snapshot.done_count, "scripts ready");
///             snapshot.is_last()
///         }),
/// );
/// ```
pub struct BatchRequest<H, P> {
    pub(crate) urls: UrlList,
    pub(crate) callback: Option<BatchCallback<H, P>>,
    pub(crate) payload: Option<P>,
    pub(crate) insert_at_head: bool,
}

impl<H, P> BatchRequest<H, P> {
    /// Request for the given URLs with no callback, appended to the queue tail.
    pub fn new(urls: impl Into<UrlList>) -> Self {
        Self {
            urls: urls.into(),
            callback: None,
            payload: None,
            insert_at_head: false,
        }
    }

    /// Run `callback` once, after every URL of the batch finished.
    ///
    /// The callback may return [`Flow`], a `bool` (`true` halts) or `()`.
    #[must_use]
    pub fn on_complete<F, R>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut LazyLoader<H, P>, Option<P>, &ProgressSnapshot) -> R + Send + 'static,
        R: Into<Flow>,
    {
        self.callback = Some(Box::new(move |loader, payload, snapshot| {
            callback(loader, payload, snapshot).into()
        }));
        self
    }

    /// Attach an opaque payload handed back to the callback.
    #[must_use]
    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Queue ahead of every waiting batch instead of behind them.
    ///
    /// Meant for callbacks that submit follow-up work: the children finish
    /// before the next sibling starts. The in-flight batch is never overtaken.
    #[must_use]
    pub fn insert_at_head(mut self) -> Self {
        self.insert_at_head = true;
        self
    }

    /// URLs of the request as submitted.
    #[must_use]
    pub const fn urls(&self) -> &UrlList {
        &self.urls
    }
}

impl<H, P> std::fmt::Debug for BatchRequest<H, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRequest")
            .field("urls", &self.urls)
            .field("has_callback", &self.callback.is_some())
            .field("has_payload", &self.payload.is_some())
            .field("insert_at_head", &self.insert_at_head)
            .finish()
    }
}

/// A normalized, queued batch.
pub(crate) struct Batch<H, P> {
    pub id: BatchId,
    pub urls: Vec<String>,
    pub callback: Option<BatchCallback<H, P>>,
    pub payload: Option<P>,
}

impl<H, P> Batch<H, P> {
    pub fn new(urls: Vec<String>, callback: Option<BatchCallback<H, P>>, payload: Option<P>) -> Self {
        Self {
            id: BatchId::new(),
            urls,
            callback,
            payload,
        }
    }
}
