//! Background page fetching.
//!
//! One worker task runs per presenter on the tokio runtime.  Page requests
//! arrive over a single-slot channel and are answered strictly one at a time:
//! the next request is not even read until the previous result has been
//! handed to the delivery channel.  Results therefore come back in the order
//! they were requested.
//!
//! ```text
//! request(page) ──try_send──► [1 slot] ──► fetch ──► Delivery ──► try_next()
//!   (UI thread)                            (worker task)           (UI thread)
//! ```
//!
//! ## For contributors
//!
//! The request side never blocks.  If the slot is taken the request is
//! dropped and `request()` returns `false`; callers gate on their own busy
//! flag, so this only happens on misuse.  Cancelling the worker (explicitly
//! or by dropping [`FetchWorker`]) aborts an in-flight fetch and guarantees
//! nothing further is delivered.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::filter::FeedFilter;
use crate::source::{FetchError, PageResponse, QuestionSource};

/// Pending requests the channel holds before it starts dropping.
const REQUEST_SLOTS: usize = 1;

/// The answer to one page request.
#[derive(Debug)]
pub struct Delivery {
    pub page: u32,
    pub outcome: Result<PageResponse, FetchError>,
}

/// Handle to a running worker task.
pub struct FetchWorker {
    requests: mpsc::Sender<u32>,
    deliveries: mpsc::UnboundedReceiver<Delivery>,
    cancel: CancellationToken,
}

/// Spawn a worker on `runtime` that pages through `filter` using `source`.
pub fn spawn<S>(runtime: &Handle, source: Arc<S>, filter: FeedFilter) -> FetchWorker
where
    S: QuestionSource + ?Sized + 'static,
{
    let (request_tx, request_rx) = mpsc::channel(REQUEST_SLOTS);
    let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    runtime.spawn(run(source, filter, request_rx, delivery_tx, cancel.clone()));

    FetchWorker {
        requests: request_tx,
        deliveries: delivery_rx,
        cancel,
    }
}

impl FetchWorker {
    /// Ask for `page` without blocking.  Returns `false` if the request was
    /// dropped (slot full or worker stopped).
    pub fn request(&self, page: u32) -> bool {
        match self.requests.try_send(page) {
            Ok(()) => true,
            Err(TrySendError::Full(page)) => {
                warn!(page, "request slot full, dropping page request");
                false
            }
            Err(TrySendError::Closed(page)) => {
                warn!(page, "fetch worker has stopped, dropping page request");
                false
            }
        }
    }

    /// Take a finished delivery if one is waiting.
    pub fn try_next(&mut self) -> Option<Delivery> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.deliveries.try_recv().ok()
    }

    /// Wait for the next delivery.  `None` once the worker has stopped.
    #[cfg(test)]
    pub async fn next(&mut self) -> Option<Delivery> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.deliveries.recv().await
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True once the worker task has exited and dropped its request receiver.
    #[cfg(test)]
    pub(crate) fn is_stopped(&self) -> bool {
        self.requests.is_closed()
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run<S>(
    source: Arc<S>,
    filter: FeedFilter,
    mut requests: mpsc::Receiver<u32>,
    deliveries: mpsc::UnboundedSender<Delivery>,
    cancel: CancellationToken,
) where
    S: QuestionSource + ?Sized,
{
    debug!(source = source.name(), filter = ?filter, "fetch worker started");

    loop {
        let page = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = requests.recv() => match next {
                Some(page) => page,
                None => break,
            },
        };

        let query = filter.query(page);
        debug!(?query, "fetching page");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = source.fetch(&query) => outcome,
        };

        if cancel.is_cancelled() || deliveries.send(Delivery { page, outcome }).is_err() {
            break;
        }
    }

    debug!("fetch worker stopped");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
