//! The feed presenter: binds a question source to a list view.
//!
//! The presenter owns the row data set, a busy flag and the current page.
//! Every load request goes through a single [`FetchWorker`], so at most one
//! fetch is outstanding and pages come back in the order they were asked for.
//! Results are applied only when the host calls [`FeedPresenter::pump`] on
//! its UI thread, which is the only place rows and view state change.
//!
//! ## Lifecycle
//!
//! 1. [`new`](FeedPresenter::new) with a source, a view and a runtime handle.
//! 2. [`init`](FeedPresenter::init) once with the data set and filter.
//! 3. [`load_questions`](FeedPresenter::load_questions) /
//!    [`load_next_page`](FeedPresenter::load_next_page) from UI callbacks.
//! 4. [`clean_up`](FeedPresenter::clean_up) when the screen goes away
//!    (dropping the presenter does the same).

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};

use crate::filter::FeedFilter;
use crate::rows::{Row, RowDataSet};
use crate::source::{FetchError, PageResponse, QuestionSource};
use crate::worker::{self, Delivery, FetchWorker};

const FIRST_PAGE: u32 = 1;

/// What the presenter needs from the screen it drives.
pub trait FeedView {
    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    /// Called with exactly the rows just appended to the data set.
    fn on_questions_loaded(&mut self, rows: &[Row]);

    /// Called after a failed fetch, once sentinels have been cleared.
    fn on_load_failed(&mut self, error: &FetchError);
}

pub struct FeedPresenter<S: ?Sized, V> {
    source: Arc<S>,
    view: V,
    runtime: Handle,
    dataset: RowDataSet,
    filter: Option<FeedFilter>,
    worker: Option<FetchWorker>,
    page: u32,
    busy: bool,
}

impl<S, V> FeedPresenter<S, V>
where
    S: QuestionSource + ?Sized + 'static,
    V: FeedView,
{
    /// Create an idle presenter.  Nothing is fetched before [`init`](Self::init).
    pub fn new(source: Arc<S>, view: V, runtime: Handle) -> Self {
        Self {
            source,
            view,
            runtime,
            dataset: RowDataSet::new(),
            filter: None,
            worker: None,
            page: FIRST_PAGE,
            busy: false,
        }
    }

    /// Register `dataset`, show the loading state and start the fetch worker.
    pub fn init(&mut self, dataset: RowDataSet, filter: FeedFilter) {
        if self.worker.is_some() {
            warn!("presenter initialized twice, replacing the previous subscription");
            self.clean_up();
        }

        self.dataset = dataset;
        self.page = FIRST_PAGE;
        self.busy = false;

        self.dataset.add_row(Row::Loading);
        self.view.show_loading();

        self.worker = Some(worker::spawn(
            &self.runtime,
            Arc::clone(&self.source),
            filter.clone(),
        ));
        self.filter = Some(filter);
    }

    /// Fetch the current page unless a fetch is already outstanding.
    pub fn load_questions(&mut self) {
        debug!(filter = ?self.filter, page = self.page, "load questions");
        if self.busy {
            return;
        }
        if self.emit(self.page) {
            self.busy = true;
        }
    }

    /// Advance to the next page and fetch it unless a fetch is outstanding.
    pub fn load_next_page(&mut self) {
        debug!(filter = ?self.filter, page = self.page, "load next page");
        if self.busy {
            return;
        }
        let next = self.page + 1;
        if self.emit(next) {
            self.page = next;
            self.busy = true;
        }
    }

    /// Stop the worker and discard anything it has not delivered yet.
    /// Safe to call any number of times.
    pub fn clean_up(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel();
            debug!("feed subscription cancelled");
        }
    }

    /// Apply every delivery that is ready, without waiting.  Returns how many
    /// were applied.  Call this from the thread that owns the view.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(delivery) = self.worker.as_mut().and_then(FetchWorker::try_next) {
            self.deliver(delivery);
            applied += 1;
        }
        applied
    }

    /// Wait for the next delivery and apply it.  Returns `false` if there is
    /// no live subscription.
    #[cfg(test)]
    pub async fn deliver_next(&mut self) -> bool {
        let Some(worker) = self.worker.as_mut() else {
            return false;
        };
        match worker.next().await {
            Some(delivery) => {
                self.deliver(delivery);
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &RowDataSet {
        &self.dataset
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn filter(&self) -> Option<&FeedFilter> {
        self.filter.as_ref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// `true` between [`init`](Self::init) and [`clean_up`](Self::clean_up).
    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    fn emit(&self, page: u32) -> bool {
        match &self.worker {
            Some(worker) => worker.request(page),
            None => {
                warn!(page, "no active feed subscription, ignoring load request");
                false
            }
        }
    }

    fn deliver(&mut self, delivery: Delivery) {
        let Delivery { page, outcome } = delivery;
        self.busy = false;

        match outcome {
            Ok(response) => {
                self.view.hide_loading();
                self.handle_response(page, response);
            }
            Err(err) => {
                error!(page, error = %err, "failed to load questions");
                self.remove_sentinels();
                self.view.hide_loading();
                self.view.on_load_failed(&err);
            }
        }
    }

    fn handle_response(&mut self, page: u32, response: PageResponse) {
        debug!(page, has_more = response.has_more, "handling question response");
        self.remove_sentinels();

        let rows = rows_from_response(response);
        info!(page, rows = rows.len(), "questions loaded");

        self.dataset.add_all_rows(rows.iter().cloned());
        self.view.on_questions_loaded(&rows);
    }

    fn remove_sentinels(&mut self) {
        self.dataset.remove_loading();
        self.dataset.remove_load_more();
    }
}

/// One row per question, then `LoadMore` if the source has further pages.
/// An empty page yields no rows at all.
pub fn rows_from_response(response: PageResponse) -> Vec<Row> {
    if response.items.is_empty() {
        return Vec::new();
    }
    let has_more = response.has_more;
    let mut rows: Vec<Row> = response.items.into_iter().map(Row::Question).collect();
    if has_more {
        rows.push(Row::LoadMore);
    }
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
