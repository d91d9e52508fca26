//! In-memory source for presenter and worker tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use super::{make_question, FeedQuery, FetchError, PageResponse, QuestionSource};

/// Replays queued outcomes and records every query it receives.
///
/// A gated source parks each fetch until [`release`](Self::release) is
/// called, which lets tests hold a request in flight.
pub(crate) struct ScriptedSource {
    queries: Mutex<Vec<FeedQuery>>,
    outcomes: Mutex<VecDeque<Result<PageResponse, FetchError>>>,
    gate: Option<Semaphore>,
    started: Notify,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            queries: Mutex::new(Vec::new()),
            outcomes: Mutex::new(VecDeque::new()),
            gate: None,
            started: Notify::new(),
        }
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    pub fn push(&self, outcome: Result<PageResponse, FetchError>) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn push_page(&self, ids: &[u64], has_more: bool) {
        self.push(Ok(page_of(ids, has_more)));
    }

    /// Let one parked fetch complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Resolves once a fetch has started (including one that already did).
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn queries(&self) -> Vec<FeedQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuestionSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self, query: &FeedQuery) -> Result<PageResponse, FetchError> {
        self.queries.lock().unwrap().push(query.clone());
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let next = self.outcomes.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(PageResponse::default()))
    }
}

pub(crate) fn page_of(ids: &[u64], has_more: bool) -> PageResponse {
    PageResponse {
        items: ids
            .iter()
            .map(|&id| make_question(id, &format!("Q{id}")))
            .collect(),
        has_more,
        ..PageResponse::default()
    }
}
