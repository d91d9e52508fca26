//! Remote question source abstraction.
//!
//! This module defines the [`QuestionSource`] trait, the [`FeedQuery`] that
//! describes one page request, and the [`FetchError`] every source reports.
//! The concrete Stack Exchange client lives in [`stack_exchange`].
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `cache.rs`).
//! 2. Define a struct and implement [`QuestionSource`] for it.
//! 3. Add `mod cache;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of [`StackExchangeSource`].
//!
//! The presenter, worker and UI are all source-agnostic.

mod query;
mod question;
#[cfg(test)]
mod scripted;
mod stack_exchange;

pub use query::{FeedQuery, QueryScope, SortOrder};
pub use question::{PageResponse, Question};
pub use stack_exchange::{ApiSettings, StackExchangeSource};

#[cfg(test)]
pub(crate) use question::tests::make_question;
#[cfg(test)]
pub(crate) use scripted::{page_of, ScriptedSource};

use async_trait::async_trait;

/// Why a page could not be fetched.
///
/// This is the only failure the presenter models: it is logged, shown by the
/// view, and never propagated further.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    /// The API answered with its structured error wrapper.
    #[error("API error {id} ({name}): {message}")]
    Api {
        id: u32,
        name: String,
        message: String,
    },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Trait that every question source must implement.
///
/// [`fetch()`](QuestionSource::fetch) is awaited on the background worker
/// task, so implementations must be [`Send`] + [`Sync`].
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// #[async_trait]
/// impl QuestionSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn fetch(&self, query: &FeedQuery) -> Result<PageResponse, FetchError> {
///         // Perform HTTP / IO, then build a PageResponse.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable label shown in the status bar.
    fn name(&self) -> &str;

    /// Fetch exactly one page described by `query`.
    async fn fetch(&self, query: &FeedQuery) -> Result<PageResponse, FetchError>;
}
