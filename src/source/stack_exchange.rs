//! Stack Exchange REST API source.
//!
//! Implements [`QuestionSource`] on top of the public `/2.3` API using an
//! async [`reqwest::Client`].  The general feed maps to `/questions`, the
//! user-scoped feed to `/users/{id}/questions`.
//!
//! The API always answers with a JSON wrapper object.  On success it holds
//! `items` and `has_more`; on failure `error_id`, `error_name` and
//! `error_message`.  Both shapes are decoded here so the rest of the
//! application only ever sees [`PageResponse`] or [`FetchError`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{FeedQuery, FetchError, PageResponse, QueryScope, QuestionSource};

pub const DEFAULT_API_URL: &str = "https://api.stackexchange.com/2.3";
pub const DEFAULT_SITE: &str = "stackoverflow";

/// Built-in API filter that adds `body` to each question.
const BODY_FILTER: &str = "withbody";

/// Connection settings for [`StackExchangeSource`].
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// API root, without a trailing slash (e.g. `https://api.stackexchange.com/2.3`).
    pub base_url: String,
    /// Site parameter (`stackoverflow`, `superuser`, ...).
    pub site: String,
    /// Optional app key; raises the daily quota.
    pub key: Option<String>,
    pub timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            site: DEFAULT_SITE.to_string(),
            key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error_id: u32,
    error_name: String,
    error_message: String,
}

/// A question source backed by the Stack Exchange API.
pub struct StackExchangeSource {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl StackExchangeSource {
    /// Build a source with its own HTTP client.
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("stackfeed/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .gzip(true)
            .build()?;
        Ok(Self { client, settings })
    }

    /// Full URL of the method serving `scope`.
    pub fn endpoint(&self, scope: &QueryScope) -> String {
        let base = self.settings.base_url.trim_end_matches('/');
        match scope {
            QueryScope::User { user_id, .. } => format!("{base}/users/{user_id}/questions"),
            QueryScope::All { .. } => format!("{base}/questions"),
        }
    }

    /// Query-string parameters for `query`.
    pub fn query_params(&self, query: &FeedQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("order", query.order.as_str().to_string()),
            ("sort", query.scope.sort().to_string()),
            ("site", self.settings.site.clone()),
            ("page", query.page.to_string()),
            ("pagesize", query.page_size.to_string()),
            ("filter", BODY_FILTER.to_string()),
        ];
        if let Some(key) = &self.settings.key {
            params.push(("key", key.clone()));
        }
        params
    }

    /// Decode a successful response body.
    ///
    /// Pure (no I/O) so tests can exercise decoding without a server.
    pub fn parse_page(body: &[u8]) -> Result<PageResponse, FetchError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Decode a non-2xx response, preferring the API's own error wrapper.
    fn parse_error(status: u16, body: &[u8]) -> FetchError {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(err) => FetchError::Api {
                id: err.error_id,
                name: err.error_name,
                message: err.error_message,
            },
            Err(_) => FetchError::Status(status),
        }
    }
}

#[async_trait]
impl QuestionSource for StackExchangeSource {
    fn name(&self) -> &str {
        &self.settings.site
    }

    async fn fetch(&self, query: &FeedQuery) -> Result<PageResponse, FetchError> {
        let url = self.endpoint(&query.scope);
        debug!(%url, page = query.page, page_size = query.page_size, "requesting questions");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(query))
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Self::parse_error(status.as_u16(), &body));
        }

        let page = Self::parse_page(&body)?;
        if let Some(secs) = page.backoff {
            warn!(secs, "API requested backoff before the next call");
        }
        debug!(
            items = page.items.len(),
            has_more = page.has_more,
            quota_remaining = ?page.quota_remaining,
            "page received"
        );
        Ok(page)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
