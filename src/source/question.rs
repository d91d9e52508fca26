//! The data types returned by every question source.
//!
//! `Question` and `PageResponse` mirror the Stack Exchange wire objects closely
//! enough to be deserialized directly with `serde`, but nothing outside
//! [`super::stack_exchange`] depends on where they came from.
//!
//! ## For contributors
//!
//! Bodies and titles arrive HTML-encoded.  Use [`Question::display_title`] and
//! [`Question::snippet`] when rendering instead of the raw fields.

use chrono::{DateTime, Utc};
use html2text::render::text_renderer::TrivialDecorator;
use serde::Deserialize;

/// A single question, as listed in a feed page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    /// Site-unique question id.
    #[serde(rename = "question_id")]
    pub id: u64,

    /// Raw (HTML-escaped) title.
    pub title: String,

    /// Raw HTML body.  Only present when the request asked for it.
    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub score: i64,

    #[serde(default)]
    pub answer_count: u32,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Canonical URL of the question page.
    #[serde(default)]
    pub link: Option<String>,

    /// Whether the question has an accepted or upvoted answer.
    #[serde(default)]
    pub is_answered: bool,

    #[serde(default)]
    pub view_count: u64,

    #[serde(default)]
    pub owner: Option<Owner>,

    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub creation_date: Option<DateTime<Utc>>,

    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub last_activity_date: Option<DateTime<Utc>>,
}

/// The author of a question.  Deleted users come back without a name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One page of questions plus the paging flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub items: Vec<Question>,

    /// `true` when another page exists after this one.
    #[serde(default)]
    pub has_more: bool,

    #[serde(default)]
    pub quota_remaining: Option<u32>,

    /// Seconds the API asks us to wait before hitting the same method again.
    #[serde(default)]
    pub backoff: Option<u64>,
}

impl Question {
    /// Title as plain text, with HTML entities decoded.
    pub fn display_title(&self) -> String {
        html_to_text(&self.title)
    }

    /// Plain-text excerpt of the body, at most `max_chars` characters plus an
    /// ellipsis when truncated.
    pub fn snippet(&self, max_chars: usize) -> String {
        truncate_chars(&html_to_text(&self.body), max_chars)
    }

    /// Owner display name, or a placeholder for deleted/anonymous users.
    pub fn author(&self) -> String {
        self.owner
            .as_ref()
            .and_then(|o| o.display_name.as_deref())
            .map(html_to_text)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "(anonymous)".into())
    }
}

// ---------------------------------------------------------------------------
// HTML helpers
// ---------------------------------------------------------------------------

/// Renderer width; wide enough that titles and names never wrap.
const RENDER_WIDTH: usize = 1_000;

/// Render an HTML fragment to a single line of plain text.
///
/// The trivial decorator keeps `<code>`/`<em>` free of markdown markers and
/// links free of footnotes, which would only clutter a one-line excerpt.
fn html_to_text(html: &str) -> String {
    let text = html2text::from_read_with_decorator(
        html.as_bytes(),
        RENDER_WIDTH,
        TrivialDecorator::new(),
    );
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
