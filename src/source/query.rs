//! Source-agnostic description of one page request.

/// Sort direction requested from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Desc => "desc",
        }
    }
}

/// Which set of questions a query walks through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    /// Questions asked by one user.
    User { user_id: u64, sort: String },
    /// Every question on the site.
    All { sort: String },
}

impl QueryScope {
    /// The sort key (`activity`, `votes`, `hot`, ...).
    pub fn sort(&self) -> &str {
        match self {
            QueryScope::User { sort, .. } | QueryScope::All { sort } => sort,
        }
    }
}

/// A single page request handed to a [`QuestionSource`](super::QuestionSource).
///
/// Pages are 1-based, matching the Stack Exchange API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub scope: QueryScope,
    pub order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}
