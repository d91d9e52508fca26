//! Feed selection: which query shape a presenter pages through.

use anyhow::{bail, Result};

use crate::source::{FeedQuery, QueryScope, SortOrder};

/// Page size for the user-scoped feed.
pub const MY_FEED_PAGE_SIZE: u32 = 10;
/// Page size for the site-wide feed.
pub const GENERAL_PAGE_SIZE: u32 = 20;

/// Sort key used by the user-scoped feed.
const MY_FEED_SORT: &str = "activity";

/// The filter chosen when a presenter is initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedFilter {
    /// Questions asked by the signed-in user, most recently active first.
    MyFeed { user_id: u64 },
    /// Site-wide questions ordered by `sort` (`activity`, `votes`, `hot`, ...).
    General { sort: String },
}

impl FeedFilter {
    /// Interpret a filter name.
    ///
    /// `my feed`, `my-feed` and `myfeed` (any case) select the user feed and
    /// need `user_id`; anything else is taken as a site-wide sort key.
    pub fn parse(name: &str, user_id: Option<u64>) -> Result<Self> {
        let normalized = name.trim().to_lowercase();
        match normalized.as_str() {
            "" => bail!("filter name is empty"),
            "my feed" | "my-feed" | "myfeed" => match user_id {
                Some(user_id) => Ok(FeedFilter::MyFeed { user_id }),
                None => bail!("the my-feed filter needs a user id (set STACKFEED_USER_ID)"),
            },
            _ => Ok(FeedFilter::General { sort: normalized }),
        }
    }

    pub fn page_size(&self) -> u32 {
        match self {
            FeedFilter::MyFeed { .. } => MY_FEED_PAGE_SIZE,
            FeedFilter::General { .. } => GENERAL_PAGE_SIZE,
        }
    }

    /// Query for `page` (1-based).  Both shapes sort descending.
    pub fn query(&self, page: u32) -> FeedQuery {
        let scope = match self {
            FeedFilter::MyFeed { user_id } => QueryScope::User {
                user_id: *user_id,
                sort: MY_FEED_SORT.to_string(),
            },
            FeedFilter::General { sort } => QueryScope::All { sort: sort.clone() },
        };
        FeedQuery {
            scope,
            order: SortOrder::Desc,
            page,
            page_size: self.page_size(),
        }
    }

    /// Short label for the UI title.
    pub fn label(&self) -> String {
        match self {
            FeedFilter::MyFeed { .. } => "my feed".to_string(),
            FeedFilter::General { sort } => sort.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_my_feed_aliases_case_insensitively() {
        for name in ["my feed", "My Feed", "MY-FEED", "myfeed"] {
            assert_eq!(
                FeedFilter::parse(name, Some(9)).unwrap(),
                FeedFilter::MyFeed { user_id: 9 },
                "{name}"
            );
        }
    }

    #[test]
    fn my_feed_without_user_is_rejected() {
        let err = FeedFilter::parse("my feed", None).unwrap_err();
        assert!(err.to_string().contains("STACKFEED_USER_ID"));
    }

    #[test]
    fn other_names_are_sort_keys() {
        assert_eq!(
            FeedFilter::parse(" Votes ", None).unwrap(),
            FeedFilter::General {
                sort: "votes".into()
            }
        );
        assert!(FeedFilter::parse("  ", None).is_err());
    }

    #[test]
    fn general_query_uses_sort_and_twenty_per_page() {
        let filter = FeedFilter::General {
            sort: "hot".into(),
        };
        let query = filter.query(1);
        assert_eq!(query.scope, QueryScope::All { sort: "hot".into() });
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
    }

    #[test]
    fn my_feed_query_is_user_scoped_by_activity() {
        let query = FeedFilter::MyFeed { user_id: 42 }.query(2);
        assert_eq!(
            query.scope,
            QueryScope::User {
                user_id: 42,
                sort: "activity".into()
            }
        );
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 10);
    }
}
