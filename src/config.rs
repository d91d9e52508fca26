//! Runtime configuration.
//!
//! The feed filter comes from the command line (everything after the program
//! name, joined with spaces, so `stackfeed my feed` works unquoted).  API and
//! logging settings come from the environment:
//!
//! | Variable                 | Default                              |
//! |--------------------------|--------------------------------------|
//! | `STACKFEED_SITE`         | `stackoverflow`                      |
//! | `STACKFEED_USER_ID`      | none (required for `my feed`)        |
//! | `STACKFEED_KEY`          | none                                 |
//! | `STACKFEED_API_URL`      | `https://api.stackexchange.com/2.3`  |
//! | `STACKFEED_TIMEOUT_SECS` | `30`                                 |
//! | `STACKFEED_LOG`          | `stackfeed.log`                      |

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::filter::FeedFilter;
use crate::source::ApiSettings;

pub const DEFAULT_FILTER: &str = "activity";
pub const DEFAULT_LOG_FILE: &str = "stackfeed.log";

pub const USAGE: &str = "\
usage: stackfeed [FILTER]

FILTER is a sort key for the site-wide feed (activity, votes, creation,
hot, week, month) or \"my feed\" for your own questions, which needs
STACKFEED_USER_ID. Defaults to \"activity\".

keys: j/k or arrows move, g/G jump, Enter opens \"more\", n next page,
      r reload, q quit";

/// Everything `main` needs to wire the application together.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub filter: FeedFilter,
    pub api: ApiSettings,
    pub log_path: PathBuf,
}

impl FeedConfig {
    /// Read the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Build a config from explicit arguments (without the program name) and
    /// an environment lookup.
    pub fn from_sources<I, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let joined = args.into_iter().collect::<Vec<_>>().join(" ");
        let filter_name = if joined.trim().is_empty() {
            DEFAULT_FILTER.to_string()
        } else {
            joined
        };

        let user_id = lookup("STACKFEED_USER_ID")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("STACKFEED_USER_ID is not a user id: {raw:?}"))
            })
            .transpose()?;

        let filter = FeedFilter::parse(&filter_name, user_id)?;

        let mut api = ApiSettings::default();
        if let Some(site) = lookup("STACKFEED_SITE") {
            api.site = site;
        }
        if let Some(url) = lookup("STACKFEED_API_URL") {
            api.base_url = url;
        }
        api.key = lookup("STACKFEED_KEY");
        if let Some(raw) = lookup("STACKFEED_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("STACKFEED_TIMEOUT_SECS is not a number: {raw:?}"))?;
            if secs == 0 {
                bail!("STACKFEED_TIMEOUT_SECS must be at least 1");
            }
            api.timeout = Duration::from_secs(secs);
        }

        let log_path = lookup("STACKFEED_LOG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self {
            filter,
            api,
            log_path,
        })
    }
}
