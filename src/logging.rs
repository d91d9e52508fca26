//! Log setup.
//!
//! The terminal belongs to the UI, so `tracing` output goes to a file.  The
//! level comes from `STACKFEED_LOG_LEVEL` (any `EnvFilter` directive, e.g.
//! `debug` or `stackfeed=trace`) and defaults to `info`.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const LEVEL_ENV: &str = "STACKFEED_LOG_LEVEL";
const DEFAULT_LEVEL: &str = "info";

/// Install the global subscriber, truncating the log file at `path`.
pub fn init(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_env(LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("could not install the logger: {err}"))
}
