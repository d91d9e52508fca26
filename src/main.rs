//! stackfeed — page through a Stack Exchange question feed in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ request(page) ┌───────────┐  fetch()  ┌──────────────┐
//! │ presenter │ ────────────► │ worker.rs │ ────────► │   source/    │
//! │  (rows)   │ ◄──────────── │  (task)   │ ◄──────── │ (HTTP, JSON) │
//! └───────────┘   Delivery    └───────────┘           └──────────────┘
//!       ▲  pump() each tick
//!       │
//! ┌───────────┐   draw()   ┌──────────┐
//! │  app.rs   │ ─────────► │  ui.rs   │
//! └───────────┘            └──────────┘
//!       ▲ handle_key_event()
//! ┌───────────┐
//! │ input.rs  │
//! └───────────┘
//! ```
//!
//! * **`source/`** — the `QuestionSource` trait, the data model, and the
//!   Stack Exchange implementation.
//! * **`filter`** — which feed to page through and its query shape.
//! * **`rows`** — list rows and the row data set.
//! * **`worker`** — the single-slot request channel and sequential fetch loop.
//! * **`presenter`** — busy flag, paging, and mapping pages to rows.
//! * **`app`** — the feed screen (view) plus selection state.
//! * **`ui`** — pure rendering.
//! * **`input`** — maps key events to `App` actions.
//! * **`config`** / **`logging`** — environment, arguments, log file.
//! * **`main`** — wires everything together and runs the event loop.

mod app;
mod config;
mod filter;
mod input;
mod logging;
mod presenter;
mod rows;
mod source;
mod ui;
mod worker;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::{App, FeedScreen};
use config::FeedConfig;
use presenter::FeedPresenter;
use source::StackExchangeSource;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    if std::env::args().skip(1).any(|a| a == "-h" || a == "--help") {
        println!("{}", config::USAGE);
        return Ok(());
    }

    // -- configuration and logging -------------------------------------------
    let config = FeedConfig::from_env()?;
    logging::init(&config.log_path)?;
    info!(filter = ?config.filter, site = %config.api.site, "starting stackfeed");

    // -- background runtime for network I/O ----------------------------------
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("stackfeed-io")
        .enable_all()
        .build()
        .context("could not start the async runtime")?;

    let source = Arc::new(
        StackExchangeSource::new(config.api.clone()).context("could not build the HTTP client")?,
    );
    let presenter = FeedPresenter::new(source, FeedScreen::default(), runtime.handle().clone());
    let mut app = App::new(presenter);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    app.start(config.filter);

    // -- main event loop -----------------------------------------------------
    // Each ~100 ms tick:
    //   1. Apply any finished fetches (the only place rows change).
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.tick();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    app.presenter.clean_up();
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(1));
    info!("stackfeed exited");
    Ok(())
}
