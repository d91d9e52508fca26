//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `ui::draw_status_bar` and `config::USAGE`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;
use crate::source::QuestionSource;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event<S>(app: &mut App<S>, key: KeyEvent)
where
    S: QuestionSource + ?Sized + 'static,
{
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Enter => app.activate(),
        KeyCode::Char('n') => app.next_page(),
        KeyCode::Char('r') => app.refresh(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FeedScreen;
    use crate::filter::FeedFilter;
    use crate::presenter::FeedPresenter;
    use crate::source::ScriptedSource;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn keys_drive_navigation_and_paging() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(&[1, 2], true);
        let mut app = App::new(FeedPresenter::new(
            Arc::clone(&source),
            FeedScreen::default(),
            Handle::current(),
        ));
        app.start(FeedFilter::General {
            sort: "activity".into(),
        });
        app.presenter.deliver_next().await;

        handle_key_event(&mut app, press(KeyCode::Char('j')));
        assert_eq!(app.list_state.selected(), Some(0));

        handle_key_event(&mut app, press(KeyCode::Char('n')));
        assert_eq!(app.presenter.page(), 2);

        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);
    }

    #[tokio::test]
    async fn release_events_are_ignored() {
        let source = Arc::new(ScriptedSource::new());
        let mut app = App::new(FeedPresenter::new(
            source,
            FeedScreen::default(),
            Handle::current(),
        ));

        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }
}
