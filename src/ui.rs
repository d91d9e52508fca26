//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads the rows and
//! screen state the presenter maintains; it never mutates them.
//!
//! ## For contributors
//!
//! * The layout is a two-row split: a scrollable list on top and a one-line
//!   status bar at the bottom.
//! * Each question takes three lines (headline, tags/meta, snippet); the
//!   sentinel rows take one.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::rows::Row;
use crate::source::{Question, QuestionSource};

/// Characters of body text shown under each title.
const SNIPPET_CHARS: usize = 110;

/// Draw the complete UI for one frame.
pub fn draw<S>(app: &mut App<S>, frame: &mut Frame)
where
    S: QuestionSource + ?Sized + 'static,
{
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_feed_list(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

/// Render the scrollable question list.
fn draw_feed_list<S>(app: &mut App<S>, frame: &mut Frame, area: Rect)
where
    S: QuestionSource + ?Sized + 'static,
{
    let list_items: Vec<ListItem> = app
        .presenter
        .rows()
        .rows()
        .iter()
        .map(row_item)
        .collect();

    let filter = app
        .presenter
        .filter()
        .map(|f| f.label())
        .unwrap_or_default();
    let title = format!(" {} · {} ", app.presenter.source_name(), filter);

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn row_item(row: &Row) -> ListItem<'static> {
    match row {
        Row::Question(q) => question_item(q),
        Row::Loading => ListItem::new(Line::from(Span::styled(
            "  Loading…",
            Style::default().fg(Color::Yellow),
        ))),
        Row::LoadMore => ListItem::new(Line::from(Span::styled(
            "  ── more ── (Enter)",
            Style::default().fg(Color::Cyan),
        ))),
    }
}

fn question_item(q: &Question) -> ListItem<'static> {
    let answers_style = if q.is_answered {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let headline = Line::from(vec![
        Span::styled(format!("{:>5}", q.score), Style::default().fg(Color::Yellow)),
        Span::styled(format!(" {:>3}a ", q.answer_count), answers_style),
        Span::styled(q.display_title(), Style::default().fg(Color::White)),
    ]);

    let date_str = q
        .last_activity_date
        .or(q.creation_date)
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "no date".into());
    let tags = q
        .tags
        .iter()
        .map(|t| format!("[{t}]"))
        .collect::<Vec<_>>()
        .join(" ");

    let meta = Line::from(vec![
        Span::raw("           "),
        Span::styled(tags, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(
            format!("{date_str} · {}", q.author()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let snippet = Line::from(vec![
        Span::raw("           "),
        Span::styled(
            q.snippet(SNIPPET_CHARS),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ),
    ]);

    ListItem::new(vec![headline, meta, snippet])
}

/// Render the bottom status bar.
fn draw_status_bar<S>(app: &App<S>, frame: &mut Frame, area: Rect)
where
    S: QuestionSource + ?Sized + 'static,
{
    let screen = app.presenter.view();
    let status_color = if screen.last_error.is_some() {
        Color::Red
    } else {
        Color::Yellow
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(screen.status.clone(), Style::default().fg(status_color)),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} questions · page {}",
                app.presenter.rows().question_count(),
                app.presenter.page()
            ),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  q: quit  j/k: scroll  g/G: top/bottom  Enter: open  n: next page  r: reload"),
    ]));
    frame.render_widget(status, area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
