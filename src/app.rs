use ratatui::widgets::ListState;

use crate::filter::FeedFilter;
use crate::presenter::{FeedPresenter, FeedView};
use crate::rows::{Row, RowDataSet};
use crate::source::{FetchError, Question, QuestionSource};

/// The feed screen as seen by the presenter.
#[derive(Debug, Default)]
pub struct FeedScreen {
    /// Whether the first-page spinner is showing.
    pub loading: bool,
    /// Last status message for the status bar.
    pub status: String,
    /// Questions received since start-up.
    pub loaded: usize,
    /// Text of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

impl FeedView for FeedScreen {
    fn show_loading(&mut self) {
        self.loading = true;
        self.status = "Loading…".into();
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn on_questions_loaded(&mut self, rows: &[Row]) {
        let count = rows.iter().filter(|r| !r.is_sentinel()).count();
        self.loaded += count;
        self.last_error = None;
        self.status = if count == 0 {
            "No more questions".into()
        } else {
            format!("Loaded {count} questions")
        };
    }

    fn on_load_failed(&mut self, error: &FetchError) {
        self.last_error = Some(error.to_string());
        self.status = format!("Error: {error}  (r: retry)");
    }
}

pub struct App<S: ?Sized> {
    pub presenter: FeedPresenter<S, FeedScreen>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
}

impl<S> App<S>
where
    S: QuestionSource + ?Sized + 'static,
{
    pub fn new(presenter: FeedPresenter<S, FeedScreen>) -> Self {
        Self {
            presenter,
            list_state: ListState::default(),
            quit: false,
        }
    }

    /// Initialize the presenter and ask for the first page.
    pub fn start(&mut self, filter: FeedFilter) {
        self.presenter.init(RowDataSet::new(), filter);
        self.presenter.load_questions();
    }

    /// Apply finished fetches.  Called once per UI tick.
    pub fn tick(&mut self) -> usize {
        let applied = self.presenter.pump();
        if applied > 0 && self.list_state.selected().is_none() {
            self.select_first();
        }
        applied
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.list_state
            .selected()
            .and_then(|i| self.presenter.rows().get(i))
    }

    pub fn selected_question(&self) -> Option<&Question> {
        match self.selected_row() {
            Some(Row::Question(q)) => Some(q),
            _ => None,
        }
    }

    // -- actions ---------------------------------------------------------------

    /// Act on the selected row: a `LoadMore` row fetches the next page, a
    /// question shows its link in the status bar.
    pub fn activate(&mut self) {
        if matches!(self.selected_row(), Some(Row::LoadMore)) {
            self.next_page();
            return;
        }
        let Some(q) = self.selected_question() else {
            return;
        };
        let status = match &q.link {
            Some(link) => format!("{} ({} views)", link, q.view_count),
            None => format!("question {} has no link", q.id),
        };
        self.presenter.view_mut().status = status;
    }

    /// Re-request the current page, e.g. after a failure.
    pub fn refresh(&mut self) {
        self.presenter.load_questions();
        if self.presenter.is_busy() {
            let page = self.presenter.page();
            self.presenter.view_mut().status = format!("Reloading page {page}…");
        }
    }

    pub fn next_page(&mut self) {
        if !self.presenter.rows().has_load_more() {
            return;
        }
        let was_busy = self.presenter.is_busy();
        self.presenter.load_next_page();
        if !was_busy && self.presenter.is_busy() {
            let page = self.presenter.page();
            self.presenter.view_mut().status = format!("Loading page {page}…");
        }
    }

    // -- navigation ------------------------------------------------------------

    pub fn select_next(&mut self) {
        let len = self.presenter.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_previous(&mut self) {
        if self.presenter.rows().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.select(i);
    }

    pub fn select_first(&mut self) {
        if !self.presenter.rows().is_empty() {
            self.select(0);
        }
    }

    pub fn select_last(&mut self) {
        let len = self.presenter.rows().len();
        if len > 0 {
            self.select(len - 1);
        }
    }

    /// Reaching the `LoadMore` row pulls in the next page.
    fn select(&mut self, index: usize) {
        self.list_state.select(Some(index));
        if matches!(self.selected_row(), Some(Row::LoadMore)) {
            self.next_page();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use std::sync::Arc;
    use tokio::runtime::Handle;

    fn make_app(source: &Arc<ScriptedSource>) -> App<ScriptedSource> {
        App::new(FeedPresenter::new(
            Arc::clone(source),
            FeedScreen::default(),
            Handle::current(),
        ))
    }

    fn general() -> FeedFilter {
        FeedFilter::General {
            sort: "activity".into(),
        }
    }

    // -- screen ----------------------------------------------------------------

    #[test]
    fn screen_counts_only_question_rows() {
        let mut screen = FeedScreen::default();
        screen.show_loading();
        assert!(screen.loading);

        screen.hide_loading();
        screen.on_questions_loaded(&crate::presenter::rows_from_response(
            crate::source::page_of(&[1, 2], true),
        ));
        assert!(!screen.loading);
        assert_eq!(screen.loaded, 2);
        assert_eq!(screen.status, "Loaded 2 questions");
    }

    #[test]
    fn screen_reports_failure_until_next_success() {
        let mut screen = FeedScreen::default();
        screen.on_load_failed(&FetchError::Timeout);
        assert_eq!(screen.last_error.as_deref(), Some("request timed out"));
        assert!(screen.status.contains("retry"));

        screen.on_questions_loaded(&[]);
        assert!(screen.last_error.is_none());
        assert_eq!(screen.status, "No more questions");
    }

    // -- app -------------------------------------------------------------------

    #[tokio::test]
    async fn start_shows_loading_row_and_requests_first_page() {
        let source = Arc::new(ScriptedSource::gated());
        let mut app = make_app(&source);

        app.start(general());
        source.wait_started().await;

        assert_eq!(app.presenter.rows().rows(), &[Row::Loading]);
        assert!(app.presenter.view().loading);
        assert!(app.presenter.is_busy());
        assert_eq!(source.queries()[0].page, 1);
    }

    #[tokio::test]
    async fn tick_applies_results_and_selects_first_row() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(&[1, 2], true);
        let mut app = make_app(&source);

        app.start(general());
        let mut applied = 0;
        for _ in 0..100 {
            applied += app.tick();
            if applied > 0 {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(applied, 1);
        assert_eq!(app.list_state.selected(), Some(0));
        assert_eq!(app.selected_question().map(|q| q.id), Some(1));
        assert!(!app.presenter.view().loading);
    }

    #[tokio::test]
    async fn scrolling_onto_load_more_requests_next_page() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(&[1, 2], true);
        source.push_page(&[3], false);
        let mut app = make_app(&source);

        app.start(general());
        app.presenter.deliver_next().await;

        app.select_first();
        app.select_next();
        assert_eq!(app.presenter.page(), 1, "still on a question row");

        app.select_next();
        assert_eq!(app.selected_row(), Some(&Row::LoadMore));
        assert_eq!(app.presenter.page(), 2);
        assert!(app.presenter.is_busy());
        assert_eq!(app.presenter.view().status, "Loading page 2…");

        app.presenter.deliver_next().await;
        assert_eq!(app.presenter.rows().question_count(), 3);
        assert!(!app.presenter.rows().has_load_more());
    }

    #[tokio::test]
    async fn next_page_without_load_more_row_is_ignored() {
        let source = Arc::new(ScriptedSource::new());
        source.push_page(&[1], false);
        let mut app = make_app(&source);

        app.start(general());
        app.presenter.deliver_next().await;
        app.next_page();
        app.select_last();
        app.activate();

        assert_eq!(app.presenter.page(), 1);
        assert!(!app.presenter.is_busy());
    }

    #[tokio::test]
    async fn refresh_retries_after_failure() {
        let source = Arc::new(ScriptedSource::new());
        source.push(Err(FetchError::Status(500)));
        source.push_page(&[4], false);
        let mut app = make_app(&source);

        app.start(general());
        app.presenter.deliver_next().await;
        assert!(app.presenter.view().last_error.is_some());
        assert!(app.presenter.rows().is_empty());

        app.refresh();
        assert_eq!(app.presenter.view().status, "Reloading page 1…");
        app.presenter.deliver_next().await;

        assert_eq!(app.presenter.rows().question_count(), 1);
        assert!(app.presenter.view().last_error.is_none());
    }

    #[tokio::test]
    async fn activating_a_question_shows_its_link() {
        let source = Arc::new(ScriptedSource::new());
        let mut page = crate::source::page_of(&[8], false);
        page.items[0].link = Some("https://stackoverflow.com/q/8".into());
        page.items[0].view_count = 31;
        source.push(Ok(page));
        let mut app = make_app(&source);

        app.start(general());
        app.presenter.deliver_next().await;
        app.select_first();
        app.activate();

        assert_eq!(
            app.presenter.view().status,
            "https://stackoverflow.com/q/8 (31 views)"
        );
    }

    #[test]
    fn navigation_on_empty_list_is_noop() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let source = Arc::new(ScriptedSource::new());
        let mut app = App::new(FeedPresenter::new(
            source,
            FeedScreen::default(),
            runtime.handle().clone(),
        ));

        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }
}
