//! List rows and the row collection the list view displays.
//!
//! A feed is rendered from a flat list of [`Row`]s.  Besides one row per
//! question it contains *sentinel* rows that mark pipeline state: a
//! `Loading` spinner while the first page is on its way, and a trailing
//! `LoadMore` marker when the source reports further pages.

use crate::source::Question;

/// One entry in the feed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Question(Question),
    Loading,
    LoadMore,
}

impl Row {
    /// `true` for the non-data rows (`Loading`, `LoadMore`).
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Row::Question(_))
    }
}

/// Ordered rows backing the feed list.
///
/// Removal of sentinels is idempotent: removing an absent sentinel is a no-op,
/// and every instance is removed when several are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowDataSet {
    rows: Vec<Row>,
}

impl RowDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn add_all_rows(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    pub fn remove_loading(&mut self) {
        self.rows.retain(|r| *r != Row::Loading);
    }

    pub fn remove_load_more(&mut self) {
        self.rows.retain(|r| *r != Row::LoadMore);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows, ignoring sentinels.
    pub fn question_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_sentinel()).count()
    }

    pub fn has_load_more(&self) -> bool {
        self.rows.contains(&Row::LoadMore)
    }
}
