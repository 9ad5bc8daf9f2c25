use crate::data::filter::FilterSelection;
use crate::data::model::{TripRecord, TripTable};

/// Rows shown per page when browsing raw data.
pub const PAGE_SIZE: usize = 5;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// State of one round of the shell, independent of rendering.
#[derive(Debug, Default)]
pub struct Session {
    /// The city/month/day the current table was loaded with.
    pub selection: Option<FilterSelection>,

    /// Loaded and filtered trips (None until a load succeeds).
    pub table: Option<TripTable>,

    /// Index of the first raw row not shown yet.
    pub next_row: usize,
}

impl Session {
    /// Ingest a freshly loaded table and rewind the raw-row cursor.
    pub fn set_table(&mut self, selection: FilterSelection, table: TripTable) {
        self.selection = Some(selection);
        self.table = Some(table);
        self.next_row = 0;
    }

    /// Forget the current round.
    pub fn reset(&mut self) {
        *self = Session::default();
    }

    /// Whether there are raw rows left to show.
    pub fn has_more_rows(&self) -> bool {
        self.table
            .as_ref()
            .is_some_and(|table| self.next_row < table.len())
    }

    /// The next page of up to [`PAGE_SIZE`] rows, advancing the cursor.
    /// Returns the index of the first row along with the rows.
    pub fn next_page(&mut self) -> (usize, &[TripRecord]) {
        let Some(table) = &self.table else {
            return (0, &[]);
        };
        let start = self.next_row.min(table.len());
        let end = (start + PAGE_SIZE).min(table.len());
        self.next_row = end;
        (start, table.trips().get(start..end).unwrap_or_default())
    }
}
