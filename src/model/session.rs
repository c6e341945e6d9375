use super::record::ProjectRecord;

/// Which completion partition is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    Current,
    Completed,
}

/// Mutable session state: the full record list plus the derived view
/// controls. Owned by the host and passed into every operation so nothing
/// lives in ambient scope.
#[derive(Debug, Default)]
pub struct Session {
    records: Vec<ProjectRecord>,
    filter: Filter,
    search_query: String,
    selected: usize,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&ProjectRecord> {
        self.records.get(index)
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut ProjectRecord> {
        self.records.get_mut(index)
    }

    /// Replace the full record list after a scan. The swap is a single
    /// assignment; consumers never observe a partial list. Resets the
    /// selection cursor.
    pub fn replace_records(&mut self, records: Vec<ProjectRecord>) {
        self.records = records;
        self.selected = 0;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
        self.selected = 0;
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Set the free-text query (trimmed, lowercased). Resets the cursor.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.trim().to_lowercase();
        self.selected = 0;
    }

    /// Indices of records in the active completion partition.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let completed = self.filter == Filter::Completed;
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.completed == completed)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Move the cursor, clamped to `[0, filtered.len() - 1]`.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.filtered_indices().len();
        if len == 0 {
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, len as isize - 1) as usize;
    }

    /// Index of the first record with the given id, searching current
    /// records before completed ones only by list order.
    pub fn find(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Index of the record with the given full identity key.
    pub fn find_by_key(&self, key: &str) -> Option<usize> {
        self.records.iter().position(|r| r.key() == key)
    }
}
