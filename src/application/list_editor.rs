// List editor - ordered record list with a single selection
use crate::domain::record::{new_record_id, Record, RecordId, RecordPatch};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// In-memory list backing a section screen.
///
/// Selection invariant: whenever the active view is non-empty the selection
/// points at one of its records; when it is empty nothing is selected.
#[derive(Debug, Clone, Default)]
pub struct ListEditor {
    records: Vec<Record>,
    selected: Option<RecordId>,
    editor_open: bool,
    desk: Option<String>,
    /// Canonical desk names the list may be scoped to.
    desks: &'static [&'static str],
}

impl ListEditor {
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_desks(records, &[])
    }

    pub fn with_desks(records: Vec<Record>, desks: &'static [&'static str]) -> Self {
        let mut editor = Self {
            records,
            desks,
            ..Self::default()
        };
        editor.reconcile_selection();
        editor
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records visible under the current desk filter, in display order.
    pub fn active(&self) -> Vec<&Record> {
        self.records.iter().filter(|r| self.in_view(r)).collect()
    }

    /// Selected id, or "" when nothing is selected.
    pub fn selected_id(&self) -> &str {
        self.selected.as_deref().unwrap_or("")
    }

    pub fn selected(&self) -> Option<&Record> {
        let id = self.selected.as_deref()?;
        self.records.iter().find(|r| r.id == id)
    }

    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    pub fn desk(&self) -> Option<&str> {
        self.desk.as_deref()
    }

    pub fn select(&mut self, id: &str) -> bool {
        let found = self.active().iter().any(|r| r.id == id);
        if found {
            self.selected = Some(id.to_string());
            self.editor_open = true;
        }
        found
    }

    pub fn close_editor(&mut self) {
        self.editor_open = false;
    }

    /// Restrict the active view to one desk, or show everything with `None`.
    ///
    /// The name is matched case-insensitively against the known desks and
    /// stored in its canonical spelling. Unknown desks are rejected and leave
    /// the current view untouched.
    pub fn set_desk(&mut self, desk: Option<String>) -> bool {
        let requested = desk.as_deref().map(str::trim).filter(|d| !d.is_empty());
        let canonical = match requested {
            None => None,
            Some(name) => match self.desks.iter().find(|d| d.eq_ignore_ascii_case(name)) {
                Some(known) => Some(known.to_string()),
                None => {
                    tracing::debug!("Ignoring unknown desk '{}'", name);
                    return false;
                }
            },
        };
        self.desk = canonical;
        self.reconcile_selection();
        true
    }

    /// Replace the whole list, keeping the selection if it survived.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
        self.reconcile_selection();
    }

    /// Replace the whole list and select its first active record.
    pub fn reset(&mut self, records: Vec<Record>) {
        self.records = records;
        self.selected = None;
        self.reconcile_selection();
    }

    /// Prepend a blank record, select it and open the editor panel.
    pub fn add(&mut self) -> RecordId {
        let mut record = Record::new(new_record_id(&self.records));
        record.date = Utc::now().format("%Y-%m-%d").to_string();
        if let Some(desk) = &self.desk {
            record.desk = desk.clone();
        }

        let id = record.id.clone();
        self.records.insert(0, record);
        self.selected = Some(id.clone());
        self.editor_open = true;
        id
    }

    /// Merge `patch` into the record with `id`. No-op while nothing is selected.
    pub fn patch(&mut self, id: &str, patch: RecordPatch) -> bool {
        if self.selected.is_none() {
            return false;
        }
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed && self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.reconcile_selection();
        removed
    }

    /// Swap with the neighbouring record of the active view.
    /// Returns false (list untouched) at either boundary or for unknown ids.
    pub fn move_record(&mut self, id: &str, direction: Direction) -> bool {
        let positions: Vec<usize> = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.in_view(r))
            .map(|(i, _)| i)
            .collect();

        let Some(at) = positions.iter().position(|&i| self.records[i].id == id) else {
            return false;
        };
        let neighbour = match direction {
            Direction::Up if at > 0 => at - 1,
            Direction::Down if at + 1 < positions.len() => at + 1,
            _ => return false,
        };

        self.records.swap(positions[at], positions[neighbour]);
        true
    }

    fn in_view(&self, record: &Record) -> bool {
        match &self.desk {
            Some(desk) => record.desk.trim().eq_ignore_ascii_case(desk.trim()),
            None => true,
        }
    }

    fn reconcile_selection(&mut self) {
        let still_valid = self
            .selected
            .as_deref()
            .is_some_and(|id| self.active().iter().any(|r| r.id == id));
        if still_valid {
            return;
        }

        self.selected = self.active().first().map(|r| r.id.clone());
        if self.selected.is_none() {
            self.editor_open = false;
        }
    }
}
