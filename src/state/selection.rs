//! Selected records, independent of any loaded page set.
//!
//! Members are full records keyed by identity, so they survive query changes,
//! cache eviction and the rows scrolling out of the window.

use crate::model::{compare_records, Record, RecordId, SortSpec};
use std::collections::BTreeMap;

/// Which rows the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Rows of the current query, fetched page by page.
    #[default]
    All,
    /// Only selected records, straight from the selection set.
    SelectedOnly,
}

impl ViewMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::SelectedOnly,
            Self::SelectedOnly => Self::All,
        }
    }
}

/// Set of selected records keyed by identity.
///
/// Iteration order is the identity order, which is the order `records()`
/// hands to the save collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    members: BTreeMap<RecordId, Record>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from records, keeping the last duplicate.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut set = Self::new();
        set.replace_all(records);
        set
    }

    /// Whether a record with this identity is selected.
    pub fn is_selected(&self, record: &Record) -> bool {
        self.members.contains_key(record.id())
    }

    /// Whether `id` is selected.
    pub fn contains_id(&self, id: &RecordId) -> bool {
        self.members.contains_key(id)
    }

    /// Add the record if absent, remove it if present.
    ///
    /// Returns whether the record is selected afterwards.
    pub fn toggle(&mut self, record: &Record) -> bool {
        if self.members.remove(record.id()).is_some() {
            false
        } else {
            self.members.insert(record.id().clone(), record.clone());
            true
        }
    }

    /// Replace the whole selection.
    pub fn replace_all(&mut self, records: impl IntoIterator<Item = Record>) {
        self.members = records
            .into_iter()
            .map(|record| (record.id().clone(), record))
            .collect();
    }

    /// Selected records ordered by `sort`, identity order when `None`.
    pub fn view(&self, sort: Option<&SortSpec>) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.members.values().collect();
        if sort.is_some() {
            records.sort_by(|a, b| compare_records(a, b, sort));
        }
        records
    }

    /// Selected record with identity `id`.
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.members.get(id)
    }

    /// Identities in `view(sort)` order.
    pub fn ordered_ids(&self, sort: Option<&SortSpec>) -> Vec<RecordId> {
        self.view(sort)
            .into_iter()
            .map(|record| record.id().clone())
            .collect()
    }

    /// Owned copy of the members in identity order.
    pub fn records(&self) -> Vec<Record> {
        self.members.values().cloned().collect()
    }

    /// Number of selected records.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, name: &str) -> Record {
        Record::new(id).with_field("name", name)
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut set = SelectionSet::new();
        let r = record(7, "seven");
        assert!(set.toggle(&r));
        assert!(set.is_selected(&r));
        assert!(!set.toggle(&r));
        assert!(!set.is_selected(&r));
        assert!(set.is_empty());
    }

    #[test]
    fn membership_is_by_identity_not_content() {
        let mut set = SelectionSet::new();
        set.toggle(&record(7, "old name"));
        assert!(set.is_selected(&record(7, "renamed")));
        assert!(set.contains_id(&RecordId::from(7u64)));
    }

    #[test]
    fn replace_all_overwrites_previous_members() {
        let mut set = SelectionSet::from_records([record(1, "a"), record(2, "b")]);
        set.replace_all([record(3, "c")]);
        let ids: Vec<_> = set.records().iter().map(|r| r.id().clone()).collect();
        assert_eq!(ids, vec![RecordId::from(3u64)]);
    }

    #[test]
    fn records_are_in_identity_order() {
        let set = SelectionSet::from_records([record(9, "x"), record(2, "y"), record(5, "z")]);
        let ids: Vec<_> = set.records().iter().map(|r| r.id().clone()).collect();
        assert_eq!(
            ids,
            vec![
                RecordId::from(2u64),
                RecordId::from(5u64),
                RecordId::from(9u64)
            ]
        );
    }

    #[test]
    fn view_applies_sort_spec() {
        let set = SelectionSet::from_records([record(1, "b"), record(2, "c"), record(3, "a")]);
        let names: Vec<_> = set
            .view(Some(&SortSpec::desc("name")))
            .iter()
            .map(|r| r.field_text("name"))
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);
    }

    #[test]
    fn duplicate_ids_keep_last_record() {
        let set = SelectionSet::from_records([record(1, "first"), record(1, "second")]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].field_text("name"), "second");
    }

    #[test]
    fn view_mode_toggles() {
        assert_eq!(ViewMode::All.toggled(), ViewMode::SelectedOnly);
        assert_eq!(ViewMode::SelectedOnly.toggled(), ViewMode::All);
    }
}
