//! Append-only history of successful lookups

use crate::types::{EntryId, HistoryEntry, Query, ResolvedParticle};
use chrono::Utc;

/// Ordered record of every successful query
///
/// Entries are kept in insertion order and never removed or edited;
/// identical lookups each get their own entry.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result at the tail and return the new entry
    pub fn append(&mut self, query: Query, result: ResolvedParticle) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: EntryId::new(),
            sequence: self.entries.len() as u64,
            query,
            result,
            resolved_at: Utc::now(),
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in insertion order
    pub fn all(&self) -> impl DoubleEndedIterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// Entries newest first, for display; storage order is untouched
    pub fn most_recent_first(&self) -> impl Iterator<Item = &HistoryEntry> + ExactSizeIterator {
        self.entries.iter().rev()
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mass, SearchMode};

    fn particle(name: &str, pdg_id: i64) -> ResolvedParticle {
        ResolvedParticle {
            display_name: name.to_string(),
            pdg_id,
            mass_mev: Mass::Unknown,
            width_mev: Mass::Unknown,
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut store = HistoryStore::new();
        store.append(Query::new(SearchMode::PdgId, "11"), particle("e-", 11));
        store.append(Query::new(SearchMode::PdgId, "13"), particle("mu-", 13));
        store.append(Query::new(SearchMode::Name, "p"), particle("p", 2212));

        let ids: Vec<i64> = store.all().map(|e| e.result.pdg_id).collect();
        assert_eq!(ids, vec![11, 13, 2212]);

        let seqs: Vec<u64> = store.all().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_most_recent_first_does_not_reorder_storage() {
        let mut store = HistoryStore::new();
        store.append(Query::new(SearchMode::PdgId, "11"), particle("e-", 11));
        store.append(Query::new(SearchMode::PdgId, "13"), particle("mu-", 13));

        let newest_first: Vec<&str> = store
            .most_recent_first()
            .map(|e| e.result.display_name.as_str())
            .collect();
        assert_eq!(newest_first, vec!["mu-", "e-"]);

        assert_eq!(store.all().next().unwrap().result.display_name, "e-");
        assert_eq!(store.latest().unwrap().result.display_name, "mu-");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = HistoryStore::new();
        let first = store
            .append(Query::new(SearchMode::PdgId, "22"), particle("gamma", 22))
            .id;
        let second = store
            .append(Query::new(SearchMode::PdgId, "22"), particle("gamma", 22))
            .id;

        assert_eq!(store.len(), 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_empty_store() {
        let store = HistoryStore::new();
        assert!(store.is_empty());
        assert!(store.latest().is_none());
        assert_eq!(store.most_recent_first().count(), 0);
    }
}
