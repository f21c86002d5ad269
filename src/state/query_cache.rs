//! Controller-owned cache of fetch cursors keyed by query identity.
//!
//! Holds at most one live cursor: observing a new identity evicts every other
//! entry. Each created cursor gets a fresh generation so completions for an
//! evicted cursor, even one for an identical identity re-created later, are
//! recognised as stale.

use super::fetch_cursor::{CompletionOutcome, FetchCursor, StaleReason};
use crate::model::{FetchCompletion, FetchRequest, Generation, QueryIdentity};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Explicit map from query identity to its cursor.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: HashMap<QueryIdentity, FetchCursor>,
    last_generation: Generation,
}

impl QueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cursor for `identity`, creating it if needed.
    ///
    /// A created cursor replaces every other entry and immediately requests
    /// its first page; the request is returned for the caller to dispatch.
    /// A cache hit returns `None`.
    pub fn ensure_fetched(
        &mut self,
        identity: &QueryIdentity,
    ) -> (&mut FetchCursor, Option<FetchRequest>) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key == identity);
        let evicted = before - self.entries.len();

        match self.entries.entry(identity.clone()) {
            Entry::Occupied(entry) => (entry.into_mut(), None),
            Entry::Vacant(entry) => {
                self.last_generation = self.last_generation.next();
                debug!(
                    identity = %identity,
                    generation = self.last_generation.get(),
                    evicted,
                    "Creating cursor"
                );

                let mut cursor = FetchCursor::new(identity.clone(), self.last_generation);
                let request = cursor.fetch_next_page();
                (entry.insert(cursor), request)
            }
        }
    }

    /// Cursor for `identity`, if cached.
    pub fn get(&self, identity: &QueryIdentity) -> Option<&FetchCursor> {
        self.entries.get(identity)
    }

    /// Mutable cursor for `identity`, if cached.
    pub fn get_mut(&mut self, identity: &QueryIdentity) -> Option<&mut FetchCursor> {
        self.entries.get_mut(identity)
    }

    /// Drop the entry for `identity` and its pages.
    pub fn evict(&mut self, identity: &QueryIdentity) -> Option<FetchCursor> {
        self.entries.remove(identity)
    }

    /// Drop every entry (consumer detached).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live cursors (0 or 1).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no cursor is live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route a completion to the cursor that issued it.
    ///
    /// Completions for evicted cursors are reported as stale.
    pub fn complete(&mut self, completion: FetchCompletion) -> CompletionOutcome {
        let FetchCompletion { ticket, result } = completion;

        let cursor = self
            .entries
            .values_mut()
            .find(|cursor| cursor.generation() == ticket.generation);

        match cursor {
            Some(cursor) => cursor.complete(ticket, result),
            None => CompletionOutcome::Stale(StaleReason::Superseded {
                ticket: ticket.generation,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FetchResponse, Record};

    fn page(offset: usize, len: usize, count: usize) -> FetchResponse {
        FetchResponse {
            documents: (offset..offset + len)
                .map(|i| Record::new(i as u64))
                .collect(),
            count,
        }
    }

    #[test]
    fn miss_creates_cursor_and_requests_first_page() {
        let mut cache = QueryCache::new();
        let identity = QueryIdentity::new("_id");
        let (cursor, request) = cache.ensure_fetched(&identity);

        assert!(cursor.is_fetching());
        assert_eq!(request.map(|r| r.offset()), Some(0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn hit_returns_cached_cursor_without_request() {
        let mut cache = QueryCache::new();
        let identity = QueryIdentity::new("_id");
        let (_, first) = cache.ensure_fetched(&identity);
        let first = first.unwrap();
        cache.complete(FetchCompletion::success(first.ticket, page(0, 10, 25)));

        let (cursor, request) = cache.ensure_fetched(&identity);
        assert!(request.is_none());
        assert_eq!(cursor.next_offset(), 10);
    }

    #[test]
    fn new_identity_evicts_previous_cursor() {
        let mut cache = QueryCache::new();
        let a = QueryIdentity::new("_id");
        let b = QueryIdentity::new("_id").with_search("ab");
        cache.ensure_fetched(&a);
        cache.ensure_fetched(&b);

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&a).is_none());
        assert!(cache.get(&b).is_some());
    }

    #[test]
    fn each_created_cursor_gets_increasing_generation() {
        let mut cache = QueryCache::new();
        let a = QueryIdentity::new("_id");
        let b = QueryIdentity::new("name");
        let g1 = cache.ensure_fetched(&a).0.generation();
        let g2 = cache.ensure_fetched(&b).0.generation();
        let g3 = cache.ensure_fetched(&a).0.generation();
        assert!(g1 < g2 && g2 < g3);
    }

    #[test]
    fn completion_for_evicted_cursor_is_stale() {
        let mut cache = QueryCache::new();
        let a = QueryIdentity::new("_id");
        let b = QueryIdentity::new("_id").with_search("ab");
        let (_, request_a) = cache.ensure_fetched(&a);
        let request_a = request_a.unwrap();
        cache.ensure_fetched(&b);

        let outcome = cache.complete(FetchCompletion::success(request_a.ticket, page(0, 10, 25)));
        assert!(matches!(outcome, CompletionOutcome::Stale(_)));
        assert!(cache.get(&b).unwrap().pages().is_empty());
    }

    #[test]
    fn recreated_identity_ignores_old_generation_results() {
        let mut cache = QueryCache::new();
        let a = QueryIdentity::new("_id");
        let (_, old) = cache.ensure_fetched(&a);
        let old = old.unwrap();
        cache.evict(&a);
        cache.ensure_fetched(&a);

        let outcome = cache.complete(FetchCompletion::success(old.ticket, page(0, 10, 25)));
        assert!(matches!(
            outcome,
            CompletionOutcome::Stale(StaleReason::Superseded { .. })
        ));
        assert_eq!(cache.get(&a).unwrap().next_offset(), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut cache = QueryCache::new();
        cache.ensure_fetched(&QueryIdentity::new("_id"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
