//! Pagination progress for one query identity.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──fetch_next_page──▶ Fetching ──complete(Ok)──▶ Fetched
//!                               │  ▲                        │
//!                  complete(Err)│  └──fetch_next_page───────┘
//!                               ▼  │
//!                             Error ─┘ (retry, same next_offset)
//! ```
//!
//! Only one request is ever outstanding: `fetch_next_page` is a no-op while
//! `Fetching`, so completions can only arrive in request order.

use crate::model::{
    FetchError, FetchRequest, FetchResponse, FetchTicket, Generation, Page, QueryIdentity, Record,
};
use tracing::debug;

/// Fetch state of a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Created, nothing requested yet.
    #[default]
    Idle,
    /// A request is outstanding.
    Fetching {
        /// Ticket of the outstanding request.
        ticket: FetchTicket,
    },
    /// Last request succeeded.
    Fetched,
    /// Last request failed. Offsets are unchanged.
    Error(FetchError),
}

/// Why a completion was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The cursor that issued the request no longer exists.
    Superseded {
        /// Generation on the ticket.
        ticket: Generation,
    },
    /// The cursor is not waiting for a result.
    NotFetching,
    /// The result is for a different offset than the outstanding request.
    OffsetMismatch {
        /// Offset the cursor is waiting on.
        expected: usize,
        /// Offset on the ticket.
        received: usize,
    },
}

/// Result of applying a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// A page was appended (or the result set turned out to be exhausted).
    Applied {
        /// Offset of the applied page.
        offset: usize,
        /// Number of records appended.
        len: usize,
        /// Total count after applying.
        total_count: usize,
    },
    /// The request failed; the cursor is now in `Error`.
    Failed(FetchError),
    /// The completion belongs to a superseded or unexpected request and was ignored.
    Stale(StaleReason),
}

/// Pagination progress of one [`QueryIdentity`].
///
/// # Invariants
/// - `next_offset == pages.iter().map(Page::len).sum()`
/// - pages are contiguous: `pages[i].end() == pages[i + 1].offset()`
/// - `total_count` is `None` until the first successful fetch, then the value
///   reported by the most recent one
#[derive(Debug, Clone)]
pub struct FetchCursor {
    identity: QueryIdentity,
    generation: Generation,
    pages: Vec<Page>,
    next_offset: usize,
    total_count: Option<usize>,
    status: FetchStatus,
}

impl FetchCursor {
    /// Create an idle cursor.
    pub fn new(identity: QueryIdentity, generation: Generation) -> Self {
        Self {
            identity,
            generation,
            pages: Vec::new(),
            next_offset: 0,
            total_count: None,
            status: FetchStatus::Idle,
        }
    }

    /// Query identity this cursor paginates.
    pub fn identity(&self) -> &QueryIdentity {
        &self.identity
    }

    /// Generation used to detect stale completions.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Applied pages in offset order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Offset of the next page to fetch.
    pub fn next_offset(&self) -> usize {
        self.next_offset
    }

    /// Number of loaded records (same as `next_offset`).
    pub fn loaded_count(&self) -> usize {
        self.next_offset
    }

    /// Server total from the most recent successful fetch.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Current status.
    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    /// Whether a request is outstanding.
    pub fn is_fetching(&self) -> bool {
        matches!(self.status, FetchStatus::Fetching { .. })
    }

    /// Whether the last request failed.
    pub fn error(&self) -> Option<&FetchError> {
        match &self.status {
            FetchStatus::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Whether the total is known and more records remain.
    pub fn has_more(&self) -> bool {
        self.total_count.is_some_and(|total| self.next_offset < total)
    }

    /// Record at a loaded row index.
    pub fn row(&self, index: usize) -> Option<&Record> {
        let page_index = self.pages.partition_point(|page| page.end() <= index);
        let page = self.pages.get(page_index)?;
        page.records().get(index.checked_sub(page.offset())?)
    }

    /// All loaded records in order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.pages.iter().flat_map(|page| page.records())
    }

    /// Request the next page.
    ///
    /// No-op (returns `None`) while a request is outstanding or when the known
    /// total has been reached. From `Idle` or `Error` this (re)requests the
    /// page at the unchanged `next_offset`.
    pub fn fetch_next_page(&mut self) -> Option<FetchRequest> {
        if self.is_fetching() {
            return None;
        }
        if let Some(total) = self.total_count {
            if self.next_offset >= total {
                return None;
            }
        }

        let ticket = FetchTicket {
            generation: self.generation,
            offset: self.next_offset,
        };
        self.status = FetchStatus::Fetching { ticket };

        debug!(
            identity = %self.identity,
            generation = self.generation.get(),
            offset = self.next_offset,
            "Requesting page"
        );

        Some(FetchRequest {
            ticket,
            params: self.identity.params(),
        })
    }

    /// Apply the result of the outstanding request.
    ///
    /// Results whose ticket does not match the outstanding request are
    /// returned as [`CompletionOutcome::Stale`] without touching any state.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<FetchResponse, FetchError>,
    ) -> CompletionOutcome {
        if ticket.generation != self.generation {
            return CompletionOutcome::Stale(StaleReason::Superseded {
                ticket: ticket.generation,
            });
        }
        let expected = match &self.status {
            FetchStatus::Fetching { ticket } => *ticket,
            _ => return CompletionOutcome::Stale(StaleReason::NotFetching),
        };
        if expected.offset != ticket.offset {
            return CompletionOutcome::Stale(StaleReason::OffsetMismatch {
                expected: expected.offset,
                received: ticket.offset,
            });
        }

        match result {
            Ok(response) => self.apply_page(ticket.offset, response),
            Err(err) => {
                debug!(
                    identity = %self.identity,
                    offset = ticket.offset,
                    error = %err,
                    "Fetch failed"
                );
                self.status = FetchStatus::Error(err.clone());
                CompletionOutcome::Failed(err)
            }
        }
    }

    fn apply_page(&mut self, offset: usize, response: FetchResponse) -> CompletionOutcome {
        self.status = FetchStatus::Fetched;

        // An empty page means the set is exhausted, whatever the count says.
        if response.documents.is_empty() {
            self.total_count = Some(self.next_offset);
            return CompletionOutcome::Applied {
                offset,
                len: 0,
                total_count: self.next_offset,
            };
        }

        let len = response.documents.len();
        self.pages
            .push(Page::new(offset, response.documents, response.count));
        self.next_offset += len;
        self.total_count = Some(response.count);

        debug!(
            identity = %self.identity,
            offset,
            len,
            total = response.count,
            "Applied page"
        );

        CompletionOutcome::Applied {
            offset,
            len,
            total_count: response.count,
        }
    }
}

#[cfg(test)]
#[path = "fetch_cursor_tests.rs"]
mod tests;
