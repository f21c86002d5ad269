//! Pages and the fetch wire types.

use super::error::FetchError;
use super::record::Record;
use serde::{Deserialize, Serialize};

/// Result of one fetch as returned by the fetch collaborator.
///
/// Wire shape: `{"documents": [...], "count": 25}` where `count` is the
/// server-side total for the query at fetch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Records at the requested offset, in server order.
    pub documents: Vec<Record>,
    /// Total number of records matching the query.
    pub count: usize,
}

/// One applied page of a cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    offset: usize,
    records: Vec<Record>,
    total_count: usize,
}

impl Page {
    /// Create a page starting at `offset`.
    pub fn new(offset: usize, records: Vec<Record>, total_count: usize) -> Self {
        Self {
            offset,
            records,
            total_count,
        }
    }

    /// Offset of the first record in this page.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Records in this page.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records in this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Offset one past the last record.
    pub fn end(&self) -> usize {
        self.offset + self.records.len()
    }

    /// Server-reported total when this page was fetched.
    pub fn total_count(&self) -> usize {
        self.total_count
    }
}

/// Ties a fetch result back to the cursor and offset that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    /// Generation of the cursor that issued the request.
    pub generation: Generation,
    /// Offset that was requested.
    pub offset: usize,
}

/// Monotonically increasing cursor generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Wrap a raw generation number.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw generation number.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The following generation.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

/// A request the controller wants the fetch collaborator to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Identifies the result when it comes back.
    pub ticket: FetchTicket,
    /// Query parameters for the collaborator.
    pub params: super::query::QueryParams,
}

impl FetchRequest {
    /// Offset to fetch from.
    pub fn offset(&self) -> usize {
        self.ticket.offset
    }
}

/// The collaborator's answer to a [`FetchRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCompletion {
    /// Ticket copied from the request.
    pub ticket: FetchTicket,
    /// Fetched page or transport failure.
    pub result: Result<FetchResponse, FetchError>,
}

impl FetchCompletion {
    /// Successful completion.
    pub fn success(ticket: FetchTicket, response: FetchResponse) -> Self {
        Self {
            ticket,
            result: Ok(response),
        }
    }

    /// Failed completion.
    pub fn failure(ticket: FetchTicket, error: FetchError) -> Self {
        Self {
            ticket,
            result: Err(error),
        }
    }
}
