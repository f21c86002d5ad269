//! Collaborators at the edge of the list.
//!
//! - [`RecordSource`]: paginated fetch (`offset`, query params) → page
//! - [`SelectionSink`]: receives the committed selection
//! - [`FetchWorker`]: runs a blocking source off the UI thread
//! - [`file`]: record files used to seed sources and the initial selection

use crate::model::{FetchError, FetchResponse, QueryParams, Record, SaveError};

pub mod file;
pub mod memory;
pub mod sink;
pub mod worker;

pub use file::load_records;
pub use memory::MemorySource;
pub use sink::{CollectingSink, JsonFileSink};
pub use worker::FetchWorker;

/// Paginated fetch collaborator.
///
/// Implementations may block; the shell calls them from [`FetchWorker`].
pub trait RecordSource: Send + Sync {
    /// Fetch the page starting at `offset` for `params`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the page cannot be produced. The caller keeps
    /// its offset and may retry.
    fn fetch(&self, offset: usize, params: &QueryParams) -> Result<FetchResponse, FetchError>;
}

/// Save collaborator for the committed selection.
pub trait SelectionSink {
    /// Persist `records`, ordered by identity.
    ///
    /// # Errors
    ///
    /// Returns `SaveError` when the selection could not be stored.
    fn save_selection(&self, records: &[Record]) -> Result<(), SaveError>;
}
