//! Domain model types (pure).
//!
//! All types in this module are pure data; none of them perform I/O.

pub mod error;
pub mod key_action;
pub mod page;
pub mod query;
pub mod record;

// Re-export for convenience
pub use error::{AppError, FetchError, SaveError, SourceError};
pub use key_action::KeyAction;
pub use page::{FetchCompletion, FetchRequest, FetchResponse, FetchTicket, Generation, Page};
pub use query::{compare_records, FieldFilter, QueryIdentity, QueryParams, SortOrder, SortSpec};
pub use record::{Record, RecordId, ID_FIELD};
