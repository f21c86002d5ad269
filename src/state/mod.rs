//! List state machine (pure).
//!
//! All state transitions are pure functions of their inputs, with time passed
//! in as `Instant`. Testable without a terminal or a fetch thread.

pub mod debounce;
pub mod fetch_cursor;
pub mod list_controller;
pub mod query_cache;
pub mod scroll_trigger;
pub mod search_input;
pub mod selection;

// Re-export for convenience
pub use debounce::Debouncer;
pub use fetch_cursor::{CompletionOutcome, FetchCursor, FetchStatus, StaleReason};
pub use list_controller::{
    ListBody, ListConfig, ListController, ListDisplay, Notification, SessionState,
};
pub use query_cache::QueryCache;
pub use scroll_trigger::{ScrollTrigger, ViewportMetrics};
pub use search_input::SearchInput;
pub use selection::{SelectionSet, ViewMode};
