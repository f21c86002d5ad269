//! Paginated selection list (pagesel)
//!
//! A windowed, incrementally-fetched list over a remotely paginated record
//! set, with multi-select, a debounced search box and a save/cancel session.
//!
//! The core (`state`, `view_state`, `model`) is pure and driven by explicit
//! requests and completions. The shell (`view`, `source`) owns the terminal,
//! the fetch thread and the save collaborator.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
