//! Save collaborators.

use super::SelectionSink;
use crate::model::{Record, SaveError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Writes the selection to a file as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Sink writing to `path`, replacing any existing file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionSink for JsonFileSink {
    fn save_selection(&self, records: &[Record]) -> Result<(), SaveError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(|source| SaveError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Keeps the last saved selection in memory.
///
/// Clones share storage, so one clone can be handed to the UI while another
/// reads the result after the session ends.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    saved: Arc<Mutex<Option<Vec<Record>>>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last saved selection, if any save happened.
    pub fn saved(&self) -> Option<Vec<Record>> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SelectionSink for CollectingSink {
    fn save_selection(&self, records: &[Record]) -> Result<(), SaveError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = Some(records.to_vec());
        Ok(())
    }
}
