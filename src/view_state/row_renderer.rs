//! Mapping from a record to display cells.

use crate::model::{Record, ID_FIELD};
use serde::Deserialize;

/// Pure mapping from a record to its display cells.
///
/// The core never inspects fields beyond the identity; everything the user
/// sees in a row comes from an implementation of this trait.
pub trait RowRenderer {
    /// Column headers, one per cell.
    fn headers(&self) -> Vec<String>;

    /// Display cells for `record`, same length as [`RowRenderer::headers`].
    fn cells(&self, record: &Record) -> Vec<String>;
}

/// One configured column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    /// Header text.
    pub header: String,
    /// Record field shown in the column (`_id` for the identity).
    pub key: String,
}

impl ColumnSpec {
    /// Create a column.
    pub fn new(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
        }
    }
}

/// Renders the configured columns as plain field text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRenderer {
    columns: Vec<ColumnSpec>,
}

impl ColumnRenderer {
    /// Renderer for the given columns. An empty list falls back to the identity column.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        if columns.is_empty() {
            Self::default()
        } else {
            Self { columns }
        }
    }

    /// Configured columns.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }
}

impl Default for ColumnRenderer {
    fn default() -> Self {
        Self {
            columns: vec![ColumnSpec::new("ID", ID_FIELD)],
        }
    }
}

impl RowRenderer for ColumnRenderer {
    fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    fn cells(&self, record: &Record) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| record.field_text(&c.key))
            .collect()
    }
}
