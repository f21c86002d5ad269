//! View-state layer (pure, no rendering).
//!
//! Geometry of the virtualized list and the record → cells mapping. Nothing
//! here touches the terminal; the view layer consumes these types.

pub mod row_renderer;
pub mod types;
pub mod virtual_window;

// Re-exports
pub use row_renderer::{ColumnRenderer, ColumnSpec, RowRenderer};
pub use types::{Extent, InvalidRowExtent, RowExtent};
pub use virtual_window::{MaterializedRow, VirtualWindow, WindowParams};
