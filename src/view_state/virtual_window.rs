//! Render window over a long list of fixed-extent rows.
//!
//! Only rows in `[first_index, last_index]` are materialized. Everything else
//! is represented by two padding extents so that
//! `leading_padding + rendered_extent + trailing_padding == row_count * row_extent`
//! always holds and the scrollbar geometry matches the full logical list.

use super::types::{Extent, RowExtent};
use std::ops::RangeInclusive;

/// Inputs of a window computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    /// Logical number of rows (fetched rows or selected rows).
    pub row_count: usize,
    /// Fixed extent of every row.
    pub row_extent: RowExtent,
    /// Extra rows rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Visible extent of the viewport.
    pub viewport_extent: Extent,
    /// Current scroll offset from the top of the list.
    pub scroll_offset: Extent,
}

/// A materialized row with its position in the list.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedRow<C> {
    /// Row index in the logical list.
    pub index: usize,
    /// Offset of the row's top edge from the top of the list.
    pub top: Extent,
    /// Rendered display cells.
    pub cells: C,
}

/// Derived render window.
///
/// # Invariants
/// - `first_index <= last_index < row_count` when `row_count > 0`
/// - Empty window (no materialized rows, zero paddings) when `row_count == 0`
/// - `leading_padding == first_index * row_extent`
/// - `trailing_padding == (row_count - 1 - last_index) * row_extent`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualWindow {
    row_count: usize,
    row_extent: RowExtent,
    first_index: usize,
    last_index: usize,
    leading_padding: Extent,
    trailing_padding: Extent,
}

impl VirtualWindow {
    /// Compute the window for the given geometry.
    ///
    /// `first = floor(offset / extent)` and
    /// `last = ceil((offset + viewport) / extent)`, both clamped to the row
    /// range and then widened by `overscan` rows on each side.
    pub fn compute(params: WindowParams) -> Self {
        let WindowParams {
            row_count,
            row_extent,
            overscan,
            viewport_extent,
            scroll_offset,
        } = params;

        if row_count == 0 {
            return Self::empty(row_extent);
        }

        let extent = row_extent.get();
        let max_index = row_count - 1;

        let first = to_index(scroll_offset.get() / extent).min(max_index);
        let bottom = scroll_offset.saturating_add(viewport_extent).get();
        let last = to_index(bottom.div_ceil(extent)).min(max_index);

        let first_index = first.saturating_sub(overscan);
        let last_index = last.saturating_add(overscan).min(max_index);

        Self {
            row_count,
            row_extent,
            first_index,
            last_index,
            leading_padding: row_extent * first_index,
            trailing_padding: row_extent * (max_index - last_index),
        }
    }

    /// Window over an empty list.
    pub fn empty(row_extent: RowExtent) -> Self {
        Self {
            row_count: 0,
            row_extent,
            first_index: 0,
            last_index: 0,
            leading_padding: Extent::ZERO,
            trailing_padding: Extent::ZERO,
        }
    }

    /// Logical row count the window was computed for.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Row extent the window was computed for.
    pub fn row_extent(&self) -> RowExtent {
        self.row_extent
    }

    /// First materialized row, `None` for an empty list.
    pub fn first_index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.first_index)
    }

    /// Last materialized row (inclusive), `None` for an empty list.
    pub fn last_index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.last_index)
    }

    /// Materialized row indices.
    pub fn rendered(&self) -> Option<RangeInclusive<usize>> {
        (!self.is_empty()).then_some(self.first_index..=self.last_index)
    }

    /// Whether no rows are materialized.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Number of materialized rows.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.last_index - self.first_index + 1
        }
    }

    /// Check if a row index is materialized.
    pub fn contains(&self, index: usize) -> bool {
        !self.is_empty() && (self.first_index..=self.last_index).contains(&index)
    }

    /// Blank extent above the first materialized row.
    pub fn leading_padding(&self) -> Extent {
        self.leading_padding
    }

    /// Blank extent below the last materialized row.
    pub fn trailing_padding(&self) -> Extent {
        self.trailing_padding
    }

    /// Extent covered by materialized rows.
    pub fn rendered_extent(&self) -> Extent {
        self.row_extent * self.len()
    }

    /// Extent of the full logical list.
    pub fn total_extent(&self) -> Extent {
        self.row_extent * self.row_count
    }

    /// Offset of a row's top edge. Independent of `row_count`.
    pub fn row_top(&self, index: usize) -> Extent {
        self.row_extent * index
    }

    /// Turn the materialized range into display cells.
    ///
    /// `render` is called once per materialized index; rows it cannot
    /// provide (`None`) are skipped.
    pub fn materialize<C>(
        &self,
        mut render: impl FnMut(usize) -> Option<C>,
    ) -> Vec<MaterializedRow<C>> {
        let Some(range) = self.rendered() else {
            return Vec::new();
        };

        range
            .filter_map(|index| {
                render(index).map(|cells| MaterializedRow {
                    index,
                    top: self.row_top(index),
                    cells,
                })
            })
            .collect()
    }
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll_offset(
    row_count: usize,
    row_extent: RowExtent,
    viewport_extent: Extent,
) -> Extent {
    (row_extent * row_count).saturating_sub(viewport_extent)
}

/// Clamp a requested scroll offset to `[0, max_scroll_offset]`.
pub fn clamp_scroll(
    requested: Extent,
    row_count: usize,
    row_extent: RowExtent,
    viewport_extent: Extent,
) -> Extent {
    requested.min(max_scroll_offset(row_count, row_extent, viewport_extent))
}

fn to_index(raw: u64) -> usize {
    usize::try_from(raw).unwrap_or(usize::MAX)
}
