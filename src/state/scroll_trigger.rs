//! Threshold-based "load more" decision.
//!
//! Pure function of the viewport and the cursor: fetch when the unscrolled
//! remainder drops below the threshold and the cursor still has rows to load.

use super::fetch_cursor::{FetchCursor, FetchStatus};
use crate::model::FetchRequest;
use crate::view_state::Extent;
use tracing::trace;

/// Scroll position of a scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportMetrics {
    /// Distance scrolled from the top.
    pub scroll_offset: Extent,
    /// Visible size of the container.
    pub viewport_extent: Extent,
    /// Full scrollable size of the content.
    pub scroll_extent: Extent,
}

impl ViewportMetrics {
    /// Unscrolled content below the viewport.
    ///
    /// `scroll_extent - scroll_offset - viewport_extent`, saturating at zero.
    pub fn remaining(&self) -> Extent {
        self.scroll_extent
            .saturating_sub(self.scroll_offset)
            .saturating_sub(self.viewport_extent)
    }
}

/// Decides when scrolling should request the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTrigger {
    threshold: Extent,
}

impl ScrollTrigger {
    /// Create a trigger firing when less than `threshold` remains.
    pub fn new(threshold: Extent) -> Self {
        Self { threshold }
    }

    /// Configured threshold.
    pub fn threshold(&self) -> Extent {
        self.threshold
    }

    /// Whether the position and cursor state call for the next page.
    ///
    /// False while a request is outstanding, after a failure (retry is
    /// explicit), before the first page has reported a total, and once every
    /// row is loaded.
    pub fn should_fetch(&self, metrics: &ViewportMetrics, cursor: &FetchCursor) -> bool {
        if metrics.remaining() >= self.threshold {
            return false;
        }
        match cursor.status() {
            FetchStatus::Fetching { .. } | FetchStatus::Error(_) => false,
            FetchStatus::Idle | FetchStatus::Fetched => cursor.has_more(),
        }
    }

    /// Request the next page when [`should_fetch`](Self::should_fetch) holds.
    pub fn maybe_fetch_more(
        &self,
        metrics: &ViewportMetrics,
        cursor: &mut FetchCursor,
    ) -> Option<FetchRequest> {
        if !self.should_fetch(metrics, cursor) {
            return None;
        }
        trace!(
            remaining = metrics.remaining().get(),
            threshold = self.threshold.get(),
            "Scroll threshold crossed"
        );
        cursor.fetch_next_page()
    }
}
