//! Screen layout: search box on top, list in the middle, status bar below.

use super::constants::{SEARCH_INPUT_HEIGHT, STATUS_BAR_HEIGHT};
use super::list::body_height;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    /// Search box.
    pub search: Rect,
    /// Record list block, borders included.
    pub list: Rect,
    /// Status bar.
    pub status: Rect,
}

impl AppLayout {
    /// Split `area` into the three regions.
    pub fn compute(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_INPUT_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .split(area);

        Self {
            search: chunks[0],
            list: chunks[1],
            status: chunks[2],
        }
    }

    /// Lines of rows the list can show.
    pub fn list_rows(&self) -> u16 {
        body_height(self.list)
    }

    /// First line of the list body (below border and header).
    pub fn list_body_top(&self) -> u16 {
        self.list.y + 2
    }

    /// Row line under the terminal cell, if it is inside the list body.
    pub fn body_line_at(&self, column: u16, row: u16) -> Option<u16> {
        let top = self.list_body_top();
        let inside_x = column > self.list.x && column < self.list.right().saturating_sub(1);
        let inside_y = row >= top && row < top + self.list_rows();
        (inside_x && inside_y).then(|| row - top)
    }
}
