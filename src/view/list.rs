//! Virtualized record list widget.
//!
//! Only the rows materialized by the controller's window are drawn. One
//! terminal line holds one row, so line `n` of the body shows the row whose
//! top sits `n` row extents below the scroll offset.

use super::constants::{CHECKBOX_WIDTH, LIST_CHROME_HEIGHT};
use super::styles::ListStyles;
use crate::state::{ListBody, ListController, ViewMode};
use crate::view_state::RowRenderer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{
        Block, Borders, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Lines available for rows inside a list block of `area`.
pub fn body_height(area: Rect) -> u16 {
    area.height.saturating_sub(LIST_CHROME_HEIGHT)
}

/// Cut `text` to at most `max_width` columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Join cells into fixed-width columns.
fn layout_cells(cells: &[String], width: usize) -> String {
    let Some(column_width) = width.checked_div(cells.len()) else {
        return String::new();
    };
    let mut line = String::with_capacity(width);
    for cell in cells {
        let text = truncate_to_width(cell, column_width.saturating_sub(1));
        let pad = column_width.saturating_sub(text.width());
        line.push_str(&text);
        line.extend(std::iter::repeat(' ').take(pad));
    }
    line
}

/// The record list: header, rows with checkboxes and a scrollbar.
pub struct RecordList<'a> {
    controller: &'a ListController,
    renderer: &'a dyn RowRenderer,
    title: &'a str,
    focused: bool,
    styles: ListStyles,
}

impl<'a> RecordList<'a> {
    /// Create the widget.
    pub fn new(
        controller: &'a ListController,
        renderer: &'a dyn RowRenderer,
        styles: ListStyles,
    ) -> Self {
        Self {
            controller,
            renderer,
            title: "",
            focused: true,
            styles,
        }
    }

    /// Block title.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Whether the list owns keyboard input.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn block(&self) -> Block<'a> {
        let display = self.controller.display();
        let mode = match display.view_mode {
            ViewMode::All => "",
            ViewMode::SelectedOnly => " (selected only)",
        };
        let loaded = match display.total_count {
            Some(total) if display.view_mode == ViewMode::All => {
                format!("{}/{}", display.row_count, total)
            }
            _ => display.row_count.to_string(),
        };
        let counts = format!(" {} selected · {loaded} rows ", display.selected_count);

        Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focused {
                self.styles.active_border
            } else {
                self.styles.inactive_border
            })
            .title(format!(" {}{mode} ", self.title))
            .title_top(Line::from(counts).right_aligned())
    }

    fn render_rows(&self, body: Rect, buf: &mut Buffer) {
        let row_extent = self.controller.config().row_extent.get();
        let scroll = self.controller.scroll_offset().get();
        let focused = self.controller.focused_index();
        let cells_width = usize::from(body.width.saturating_sub(CHECKBOX_WIDTH));

        for row in self.controller.visible_rows() {
            let Some(offset) = row.top.get().checked_sub(scroll) else {
                continue;
            };
            let line = offset / row_extent;
            let Some(y) = u16::try_from(line)
                .ok()
                .filter(|&line| line < body.height)
                .map(|line| body.y + line)
            else {
                continue;
            };

            let selected = self.controller.is_selected(row.cells);
            let row_style = if focused == Some(row.index) {
                self.styles.focused
            } else {
                Style::default()
            };
            buf.set_style(Rect::new(body.x, y, body.width, 1), row_style);

            let checkbox = if selected { "[x] " } else { "[ ] " };
            let checkbox_style = if selected {
                row_style.patch(self.styles.checked)
            } else {
                row_style
            };
            buf.set_stringn(body.x, y, checkbox, usize::from(body.width), checkbox_style);

            let text = layout_cells(&self.renderer.cells(row.cells), cells_width);
            buf.set_stringn(body.x + CHECKBOX_WIDTH, y, text, cells_width, row_style);
        }
    }

    fn render_scrollbar(&self, area: Rect, buf: &mut Buffer) {
        let visible = usize::from(area.height);
        let rows = self.controller.row_count();
        if rows <= visible {
            return;
        }
        let row_extent = self.controller.config().row_extent.get();
        let first_line = self.controller.scroll_offset().get() / row_extent;
        let position = usize::try_from(first_line).unwrap_or(usize::MAX);

        let mut state = ScrollbarState::new(rows.saturating_sub(visible)).position(position);
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .track_symbol(Some("│"))
            .thumb_symbol("█")
            .render(area, buf, &mut state);
    }
}

impl Widget for RecordList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width <= CHECKBOX_WIDTH {
            return;
        }

        // Header, then rows; the last column is reserved for the scrollbar.
        let content_width = inner.width.saturating_sub(1);
        let header = Rect::new(inner.x, inner.y, content_width, 1);
        let body = Rect::new(
            inner.x,
            inner.y + 1,
            content_width,
            inner.height.saturating_sub(1),
        );
        let scrollbar_area = Rect::new(inner.right().saturating_sub(1), body.y, 1, body.height);

        let header_width = usize::from(content_width.saturating_sub(CHECKBOX_WIDTH));
        let headers = layout_cells(&self.renderer.headers(), header_width);
        buf.set_style(header, self.styles.header);
        buf.set_stringn(
            header.x + CHECKBOX_WIDTH,
            header.y,
            headers,
            header_width,
            self.styles.header,
        );

        if body.height == 0 {
            return;
        }

        match self.controller.display().body {
            ListBody::Loading => {
                buf.set_stringn(
                    body.x,
                    body.y,
                    "Loading...",
                    usize::from(body.width),
                    self.styles.muted,
                );
            }
            ListBody::Empty => {
                buf.set_stringn(
                    body.x,
                    body.y,
                    "No results...",
                    usize::from(body.width),
                    self.styles.muted,
                );
            }
            ListBody::Rows => {
                self.render_rows(body, buf);
                self.render_scrollbar(scrollbar_area, buf);
            }
        }
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
