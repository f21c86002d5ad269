//! Search bar widget.

use super::styles::ListStyles;
use crate::model::{SortOrder, SortSpec};
use crate::state::SearchInput;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Renders the search box with the field it filters on and the active sort.
pub struct SearchBar<'a> {
    input: &'a SearchInput,
    filter_field: &'a str,
    sort: Option<&'a SortSpec>,
    focused: bool,
    styles: ListStyles,
}

impl<'a> SearchBar<'a> {
    /// Create the widget.
    pub fn new(input: &'a SearchInput, filter_field: &'a str, styles: ListStyles) -> Self {
        Self {
            input,
            filter_field,
            sort: None,
            focused: false,
            styles,
        }
    }

    /// Show the active sort in the border.
    pub fn sort(mut self, sort: Option<&'a SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Whether the box owns keyboard input.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn input_line(&self) -> Line<'a> {
        let text = self.input.text();

        if text.is_empty() && !self.focused {
            return Line::from(Span::styled("press / to search", self.styles.muted));
        }

        if !self.focused {
            return Line::from(text.to_string());
        }

        let cursor = self.input.cursor();
        let before: String = text.chars().take(cursor).collect();
        let mut rest = text.chars().skip(cursor);
        let at_cursor = rest.next().map_or_else(|| " ".to_string(), String::from);
        let after: String = rest.collect();

        Line::from(vec![
            Span::raw(before),
            Span::styled(
                at_cursor,
                Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ),
            Span::raw(after),
        ])
    }
}

/// Border label for a sort, e.g. `name ↑`.
pub fn sort_label(sort: Option<&SortSpec>) -> String {
    match sort {
        Some(spec) => {
            let arrow = match spec.order {
                SortOrder::Asc => '↑',
                SortOrder::Desc => '↓',
            };
            format!(" sort: {} {arrow} ", spec.key)
        }
        None => " unsorted ".to_string(),
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.focused {
            self.styles.active_border
        } else {
            self.styles.inactive_border
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(format!(" Search {} ", self.filter_field))
            .title_top(Line::from(sort_label(self.sort)).right_aligned());

        Paragraph::new(self.input_line()).block(block).render(area, buf);
    }
}
