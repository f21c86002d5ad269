//! Bottom status line.

use super::styles::ListStyles;
use crate::state::{ListDisplay, ViewMode};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

const HINTS: &str =
    "space toggle · s selected · / search · f field · o sort · enter save · esc cancel";

/// Status line: failure banner, save notice, progress or key hints.
pub struct StatusBar<'a> {
    display: &'a ListDisplay,
    notice: Option<&'a str>,
    styles: ListStyles,
}

impl<'a> StatusBar<'a> {
    /// Create the widget.
    pub fn new(display: &'a ListDisplay, styles: ListStyles) -> Self {
        Self {
            display,
            notice: None,
            styles,
        }
    }

    /// Transient message shown instead of the hints.
    pub fn notice(mut self, notice: Option<&'a str>) -> Self {
        self.notice = notice;
        self
    }

    fn line(&self) -> Line<'a> {
        if let Some(error) = &self.display.failure {
            return Line::from(Span::styled(
                format!(" {error} · r retry · x dismiss "),
                self.styles.error,
            ));
        }

        if let Some(notice) = self.notice {
            return Line::from(Span::styled(format!(" {notice}"), self.styles.notice));
        }

        let mut spans = Vec::new();
        if self.display.fetching_more {
            spans.push(Span::styled(" Loading more... ", self.styles.notice));
        }
        if self.display.view_mode == ViewMode::SelectedOnly {
            spans.push(Span::styled(" [selected] ", self.styles.header));
        }
        spans.push(Span::styled(format!(" {HINTS}"), self.styles.muted));
        Line::from(spans)
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line()).render(area, buf);
    }
}
