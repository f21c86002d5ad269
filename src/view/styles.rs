//! List styling.
//!
//! Colors are dropped entirely when `NO_COLOR` is set.

use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether the terminal output may use colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colors are enabled unless `NO_COLOR` is set (any value).
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var_os("NO_COLOR").is_none(),
        }
    }

    /// Explicit setting.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== ListStyles =====

/// Styles used by the list widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListStyles {
    /// Column header row.
    pub header: Style,
    /// Row under the focus cursor.
    pub focused: Style,
    /// Checkbox of a selected row.
    pub checked: Style,
    /// Border of the block that owns keyboard input.
    pub active_border: Style,
    /// Border of the other blocks.
    pub inactive_border: Style,
    /// Failure banner.
    pub error: Style,
    /// Save notifications and progress hints.
    pub notice: Style,
    /// Key hints and placeholders.
    pub muted: Style,
}

impl ListStyles {
    /// Styles for the given color configuration.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        if config.colors_enabled() {
            Self {
                header: bold.fg(Color::Cyan),
                focused: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
                checked: Style::default().fg(Color::Green),
                active_border: Style::default().fg(Color::Yellow),
                inactive_border: Style::default().fg(Color::Gray),
                error: Style::default().fg(Color::White).bg(Color::Red),
                notice: Style::default().fg(Color::Green),
                muted: Style::default().fg(Color::DarkGray),
            }
        } else {
            Self {
                header: bold,
                focused: Style::default().add_modifier(Modifier::REVERSED),
                checked: Style::default(),
                active_border: bold,
                inactive_border: Style::default(),
                error: bold,
                notice: Style::default(),
                muted: Style::default(),
            }
        }
    }
}

impl Default for ListStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorless_styles_carry_no_colors() {
        let styles = ListStyles::with_color_config(ColorConfig::new(false));
        for style in [
            styles.header,
            styles.focused,
            styles.checked,
            styles.error,
            styles.notice,
        ] {
            assert_eq!(style.fg, None);
            assert_eq!(style.bg, None);
        }
    }

    #[test]
    fn focused_row_stays_distinguishable_without_colors() {
        let styles = ListStyles::with_color_config(ColorConfig::new(false));
        assert!(styles.focused.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn colored_error_banner_uses_red_background() {
        let styles = ListStyles::with_color_config(ColorConfig::new(true));
        assert_eq!(styles.error.bg, Some(Color::Red));
    }
}
