//! Layout dimension constants for TUI rendering.

/// Height of the search box in lines (border + input).
pub const SEARCH_INPUT_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Lines taken by the list block around its rows: two borders and the header.
pub const LIST_CHROME_HEIGHT: u16 = 3;

/// Width of the checkbox column, including the trailing space.
pub const CHECKBOX_WIDTH: u16 = 4;

/// Rows scrolled per mouse wheel notch.
pub const WHEEL_ROWS: i64 = 3;

/// How long a save notification stays in the status bar.
pub const TOAST_DURATION_MS: u64 = 2_500;

/// Upper bound on the event poll timeout while nothing is scheduled.
pub const IDLE_POLL_MS: u64 = 250;

/// Event poll timeout while a background fetch is outstanding.
pub const BUSY_POLL_MS: u64 = 16;
