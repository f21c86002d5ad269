//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
/// Text typed into the search box never goes through this mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Focus movement
    /// Move the row focus up by one row. Default: k/↑
    MoveUp,
    /// Move the row focus down by one row. Default: j/↓
    MoveDown,
    /// Move the row focus up by one viewport. Default: Ctrl+u/Page Up
    PageUp,
    /// Move the row focus down by one viewport. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the first row. Default: g/Home
    ScrollToTop,
    /// Jump to the last loaded row. Default: G/End
    ScrollToBottom,

    // Selection
    /// Select or deselect the focused row. Default: Space
    ToggleSelected,
    /// Switch between all rows and selected rows only. Default: s
    ToggleShowSelected,

    // Query
    /// Enter the search box. Default: / or Ctrl+f
    FocusSearch,
    /// Search on the next configured field. Default: f
    CycleFilterField,
    /// Cycle the sort on the filter field: none → asc → desc. Default: o
    CycleSort,

    // Failure handling
    /// Retry the failed fetch. Default: r
    Retry,
    /// Hide the failure banner. Default: x
    DismissError,

    // Session
    /// Commit the selection and close. Default: Enter or Ctrl+s
    Save,
    /// Discard the selection and close. Default: Esc, q or Ctrl+c
    Cancel,
}
