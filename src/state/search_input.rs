//! Search box editing (pure state transitions).
//!
//! The cursor is a character index, so multi-byte input edits cleanly.

/// Text and cursor of the search box.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchInput {
    text: String,
    cursor: usize,
}

impl SearchInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the box is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Insert a character at the cursor and advance it.
pub fn handle_char_input(mut input: SearchInput, ch: char) -> SearchInput {
    let at = input.byte_index(input.cursor);
    input.text.insert(at, ch);
    input.cursor += 1;
    input
}

/// Delete the character before the cursor. No-op at position 0.
pub fn handle_backspace(mut input: SearchInput) -> SearchInput {
    if input.cursor == 0 {
        return input;
    }
    let at = input.byte_index(input.cursor - 1);
    input.text.remove(at);
    input.cursor -= 1;
    input
}

/// Delete the character under the cursor. No-op at the end.
pub fn handle_delete(mut input: SearchInput) -> SearchInput {
    if input.cursor < input.char_len() {
        let at = input.byte_index(input.cursor);
        input.text.remove(at);
    }
    input
}

/// Move the cursor left, saturating at 0.
pub fn handle_cursor_left(mut input: SearchInput) -> SearchInput {
    input.cursor = input.cursor.saturating_sub(1);
    input
}

/// Move the cursor right, saturating at the text length.
pub fn handle_cursor_right(mut input: SearchInput) -> SearchInput {
    input.cursor = (input.cursor + 1).min(input.char_len());
    input
}

/// Move the cursor to the start.
pub fn handle_home(mut input: SearchInput) -> SearchInput {
    input.cursor = 0;
    input
}

/// Move the cursor to the end.
pub fn handle_end(mut input: SearchInput) -> SearchInput {
    input.cursor = input.char_len();
    input
}

/// Empty the box.
pub fn clear_input(_input: SearchInput) -> SearchInput {
    SearchInput::new()
}

#[cfg(test)]
#[path = "search_input_tests.rs"]
mod tests;
