//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps keyboard events to domain actions.
///
/// Only consulted while the list has focus. The search box handles its own
/// keys so that typed characters never trigger list actions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Kind and state flags are ignored so that terminals reporting extra
    /// keyboard state still match.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&KeyEvent::new(key.code, key.modifiers))
            .copied()
    }

    /// Bind `key` to `action`, replacing any existing binding.
    pub fn bind(&mut self, key: KeyEvent, action: KeyAction) {
        self.bindings.insert(key, action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        const NONE: KeyModifiers = KeyModifiers::NONE;
        const CTRL: KeyModifiers = KeyModifiers::CONTROL;

        let defaults = [
            // Focus movement
            (KeyCode::Char('k'), NONE, KeyAction::MoveUp),
            (KeyCode::Up, NONE, KeyAction::MoveUp),
            (KeyCode::Char('j'), NONE, KeyAction::MoveDown),
            (KeyCode::Down, NONE, KeyAction::MoveDown),
            (KeyCode::PageUp, NONE, KeyAction::PageUp),
            (KeyCode::Char('u'), CTRL, KeyAction::PageUp),
            (KeyCode::PageDown, NONE, KeyAction::PageDown),
            (KeyCode::Char('d'), CTRL, KeyAction::PageDown),
            (KeyCode::Char('g'), NONE, KeyAction::ScrollToTop),
            (KeyCode::Home, NONE, KeyAction::ScrollToTop),
            (KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::ScrollToBottom),
            (KeyCode::Char('G'), NONE, KeyAction::ScrollToBottom),
            (KeyCode::End, NONE, KeyAction::ScrollToBottom),
            // Selection
            (KeyCode::Char(' '), NONE, KeyAction::ToggleSelected),
            (KeyCode::Char('s'), NONE, KeyAction::ToggleShowSelected),
            // Query
            (KeyCode::Char('/'), NONE, KeyAction::FocusSearch),
            (KeyCode::Char('f'), CTRL, KeyAction::FocusSearch),
            (KeyCode::Char('f'), NONE, KeyAction::CycleFilterField),
            (KeyCode::Char('o'), NONE, KeyAction::CycleSort),
            // Failure handling
            (KeyCode::Char('r'), NONE, KeyAction::Retry),
            (KeyCode::Char('x'), NONE, KeyAction::DismissError),
            // Session
            (KeyCode::Enter, NONE, KeyAction::Save),
            (KeyCode::Char('s'), CTRL, KeyAction::Save),
            (KeyCode::Esc, NONE, KeyAction::Cancel),
            (KeyCode::Char('q'), NONE, KeyAction::Cancel),
            (KeyCode::Char('c'), CTRL, KeyAction::Cancel),
        ];

        let bindings = defaults
            .into_iter()
            .map(|(code, modifiers, action)| (KeyEvent::new(code, modifiers), action))
            .collect();

        Self { bindings }
    }
}
