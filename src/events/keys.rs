//! Key binding definitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A command bound to a key, as opposed to a keystroke meant for a cell editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move focus to the next column of the focused row.
    AdvanceFocus,
    /// Close the open menu, or leave the grid if none is open.
    Dismiss,
    /// Delete the focused row.
    DeleteRow,
    /// Move keyboard input to the next mounted table.
    SwitchTable,
    /// Quit the application.
    Quit,
}

/// Key binding configuration.
///
/// Plain characters are never bound: they always belong to the focused
/// cell editor.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyBindings;

impl KeyBindings {
    /// Create new key bindings.
    pub fn new() -> Self {
        Self
    }

    /// Look up the command bound to `key`.
    pub fn command_for(&self, key: &KeyEvent) -> Option<Command> {
        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::NONE) => Some(Command::AdvanceFocus),
            (KeyCode::Esc, _) => Some(Command::Dismiss),
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => Some(Command::DeleteRow),
            (KeyCode::F(2), _) => Some(Command::SwitchTable),
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => Some(Command::Quit),
            _ => None,
        }
    }
}
