//! Single-line text input used inside grid cells.
//!
//! This module provides the text buffer shared by the text, number and
//! select editors, with support for:
//! - Character input and deletion
//! - Cursor movement (left/right, home/end)
//! - Readline-style shortcuts (Ctrl+U, Ctrl+W)

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// A single-line text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// The current input value.
    value: String,
    /// Cursor position as a byte offset on a char boundary.
    cursor: usize,
    /// Placeholder text shown when empty.
    placeholder: String,
}

impl TextInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input with an initial value, cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self {
            value,
            cursor,
            placeholder: String::new(),
        }
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Get the current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Clear the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Check if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Get the cursor position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn prev_boundary(&self) -> usize {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.value.len())
    }

    /// Handle keyboard input.
    ///
    /// Returns true if the value was modified.
    pub fn handle_input(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                true
            }
            (KeyCode::Backspace, _) => {
                if self.cursor > 0 {
                    let start = self.prev_boundary();
                    self.value.replace_range(start..self.cursor, "");
                    self.cursor = start;
                    true
                } else {
                    false
                }
            }
            (KeyCode::Delete, _) => {
                if self.cursor < self.value.len() {
                    let end = self.next_boundary();
                    self.value.replace_range(self.cursor..end, "");
                    true
                } else {
                    false
                }
            }
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.prev_boundary();
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                self.cursor = self.next_boundary();
                false
            }
            (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => {
                self.cursor = 0;
                false
            }
            (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => {
                self.cursor = self.value.len();
                false
            }
            // Ctrl+U - clear line
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.value.is_empty() {
                    false
                } else {
                    self.clear();
                    true
                }
            }
            // Ctrl+W - delete word before cursor
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor == 0 {
                    return false;
                }
                let before = self.value[..self.cursor].trim_end();
                let word_start = before
                    .rfind(|c: char| !c.is_alphanumeric())
                    .map(|i| i + before[i..].chars().next().map_or(1, char::len_utf8))
                    .unwrap_or(0);
                self.value.replace_range(word_start..self.cursor, "");
                self.cursor = word_start;
                true
            }
            _ => false,
        }
    }

    /// Render the input into a one-line area.
    ///
    /// The cursor is placed when `focused` and it falls inside the area.
    pub fn render(&self, frame: &mut Frame, area: Rect, style: Style, focused: bool) {
        let span = if self.value.is_empty() && !self.placeholder.is_empty() {
            Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(theme().input_placeholder),
            )
        } else {
            Span::styled(self.value.as_str(), style)
        };
        frame.render_widget(Paragraph::new(span), area);

        if focused {
            let offset = self.value[..self.cursor].chars().count() as u16;
            let cursor_x = area.x.saturating_add(offset);
            if cursor_x < area.x + area.width {
                frame.set_cursor_position(Position::new(cursor_x, area.y));
            }
        }
    }
}
