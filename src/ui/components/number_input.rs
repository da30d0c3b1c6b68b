//! Numeric cell editor.
//!
//! Every keystroke is applied to a scratch copy of the buffer and run through
//! [`coerce_number`]; rejected keystrokes are dropped without a trace in the
//! buffer or the row.

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, style::Style, Frame};
use tracing::trace;

use super::input::TextInput;
use crate::grid::{coerce_number, Coercion};

/// Editor for number cells.
#[derive(Debug, Clone, Default)]
pub struct NumberInput {
    buffer: TextInput,
}

impl NumberInput {
    /// Create an editor showing `value`.
    pub fn with_value(value: Option<f64>) -> Self {
        let text = value.map(|v| v.to_string()).unwrap_or_default();
        Self {
            buffer: TextInput::with_value(text),
        }
    }

    /// Current buffer text.
    pub fn text(&self) -> &str {
        self.buffer.value()
    }

    /// Handle a keystroke.
    ///
    /// Returns `Some(value)` when the keystroke changed the buffer and was
    /// accepted, with `value = None` meaning the cell was cleared. Returns
    /// `None` for cursor movement and for rejected keystrokes.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<Option<f64>> {
        let mut candidate = self.buffer.clone();
        if !candidate.handle_input(key) {
            self.buffer = candidate;
            return None;
        }
        match coerce_number(candidate.value()) {
            Coercion::Rejected => {
                trace!(text = candidate.value(), "Rejected numeric keystroke");
                None
            }
            Coercion::Cleared => {
                self.buffer = candidate;
                Some(None)
            }
            Coercion::Value(value) => {
                self.buffer = candidate;
                Some(Some(value))
            }
        }
    }

    /// Render the editor.
    pub fn render(&self, frame: &mut Frame, area: Rect, style: Style, focused: bool) {
        self.buffer.render(frame, area, style, focused);
    }
}
