//! Event handling for the application.
//!
//! This module turns terminal input into application events, maps key
//! presses to grid commands, and routes clicks to the grids listening for
//! clicks outside themselves.

mod click;
mod handler;
mod keys;

use crossterm::event::{KeyEvent, MouseEvent};

pub use click::{ClickBus, ListenerId};
pub use handler::EventHandler;
pub use keys::{Command, KeyBindings};

/// An application event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse button, wheel or drag event.
    Mouse(MouseEvent),
    /// The terminal was resized to (width, height).
    Resize(u16, u16),
    /// No input within the tick rate.
    Tick,
}
