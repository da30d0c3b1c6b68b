//! User interface components.
//!
//! This module contains the TUI rendering logic: the editable grid, the cell
//! editors it mounts, and the shared theme.

pub mod components;
pub mod theme;

pub use components::{render_help_bar, EditableGrid, GridAction, GridProps};
pub use theme::{init_theme, load_theme, theme, Theme};
