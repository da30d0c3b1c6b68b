//! Reusable UI components.

mod dropdown;
mod duration_select;
mod grid;
mod help_bar;
mod input;
mod number_input;

pub use dropdown::{Choice, DropdownCell, FixedOptions, MenuHit, OptionSource, SelectAction, SelectCell};
pub use duration_select::{DurationOptions, DurationSelect};
pub use grid::{EditableGrid, GridAction, GridProps};
pub use help_bar::render_help_bar;
pub use input::TextInput;
pub use number_input::NumberInput;
