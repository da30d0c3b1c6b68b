//! synctable - an editable grid widget for terminal user interfaces.
//!
//! The caller owns the rows. [`EditableGrid`] renders them against a
//! [`Schema`] plus one blank row for new entries, and hands back a new
//! [`Rows`] value through [`GridAction::Changed`] whenever a cell is edited
//! or a row is deleted. Rows the edit did not touch are shared between the
//! old and the new collection.

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod logging;
pub mod ui;

pub use error::{AppError, Result};
pub use events::ClickBus;
pub use grid::{CellError, CellValue, Column, ColumnKind, ErrorMap, Row, Rows, Schema, SelectOption};
pub use ui::{EditableGrid, GridAction, GridProps};
