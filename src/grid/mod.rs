//! Editable grid data model.
//!
//! Everything here is independent of rendering: the schema, the immutable
//! row collection, the edit/delete operations, and the small pieces of state
//! the grid component keeps between frames (open menu, focus registry).

pub mod coerce;
pub mod duration;
pub mod focus;
pub mod menu;
pub mod row;
pub mod schema;
pub mod sync;

pub use coerce::{coerce_number, Coercion};
pub use duration::{leading_quantity, options_for, parse_quantity, DurationUnit};
pub use focus::{CellPos, FocusRegistry};
pub use menu::MenuState;
pub use row::{CellError, CellValue, ErrorMap, Row, Rows};
pub use schema::{Column, ColumnKind, ColumnWidth, Schema, SchemaError, SelectOption, SidePayload};
pub use sync::{apply_edit, delete_row, empty_row, is_row_filled, CellEdit};
