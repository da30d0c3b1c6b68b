//! Applying cell edits and deletions to the caller's rows.
//!
//! Every function here is pure: it takes the current [`Rows`] and returns a
//! new collection. Side effects that depend on the edit (closing the menu,
//! moving focus, notifying the caller) are sequenced by the grid component.

use chrono::NaiveDate;
use tracing::{debug, trace};

use super::row::{CellValue, Row, Rows};
use super::schema::{Schema, SidePayload};

/// Format used for date stamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One cell edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    /// Target row; an index at or past the end targets the blank trailing row.
    pub row: usize,
    /// Target field key.
    pub key: String,
    /// New value, `None` to unset.
    pub value: Option<CellValue>,
    /// Side payload delivered with a selection.
    pub payload: Option<SidePayload>,
}

impl CellEdit {
    pub fn new(row: usize, key: impl Into<String>, value: Option<CellValue>) -> Self {
        Self {
            row,
            key: key.into(),
            value,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: SidePayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// The template shown as the trailing blank row: nothing set.
pub fn empty_row() -> Row {
    Row::new()
}

/// Whether `index` is a real row rather than the trailing template.
pub fn is_row_filled(rows: &Rows, index: usize) -> bool {
    index < rows.len()
}

/// Apply `edit` and return the resulting rows.
///
/// An edit past the end appends exactly one row built from the template.
/// An edit whose key is not an editable column of `schema` changes nothing
/// and hands back `rows` itself.
pub fn apply_edit(rows: &Rows, schema: &Schema, edit: &CellEdit, today: NaiveDate) -> Rows {
    let Some(column) = schema.column(&edit.key) else {
        debug!(key = %edit.key, "Ignoring edit for unknown column");
        return rows.clone();
    };
    if !column.kind.is_editable() {
        debug!(key = %edit.key, "Ignoring edit for display column");
        return rows.clone();
    }

    let mut row = rows.get(edit.row).cloned().unwrap_or_else(empty_row);

    if let Some(field) = &column.stamp_date {
        if !row.is_set(field) {
            row.set(
                field.clone(),
                CellValue::Text(today.format(DATE_FORMAT).to_string()),
            );
        }
    }

    match &edit.value {
        Some(value) => row.set(edit.key.clone(), value.clone()),
        None => row.unset(&edit.key),
    }

    for detail in &column.copy_details {
        match edit.payload.as_ref().and_then(|p| p.get(detail)) {
            Some(value) => row.set(detail.clone(), value.clone()),
            None => row.unset(detail),
        }
    }

    if edit.row < rows.len() {
        trace!(row = edit.row, key = %edit.key, "Updating row");
        rows.replace(edit.row, row)
    } else {
        debug!(row = rows.len(), key = %edit.key, "Materializing blank row");
        rows.push(row)
    }
}

/// Remove row `index`, shifting later rows down.
///
/// Returns `None` for the trailing template (or anything past it), which
/// cannot be deleted.
pub fn delete_row(rows: &Rows, index: usize) -> Option<Rows> {
    if !is_row_filled(rows, index) {
        return None;
    }
    debug!(row = index, "Deleting row");
    Some(rows.remove(index))
}
