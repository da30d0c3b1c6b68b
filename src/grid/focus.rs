//! Render-scoped lookup of cell editor areas.
//!
//! The registry is rebuilt on every frame. It only remembers where each
//! editable cell was drawn so that focus can be handed to the next column
//! and clicks can be mapped back to cells; it owns none of the editors.

use std::collections::BTreeMap;

use ratatui::layout::{Position, Rect};

/// A (row, column) cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellPos {
    pub row: usize,
    pub column: usize,
}

impl CellPos {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Positions of the editable cells drawn in the last frame.
#[derive(Debug, Clone, Default)]
pub struct FocusRegistry {
    areas: BTreeMap<CellPos, Rect>,
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every registered cell.
    pub fn clear(&mut self) {
        self.areas.clear();
    }

    /// Record where the editor at `pos` was drawn.
    pub fn register(&mut self, pos: CellPos, area: Rect) {
        self.areas.insert(pos, area);
    }

    /// Area of the editor at `pos`, if it was drawn.
    pub fn area(&self, pos: CellPos) -> Option<Rect> {
        self.areas.get(&pos).copied()
    }

    pub fn is_registered(&self, pos: CellPos) -> bool {
        self.areas.contains_key(&pos)
    }

    /// The cell that should receive focus after an edit at `pos`.
    ///
    /// Only the immediately following column is considered; if it has no
    /// registered editor, focus stays put.
    pub fn next_after(&self, pos: CellPos) -> Option<CellPos> {
        let next = CellPos::new(pos.row, pos.column + 1);
        self.is_registered(next).then_some(next)
    }

    /// The registered cell under `position`.
    pub fn hit(&self, position: Position) -> Option<CellPos> {
        self.areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(pos, _)| *pos)
    }

    /// Number of registered rows.
    pub fn row_count(&self) -> usize {
        let mut rows: Vec<usize> = self.areas.keys().map(|p| p.row).collect();
        rows.dedup();
        rows.len()
    }
}
