//! Open-dropdown tracking.
//!
//! A grid has at most one open menu. The state is a single `(row, open)`
//! pair: opening a menu in one row implicitly closes the menu of any other.

/// The single open/closed menu pair owned by a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    /// Row whose menu was last opened.
    row: Option<usize>,
    /// Whether that menu is open.
    open: bool,
}

impl MenuState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the menu of `row`, closing any other.
    pub fn open_for(&mut self, row: usize) {
        self.row = Some(row);
        self.open = true;
    }

    /// Close whichever menu is open.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Row whose menu was last opened, open or not.
    pub fn current_row(&self) -> Option<usize> {
        self.row
    }

    /// Whether the menu of `row` is open.
    pub fn is_open_for(&self, row: usize) -> bool {
        self.open && self.row == Some(row)
    }

    /// Menu state the grid imposes on the editor of `row`.
    ///
    /// Below `narrow_width` columns the grid imposes nothing and the editor
    /// keeps its own expanded flag.
    pub fn forced_for(&self, row: usize, viewport_width: u16, narrow_width: u16) -> Option<bool> {
        if viewport_width < narrow_width {
            None
        } else {
            Some(self.is_open_for(row))
        }
    }
}
