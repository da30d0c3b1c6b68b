//! The editable grid component.
//!
//! `EditableGrid` renders a caller-owned [`Rows`] collection against a
//! [`Schema`], plus one trailing blank row for new entries. It owns no row
//! data: every accepted edit or deletion is handed back as
//! [`GridAction::Changed`] and the caller decides what to render next.
//!
//! The grid does own three small pieces of state between frames:
//! - the focused cell and its transient editor,
//! - the single open-menu pair ([`MenuState`]),
//! - the areas drawn in the last frame ([`FocusRegistry`]), used to move
//!   focus to the next column and to map clicks back to cells.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use heck::ToSnakeCase;
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, trace};

use super::dropdown::{DropdownCell, MenuHit, SelectAction};
use super::duration_select::DurationSelect;
use super::input::TextInput;
use super::number_input::NumberInput;
use crate::events::{ClickBus, Command, KeyBindings, ListenerId};
use crate::grid::{
    apply_edit, delete_row, CellEdit, CellPos, CellValue, Column, ColumnKind, ColumnWidth,
    ErrorMap, FocusRegistry, MenuState, Rows, Schema,
};
use crate::ui::theme::{cell_style, theme, CellStyle};

/// Width of the row-number column.
const INDEX_WIDTH: u16 = 4;
/// Width of the delete-marker column.
const DELETE_WIDTH: u16 = 3;
/// Header line plus separator line.
const HEADER_HEIGHT: u16 = 2;

/// Construction-time options of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridProps {
    /// Title of the table; also the source of its table id.
    pub table_name: String,
    /// Maximum rendered width in columns.
    pub max_width: u16,
    /// Master switch for painting the caller's error map.
    pub has_error: bool,
    /// Below this terminal width the grid stops forcing menu state.
    pub narrow_width: u16,
}

impl Default for GridProps {
    fn default() -> Self {
        Self {
            table_name: "Table".to_string(),
            max_width: 120,
            has_error: false,
            narrow_width: 45,
        }
    }
}

/// Action resulting from grid input.
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    /// The rows changed; the caller should store and render these.
    Changed(Rows),
}

/// The transient editor of the focused cell.
#[derive(Debug, Clone)]
enum CellEditor {
    Text(TextInput),
    Number(NumberInput),
    Dropdown(DropdownCell),
    Duration(DurationSelect),
}

impl CellEditor {
    /// Editor for `column` seeded with `value`. Display columns have none.
    fn for_column(column: &Column, value: Option<&CellValue>) -> Option<Self> {
        let text = value.map(|v| v.to_string());
        match &column.kind {
            ColumnKind::Display => None,
            ColumnKind::Text => Some(CellEditor::Text(TextInput::with_value(
                text.unwrap_or_default(),
            ))),
            ColumnKind::Number => Some(CellEditor::Number(NumberInput::with_value(
                value.and_then(CellValue::as_number),
            ))),
            ColumnKind::Dropdown { options, .. } => Some(CellEditor::Dropdown(
                DropdownCell::for_options(options.clone(), text.as_deref()),
            )),
            ColumnKind::Duration { .. } => Some(CellEditor::Duration(DurationSelect::for_value(
                text.as_deref(),
            ))),
        }
    }

    fn collapse(&mut self) {
        match self {
            CellEditor::Dropdown(select) => select.collapse(),
            CellEditor::Duration(select) => select.collapse(),
            CellEditor::Text(_) | CellEditor::Number(_) => {}
        }
    }

    fn is_expanded(&self) -> bool {
        match self {
            CellEditor::Dropdown(select) => select.is_expanded(),
            CellEditor::Duration(select) => select.is_expanded(),
            CellEditor::Text(_) | CellEditor::Number(_) => false,
        }
    }
}

/// What an editor produced for one input.
enum EditorOutcome {
    Value(Option<CellValue>),
    Select(SelectAction),
}

/// Editable grid component.
#[derive(Debug)]
pub struct EditableGrid {
    schema: Schema,
    props: GridProps,
    /// Snake-cased table name scoping click listeners to this instance.
    table_id: String,
    menu: MenuState,
    focus: Option<CellPos>,
    editor: Option<CellEditor>,
    registry: FocusRegistry,
    /// Delete markers drawn in the last frame, by row.
    delete_areas: BTreeMap<usize, Rect>,
    menu_hit: Option<MenuHit>,
    root_area: Rect,
    viewport_width: u16,
    body_height: usize,
    scroll: usize,
    listener: Option<ListenerId>,
    bindings: KeyBindings,
}

impl EditableGrid {
    /// Create a grid for `schema`.
    pub fn new(schema: Schema, props: GridProps) -> Self {
        let mut table_id = props.table_name.to_snake_case();
        if table_id.is_empty() {
            table_id = "table".to_string();
        }
        debug!(table = %table_id, columns = schema.len(), "Creating grid");
        Self {
            schema,
            table_id,
            menu: MenuState::new(),
            focus: None,
            editor: None,
            registry: FocusRegistry::new(),
            delete_areas: BTreeMap::new(),
            menu_hit: None,
            root_area: Rect::default(),
            viewport_width: u16::MAX,
            body_height: 0,
            scroll: 0,
            listener: None,
            bindings: KeyBindings::new(),
            props,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn props(&self) -> &GridProps {
        &self.props
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    /// The focused cell, if any.
    pub fn focused(&self) -> Option<CellPos> {
        self.focus
    }

    /// Area the grid occupied in the last frame.
    pub fn root_area(&self) -> Rect {
        self.root_area
    }

    /// Where the editor at `pos` was drawn in the last frame.
    pub fn cell_area(&self, pos: CellPos) -> Option<Rect> {
        self.registry.area(pos)
    }

    /// Where the delete marker of `row` was drawn in the last frame.
    pub fn delete_area(&self, row: usize) -> Option<Rect> {
        self.delete_areas.get(&row).copied()
    }

    /// Number of body rows drawn in the last frame.
    pub fn rendered_rows(&self) -> usize {
        self.registry.row_count()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    /// Record the terminal width (on resize).
    pub fn set_viewport_width(&mut self, width: u16) {
        self.viewport_width = width;
    }

    /// Menu state imposed on the editor of `row`.
    fn forced_menu(&self, row: usize) -> Option<bool> {
        self.menu
            .forced_for(row, self.viewport_width, self.props.narrow_width)
    }

    /// Whether `position` lies on this grid or its open menu.
    pub fn contains(&self, position: Position) -> bool {
        self.root_area.contains(position)
            || self.menu_hit.is_some_and(|hit| hit.area.contains(position))
    }

    /// Re-pair the click listener with the current menu state.
    ///
    /// The previous registration is always dropped first; a new one is
    /// made only while a menu is open.
    fn sync_click_listener(&mut self, bus: &mut ClickBus) {
        if let Some(id) = self.listener.take() {
            bus.unsubscribe(id);
        }
        if self.menu.is_open() {
            self.listener = Some(bus.subscribe(&self.table_id));
        }
    }

    /// Drop the click listener (when the grid is unmounted).
    pub fn detach(&mut self, bus: &mut ClickBus) {
        self.menu.close();
        self.sync_click_listener(bus);
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Focus the cell at `pos` and seed its editor from `rows`.
    pub fn focus_cell(&mut self, pos: CellPos, rows: &Rows, bus: &mut ClickBus) {
        let Some(column) = self.schema.get(pos.column) else {
            return;
        };
        let value = rows.get(pos.row).and_then(|row| row.get(&column.key));
        let Some(editor) = CellEditor::for_column(column, value) else {
            trace!(column = %column.key, "Column has no editor");
            return;
        };
        let has_menu = column.kind.has_menu();

        debug!(table = %self.table_id, row = pos.row, column = pos.column, "Focusing cell");
        self.focus = Some(pos);
        self.editor = Some(editor);
        if has_menu {
            self.menu.open_for(pos.row);
        } else {
            self.menu.close();
        }
        self.sync_click_listener(bus);
        self.scroll_to(pos.row);
    }

    /// Leave the grid: drop the editor and close the menu.
    pub fn blur(&mut self, bus: &mut ClickBus) {
        self.focus = None;
        self.editor = None;
        self.menu.close();
        self.sync_click_listener(bus);
    }

    /// Close the open menu without selecting.
    fn close_menu(&mut self, bus: &mut ClickBus) {
        self.menu.close();
        if let Some(editor) = self.editor.as_mut() {
            editor.collapse();
        }
        self.sync_click_listener(bus);
    }

    fn scroll_to(&mut self, row: usize) {
        if self.body_height == 0 {
            return;
        }
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + self.body_height {
            self.scroll = row + 1 - self.body_height;
        }
    }

    /// Apply an edit and sequence its side effects.
    fn commit(
        &mut self,
        rows: &Rows,
        edit: CellEdit,
        advance: bool,
        bus: &mut ClickBus,
    ) -> Option<GridAction> {
        // The blank row only becomes a row once something is written into it.
        if edit.row >= rows.len() && edit.value.is_none() && edit.payload.is_none() {
            trace!(table = %self.table_id, key = %edit.key, "Ignoring clear on blank row");
            return None;
        }

        let close = self
            .schema
            .column(&edit.key)
            .is_some_and(|c| c.kind.close_on_select());

        let next = apply_edit(rows, &self.schema, &edit, Self::today());
        if next.ptr_eq(rows) {
            return None;
        }

        if close {
            self.close_menu(bus);
        }
        if advance {
            if let Some(target) = self.focus.and_then(|pos| self.registry.next_after(pos)) {
                self.focus_cell(target, &next, bus);
            }
        }

        info!(
            table = %self.table_id,
            row = edit.row,
            key = %edit.key,
            rows = next.len(),
            "Cell edited"
        );
        Some(GridAction::Changed(next))
    }

    /// Delete `row` if it is a filled row.
    fn delete(&mut self, row: usize, rows: &Rows, bus: &mut ClickBus) -> Option<GridAction> {
        let next = delete_row(rows, row)?;
        self.blur(bus);
        info!(table = %self.table_id, row, rows = next.len(), "Row deleted");
        Some(GridAction::Changed(next))
    }

    fn apply_outcome(
        &mut self,
        pos: CellPos,
        outcome: EditorOutcome,
        rows: &Rows,
        bus: &mut ClickBus,
    ) -> Option<GridAction> {
        let key = self.schema.get(pos.column)?.key.clone();
        match outcome {
            EditorOutcome::Value(value) => {
                self.commit(rows, CellEdit::new(pos.row, key, value), false, bus)
            }
            EditorOutcome::Select(SelectAction::Open) => {
                self.menu.open_for(pos.row);
                self.sync_click_listener(bus);
                None
            }
            EditorOutcome::Select(SelectAction::Select(option)) => {
                let edit = CellEdit::new(pos.row, key, Some(CellValue::Text(option.value)))
                    .with_payload(option.details);
                self.commit(rows, edit, true, bus)
            }
            EditorOutcome::Select(SelectAction::Clear) => {
                self.commit(rows, CellEdit::new(pos.row, key, None), false, bus)
            }
        }
    }

    /// Handle keyboard input.
    ///
    /// `rows` is the caller's current collection. Returns the new rows when
    /// the input produced an accepted edit or deletion.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        rows: &Rows,
        bus: &mut ClickBus,
    ) -> Option<GridAction> {
        match self.bindings.command_for(&key) {
            Some(Command::AdvanceFocus) => {
                match self.focus {
                    Some(pos) => {
                        if let Some(target) = self.registry.next_after(pos) {
                            self.focus_cell(target, rows, bus);
                        }
                    }
                    None => {
                        if let Some(column) = self.schema.first_editable() {
                            self.focus_cell(CellPos::new(0, column), rows, bus);
                        }
                    }
                }
                return None;
            }
            Some(Command::Dismiss) => {
                let menu_shown = self.menu.is_open()
                    || self.editor.as_ref().is_some_and(CellEditor::is_expanded);
                if menu_shown {
                    self.close_menu(bus);
                } else {
                    self.blur(bus);
                }
                return None;
            }
            Some(Command::DeleteRow) => {
                let row = self.focus?.row;
                return self.delete(row, rows, bus);
            }
            Some(Command::SwitchTable) | Some(Command::Quit) => return None,
            None => {}
        }

        let pos = self.focus?;
        let forced = self.forced_menu(pos.row);
        let outcome = match self.editor.as_mut()? {
            CellEditor::Text(input) => input.handle_input(key).then(|| {
                let value = (!input.is_empty()).then(|| CellValue::text(input.value()));
                EditorOutcome::Value(value)
            }),
            CellEditor::Number(input) => input
                .handle_input(key)
                .map(|value| EditorOutcome::Value(value.map(CellValue::Number))),
            CellEditor::Dropdown(select) => {
                select.handle_input(key, forced).map(EditorOutcome::Select)
            }
            CellEditor::Duration(select) => {
                select.handle_input(key, forced).map(EditorOutcome::Select)
            }
        }?;
        self.apply_outcome(pos, outcome, rows, bus)
    }

    /// Handle a mouse event that happened on this grid (or its menu).
    pub fn handle_mouse(
        &mut self,
        mouse: MouseEvent,
        rows: &Rows,
        bus: &mut ClickBus,
    ) -> Option<GridAction> {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(position, rows, bus),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                if !self.root_area.contains(position) {
                    return None;
                }
                if matches!(self.editor, Some(CellEditor::Number(_))) {
                    trace!(table = %self.table_id, "Scroll suppressed over focused number cell");
                    return None;
                }
                if mouse.kind == MouseEventKind::ScrollDown {
                    self.scroll = (self.scroll + 1).min(rows.len());
                } else {
                    self.scroll = self.scroll.saturating_sub(1);
                }
                None
            }
            _ => None,
        }
    }

    fn handle_click(
        &mut self,
        position: Position,
        rows: &Rows,
        bus: &mut ClickBus,
    ) -> Option<GridAction> {
        if let (Some(hit), Some(pos)) = (self.menu_hit, self.focus) {
            if let Some(index) = hit.index_at(position.x, position.y) {
                let action = match self.editor.as_mut()? {
                    CellEditor::Dropdown(select) => select.select_at(index),
                    CellEditor::Duration(select) => select.select_at(index),
                    CellEditor::Text(_) | CellEditor::Number(_) => None,
                }?;
                return self.apply_outcome(pos, EditorOutcome::Select(action), rows, bus);
            }
        }

        if !self.root_area.contains(position) {
            return None;
        }

        let delete_hit = self
            .delete_areas
            .iter()
            .find(|(_, area)| area.contains(position))
            .map(|(row, _)| *row);
        if let Some(row) = delete_hit {
            return self.delete(row, rows, bus);
        }

        let pos = self.registry.hit(position)?;
        if self.focus == Some(pos) {
            let has_menu = self
                .schema
                .get(pos.column)
                .is_some_and(|c| c.kind.has_menu());
            if has_menu {
                if self.menu.is_open_for(pos.row) {
                    self.close_menu(bus);
                } else {
                    self.menu.open_for(pos.row);
                    self.sync_click_listener(bus);
                }
            }
        } else {
            self.focus_cell(pos, rows, bus);
        }
        None
    }

    /// Close the open menu if `position` is outside this grid.
    ///
    /// Called for every click while this grid's table id has a listener on
    /// the click bus.
    pub fn handle_outside_click(&mut self, position: Position, bus: &mut ClickBus) {
        if self.menu.is_open() && !self.contains(position) {
            debug!(table = %self.table_id, "Closing menu on outside click");
            self.close_menu(bus);
        }
    }

    fn column_constraints(&self) -> Vec<Constraint> {
        let mut constraints = Vec::with_capacity(self.schema.len() + 2);
        constraints.push(Constraint::Length(INDEX_WIDTH));
        constraints.extend(self.schema.columns().iter().map(|c| match c.width {
            Some(ColumnWidth::Percent(p)) => Constraint::Percentage(p),
            Some(ColumnWidth::Cells(n)) => Constraint::Length(n),
            None => Constraint::Fill(1),
        }));
        constraints.push(Constraint::Length(DELETE_WIDTH));
        constraints
    }

    /// Render the grid.
    ///
    /// Draws `rows.len() + 1` body rows (scrolled to fit), the last one
    /// being the blank template, and records every drawn area for focus
    /// and click handling.
    pub fn render(&mut self, frame: &mut Frame, area: Rect, rows: &Rows, errors: &ErrorMap) {
        let t = theme();
        let screen = frame.area();
        self.viewport_width = screen.width;
        self.registry.clear();
        self.delete_areas.clear();
        self.menu_hit = None;

        let root = Rect {
            width: area.width.min(self.props.max_width),
            ..area
        };
        self.root_area = root;
        let narrow = self.viewport_width < self.props.narrow_width;

        let border_color = if self.focus.is_some() {
            t.border_focused
        } else {
            t.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                format!(" {} ", self.props.table_name),
                Style::default().fg(t.header).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(root);
        frame.render_widget(block, root);
        if inner.height <= HEADER_HEIGHT || inner.width == 0 {
            self.body_height = 0;
            return;
        }

        let columns = Layout::horizontal(self.column_constraints())
            .spacing(1)
            .split(Rect { height: 1, ..inner });

        // Header
        let header_style = Style::default().fg(t.header).add_modifier(Modifier::BOLD);
        frame.render_widget(Paragraph::new(Span::styled("  #", header_style)), columns[0]);
        for (index, column) in self.schema.columns().iter().enumerate() {
            frame.render_widget(
                Paragraph::new(Span::styled(column.label.as_str(), header_style)),
                columns[index + 1],
            );
        }
        frame.buffer_mut().set_string(
            inner.x,
            inner.y + 1,
            "─".repeat(inner.width as usize),
            Style::default().fg(t.border),
        );

        // Body
        let body_top = inner.y + HEADER_HEIGHT;
        self.body_height = (inner.height - HEADER_HEIGHT) as usize;
        let total = rows.len() + 1;
        self.scroll = self.scroll.min(total - 1);

        for (line, index) in (self.scroll..total).take(self.body_height).enumerate() {
            let y = body_top + line as u16;
            let row = rows.get(index);
            let at = |rect: Rect| Rect {
                y,
                height: 1,
                ..rect
            };

            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{:>3}", index + 1),
                    Style::default().fg(t.fg),
                )),
                at(columns[0]),
            );

            for (ci, column) in self.schema.columns().iter().enumerate() {
                let cell = at(columns[ci + 1]);
                let pos = CellPos::new(index, ci);
                let flagged = self.props.has_error && errors.is_flagged(index, &column.key);
                let style = cell_style(flagged, true, narrow);
                let content = frame_cell(frame, cell, &style);

                if column.kind.is_editable() {
                    self.registry.register(pos, cell);
                }

                match (&self.editor, self.focus == Some(pos)) {
                    (Some(editor), true) => {
                        let forced = self.menu.forced_for(
                            index,
                            self.viewport_width,
                            self.props.narrow_width,
                        );
                        render_editor(frame, content, editor, &style, forced);
                    }
                    _ => {
                        let text = row
                            .and_then(|r| r.get(&column.key))
                            .map(|v| v.to_string())
                            .unwrap_or_default();
                        frame.render_widget(
                            Paragraph::new(Span::styled(text, style.text)),
                            content,
                        );
                    }
                }
            }

            if row.is_some() {
                let marker = at(columns[columns.len() - 1]);
                frame.render_widget(
                    Paragraph::new(Span::styled(" ✕", Style::default().fg(t.error))),
                    marker,
                );
                self.delete_areas.insert(index, marker);
            }
        }

        // Menu overlay, drawn last so it sits on top of the rows below.
        if let (Some(pos), Some(editor)) = (self.focus, self.editor.as_ref()) {
            let forced = self
                .menu
                .forced_for(pos.row, self.viewport_width, self.props.narrow_width);
            if let Some(cell) = self.registry.area(pos) {
                self.menu_hit = match editor {
                    CellEditor::Dropdown(select) if forced.unwrap_or(select.is_expanded()) => {
                        select.render_menu(frame, cell, screen)
                    }
                    CellEditor::Duration(select) if forced.unwrap_or(select.is_expanded()) => {
                        select.render_menu(frame, cell, screen)
                    }
                    _ => None,
                };
            }
        }
    }
}

/// Draw frame markers around a cell if its style asks for them.
///
/// Returns the area left for the content.
fn frame_cell(frame: &mut Frame, cell: Rect, style: &CellStyle) -> Rect {
    if !style.framed || cell.width < 3 {
        return cell;
    }
    let buffer = frame.buffer_mut();
    buffer.set_string(cell.x, cell.y, "[", style.edge);
    buffer.set_string(cell.x + cell.width - 1, cell.y, "]", style.edge);
    Rect {
        x: cell.x + 1,
        width: cell.width - 2,
        ..cell
    }
}

fn render_editor(
    frame: &mut Frame,
    area: Rect,
    editor: &CellEditor,
    style: &CellStyle,
    forced: Option<bool>,
) {
    let text_style = style.text.add_modifier(Modifier::BOLD);
    match editor {
        CellEditor::Text(input) => input.render(frame, area, text_style, true),
        CellEditor::Number(input) => input.render(frame, area, text_style, true),
        CellEditor::Dropdown(select) => {
            let expanded = forced.unwrap_or(select.is_expanded());
            select.render(frame, area, text_style, true, expanded);
        }
        CellEditor::Duration(select) => {
            let expanded = forced.unwrap_or(select.is_expanded());
            select.render(frame, area, text_style, true, expanded);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellError, Row, SelectOption};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn schema() -> Schema {
        Schema::new(vec![
            Column::dropdown(
                "country",
                "Country",
                vec![
                    SelectOption::new("IND", "IND").with_detail("label", "India"),
                    SelectOption::new("USA", "USA").with_detail("label", "United States"),
                ],
            )
            .copying_details(["label"]),
            Column::text("name", "Name"),
            Column::number("age", "Age"),
            Column::duration("term", "Term").closing_on_select(true),
            Column::display("label", "Label"),
        ])
        .unwrap()
    }

    fn rows() -> Rows {
        Rows::from(vec![
            Row::new().with("country", "IND").with("name", "Ada"),
            Row::new().with("name", "Linus").with("age", 54.0),
            Row::new().with("name", "Grace"),
        ])
    }

    fn grid() -> EditableGrid {
        EditableGrid::new(
            schema(),
            GridProps {
                table_name: "Shipment Lines".to_string(),
                ..GridProps::default()
            },
        )
    }

    fn draw(grid: &mut EditableGrid, rows: &Rows, errors: &ErrorMap, width: u16) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(width, 16)).unwrap();
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, frame.area().width, 12);
                grid.render(frame, area, rows, errors);
            })
            .unwrap();
        terminal
    }

    fn screen_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|cells| cells.iter().map(|c| c.symbol()).collect())
            .collect()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(area: Rect) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: area.x,
            row: area.y,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn changed(action: Option<GridAction>) -> Rows {
        match action {
            Some(GridAction::Changed(rows)) => rows,
            None => panic!("expected a change"),
        }
    }

    #[test]
    fn test_table_id_is_snake_case() {
        assert_eq!(grid().table_id(), "shipment_lines");
    }

    #[test]
    fn test_renders_rows_plus_blank() {
        let mut grid = grid();
        let rows = rows();
        let terminal = draw(&mut grid, &rows, &ErrorMap::new(), 100);

        assert_eq!(grid.rendered_rows(), rows.len() + 1);
        let text = screen_lines(&terminal).join("\n");
        assert!(text.contains("Shipment Lines"));
        assert!(text.contains("Country"));
        assert!(text.contains("Linus"));
        assert!(text.contains("  4"));
    }

    #[test]
    fn test_delete_marker_only_on_filled_rows() {
        let mut grid = grid();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        assert!(grid.delete_area(2).is_some());
        assert!(grid.delete_area(3).is_none());
    }

    #[test]
    fn test_click_delete_removes_row() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        let marker = grid.delete_area(0).unwrap();
        let next = changed(grid.handle_mouse(click(marker), &rows, &mut bus));
        assert_eq!(next.len(), 2);
        assert_eq!(next.get(0), rows.get(1));
    }

    #[test]
    fn test_ctrl_d_on_blank_row_does_nothing() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(3, 1), &rows, &mut bus);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert!(grid.handle_key(ctrl_d, &rows, &mut bus).is_none());

        grid.focus_cell(CellPos::new(1, 1), &rows, &mut bus);
        let next = changed(grid.handle_key(ctrl_d, &rows, &mut bus));
        assert_eq!(next.len(), 2);
    }

    #[test]
    fn test_typing_in_blank_row_appends_once() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(3, 1), &rows, &mut bus);
        let once = changed(grid.handle_key(key(KeyCode::Char('B')), &rows, &mut bus));
        assert_eq!(once.len(), 4);

        let twice = changed(grid.handle_key(key(KeyCode::Char('o')), &once, &mut bus));
        assert_eq!(twice.len(), 4);
        assert_eq!(twice.get(3).unwrap().get("name"), Some(&CellValue::text("Bo")));
        assert!(twice.shares_row(&rows, 0));
    }

    #[test]
    fn test_emptied_text_cell_unsets_key() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let mut rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(0, 1), &rows, &mut bus);
        for _ in "Ada".chars() {
            rows = changed(grid.handle_key(key(KeyCode::Backspace), &rows, &mut bus));
        }
        let row = rows.get(0).unwrap();
        assert!(!row.is_set("name"));
        assert_eq!(row.get("country"), Some(&CellValue::text("IND")));
    }

    #[test]
    fn test_clearing_empty_select_on_blank_row_is_no_change() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        for column in [0, 3] {
            grid.focus_cell(CellPos::new(3, column), &rows, &mut bus);
            assert!(grid.handle_key(key(KeyCode::Backspace), &rows, &mut bus).is_none());
            assert!(grid.handle_key(key(KeyCode::Delete), &rows, &mut bus).is_none());
        }
        assert_eq!(rows.len(), 3);
        assert_eq!(grid.rendered_rows(), 4);
    }

    #[test]
    fn test_clearing_already_empty_select_is_no_change() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        // Row 1 has no country, row 2 has no term.
        for pos in [CellPos::new(1, 0), CellPos::new(2, 3)] {
            grid.focus_cell(pos, &rows, &mut bus);
            assert!(grid.handle_key(key(KeyCode::Backspace), &rows, &mut bus).is_none());
        }

        // A stored value still clears, and only once.
        grid.focus_cell(CellPos::new(0, 0), &rows, &mut bus);
        let next = changed(grid.handle_key(key(KeyCode::Backspace), &rows, &mut bus));
        assert!(!next.get(0).unwrap().is_set("country"));
        assert!(!next.get(0).unwrap().is_set("label"));
        assert!(grid.handle_key(key(KeyCode::Backspace), &next, &mut bus).is_none());
    }

    #[test]
    fn test_number_cell_guards_keystrokes() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let mut rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(0, 2), &rows, &mut bus);
        for c in "12.34".chars() {
            rows = changed(grid.handle_key(key(KeyCode::Char(c)), &rows, &mut bus));
        }
        assert!(grid.handle_key(key(KeyCode::Char('5')), &rows, &mut bus).is_none());
        assert!(grid.handle_key(key(KeyCode::Char('x')), &rows, &mut bus).is_none());
        assert_eq!(rows.get(0).unwrap().get("age"), Some(&CellValue::Number(12.34)));
        // Number edits keep focus in place.
        assert_eq!(grid.focused(), Some(CellPos::new(0, 2)));
    }

    #[test]
    fn test_scroll_suppressed_on_focused_number_cell() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        let scroll = |area: Rect| MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: area.x,
            row: area.y,
            modifiers: KeyModifiers::NONE,
        };
        let cell = grid.cell_area(CellPos::new(0, 2)).unwrap();

        grid.focus_cell(CellPos::new(0, 2), &rows, &mut bus);
        assert!(grid.handle_mouse(scroll(cell), &rows, &mut bus).is_none());
        assert_eq!(grid.scroll_offset(), 0);

        grid.focus_cell(CellPos::new(0, 1), &rows, &mut bus);
        grid.handle_mouse(scroll(cell), &rows, &mut bus);
        assert_eq!(grid.scroll_offset(), 1);
    }

    #[test]
    fn test_select_copies_detail_and_advances_focus() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(1, 0), &rows, &mut bus);
        assert!(grid.menu().is_open_for(1));

        grid.handle_key(key(KeyCode::Down), &rows, &mut bus);
        let next = changed(grid.handle_key(key(KeyCode::Enter), &rows, &mut bus));

        let row = next.get(1).unwrap();
        assert_eq!(row.get("country"), Some(&CellValue::text("USA")));
        assert_eq!(row.get("label"), Some(&CellValue::text("United States")));
        assert_eq!(grid.focused(), Some(CellPos::new(1, 1)));
        // Focus moved to a text cell, so no menu stays open.
        assert!(!grid.menu().is_open());
    }

    #[test]
    fn test_close_on_select_on_last_editable_column() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(0, 3), &rows, &mut bus);
        grid.handle_key(key(KeyCode::Char('2')), &rows, &mut bus);
        let next = changed(grid.handle_key(key(KeyCode::Enter), &rows, &mut bus));

        assert_eq!(next.get(0).unwrap().get("term"), Some(&CellValue::text("2 Days")));
        // The next column is display-only: focus stays, menu closes.
        assert_eq!(grid.focused(), Some(CellPos::new(0, 3)));
        assert!(!grid.menu().is_open());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_opening_menu_in_other_row_closes_first() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(0, 0), &rows, &mut bus);
        assert!(grid.menu().is_open_for(0));

        let target = grid.cell_area(CellPos::new(2, 0)).unwrap();
        grid.handle_mouse(click(target), &rows, &mut bus);
        assert!(!grid.menu().is_open_for(0));
        assert!(grid.menu().is_open_for(2));
        assert_eq!(bus.listeners_for(grid.table_id()), 1);
    }

    #[test]
    fn test_outside_click_closes_menu() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(0, 0), &rows, &mut bus);
        assert!(bus.is_listening(grid.table_id()));

        // Inside the table: nothing happens.
        grid.handle_outside_click(Position::new(2, 2), &mut bus);
        assert!(grid.menu().is_open());

        grid.handle_outside_click(Position::new(5, 15), &mut bus);
        assert!(!grid.menu().is_open());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_listener_churn_never_leaks() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        for row in 0..4 {
            grid.focus_cell(CellPos::new(row, 0), &rows, &mut bus);
            assert_eq!(bus.listener_count(), 1);
            grid.handle_key(key(KeyCode::Esc), &rows, &mut bus);
            assert_eq!(bus.listener_count(), 0);
            grid.handle_key(key(KeyCode::Char('I')), &rows, &mut bus);
            assert_eq!(bus.listener_count(), 1);
        }
        grid.detach(&mut bus);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_click_on_menu_entry_selects() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(2, 0), &rows, &mut bus);
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        let menu = grid.menu_hit.expect("menu drawn");
        let entry = Rect::new(menu.inner.x, menu.inner.y + 1, 1, 1);
        let next = changed(grid.handle_mouse(click(entry), &rows, &mut bus));
        assert_eq!(next.get(2).unwrap().get("country"), Some(&CellValue::text("USA")));
    }

    #[test]
    fn test_narrow_viewport_leaves_menu_to_editor() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 40);

        grid.focus_cell(CellPos::new(0, 0), &rows, &mut bus);
        // Not forced open: Enter opens the editor's own menu instead of selecting.
        assert!(grid.handle_key(key(KeyCode::Enter), &rows, &mut bus).is_none());
        let next = changed(grid.handle_key(key(KeyCode::Enter), &rows, &mut bus));
        assert_eq!(next.get(0).unwrap().get("country"), Some(&CellValue::text("IND")));
    }

    #[test]
    fn test_tab_advances_and_stops_before_display_column() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        let tab = key(KeyCode::Tab);
        grid.handle_key(tab, &rows, &mut bus);
        assert_eq!(grid.focused(), Some(CellPos::new(0, 0)));
        for _ in 0..3 {
            grid.handle_key(tab, &rows, &mut bus);
        }
        assert_eq!(grid.focused(), Some(CellPos::new(0, 3)));
        grid.handle_key(tab, &rows, &mut bus);
        assert_eq!(grid.focused(), Some(CellPos::new(0, 3)));
    }

    #[test]
    fn test_error_map_painted_only_with_master_switch() {
        let rows = rows();
        let errors = ErrorMap::new().with(1, "name", CellError::Flag(true));

        let mut plain = grid();
        draw(&mut plain, &rows, &errors, 100);
        let cell = plain.cell_area(CellPos::new(1, 1)).unwrap();
        let terminal = draw(&mut plain, &rows, &errors, 100);
        assert_ne!(terminal.backend().buffer()[(cell.x, cell.y)].symbol(), "[");

        let mut flagged = EditableGrid::new(
            schema(),
            GridProps {
                has_error: true,
                ..GridProps::default()
            },
        );
        let terminal = draw(&mut flagged, &rows, &errors, 100);
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(cell.x, cell.y)].symbol(), "[");
        assert_eq!(buffer[(cell.x, cell.y)].fg, theme().error);
    }

    #[test]
    fn test_display_cells_not_focusable() {
        let mut grid = grid();
        let mut bus = ClickBus::new();
        let rows = rows();
        draw(&mut grid, &rows, &ErrorMap::new(), 100);

        grid.focus_cell(CellPos::new(0, 4), &rows, &mut bus);
        assert_eq!(grid.focused(), None);
        assert!(grid.cell_area(CellPos::new(0, 4)).is_none());
    }
}
