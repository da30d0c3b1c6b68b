//! Demo application state and event loop.
//!
//! This module implements The Elm Architecture (TEA): events go through
//! [`App::update`], the screen is drawn by [`App::view`]. The app owns the
//! row data of every mounted grid and stores whatever each grid hands back
//! in [`GridAction::Changed`], as an `onChange` consumer would.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::config::Settings;
use crate::events::{ClickBus, Command, Event, KeyBindings};
use crate::grid::{
    CellError, Column, ColumnKind, ColumnWidth, ErrorMap, Rows, Schema, SchemaError, SelectOption,
};
use crate::ui::{render_help_bar, theme, EditableGrid, GridAction, GridProps};

/// Hints shown in the footer.
const HELP_HINTS: &str =
    "[Tab] next cell  [Enter] open/select  [Esc] close  [Ctrl+D] delete row  [F2] switch table  [Ctrl+Q] quit";

/// Upper bound for values in an `age` column.
const MAX_AGE: f64 = 120.0;

/// One mounted grid and the data it renders.
struct TableSlot {
    grid: EditableGrid,
    rows: Rows,
    errors: ErrorMap,
}

/// The demo application.
pub struct App {
    tables: Vec<TableSlot>,
    /// Index of the table receiving keyboard input.
    active: usize,
    bus: ClickBus,
    bindings: KeyBindings,
    settings: Settings,
    should_quit: bool,
    /// Summary of the last change, for the header.
    status: Option<String>,
}

impl App {
    /// Create the app with the two built-in demo tables.
    pub fn demo(settings: Settings) -> Result<Self, SchemaError> {
        Ok(Self::with_tables(settings, demo_tables()?))
    }

    /// Create the app with the given `(table name, schema)` pairs.
    pub fn with_tables(settings: Settings, tables: Vec<(String, Schema)>) -> Self {
        debug!(tables = tables.len(), "Creating application");
        let tables = tables
            .into_iter()
            .map(|(name, schema)| {
                let props = GridProps {
                    table_name: name,
                    max_width: settings.max_width,
                    has_error: true,
                    narrow_width: settings.narrow_width,
                };
                TableSlot {
                    grid: EditableGrid::new(schema, props),
                    rows: Rows::new(),
                    errors: ErrorMap::new(),
                }
            })
            .collect();

        Self {
            tables,
            active: 0,
            bus: ClickBus::new(),
            bindings: KeyBindings::new(),
            settings,
            should_quit: false,
            status: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Index of the table receiving keyboard input.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Current rows of table `index`.
    pub fn rows(&self, index: usize) -> Option<&Rows> {
        self.tables.get(index).map(|t| &t.rows)
    }

    /// Current validation errors of table `index`.
    pub fn errors(&self, index: usize) -> Option<&ErrorMap> {
        self.tables.get(index).map(|t| &t.errors)
    }

    pub fn grid(&self, index: usize) -> Option<&EditableGrid> {
        self.tables.get(index).map(|t| &t.grid)
    }

    pub fn click_bus(&self) -> &ClickBus {
        &self.bus
    }

    /// Update the application state based on an event.
    pub fn update(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                trace!(key = ?key.code, modifiers = ?key.modifiers, "Key event");
                match self.bindings.command_for(&key) {
                    Some(Command::Quit) => self.quit(),
                    Some(Command::SwitchTable) => self.switch_table(),
                    _ => {
                        let Some(slot) = self.tables.get_mut(self.active) else {
                            return;
                        };
                        let action = slot.grid.handle_key(key, &slot.rows, &mut self.bus);
                        self.apply(self.active, action);
                    }
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
                for slot in &mut self.tables {
                    slot.grid.set_viewport_width(width);
                }
            }
            Event::Tick => {}
        }
    }

    fn quit(&mut self) {
        info!("Quit requested");
        for slot in &mut self.tables {
            slot.grid.detach(&mut self.bus);
        }
        self.should_quit = true;
    }

    fn switch_table(&mut self) {
        if self.tables.len() < 2 {
            return;
        }
        if let Some(slot) = self.tables.get_mut(self.active) {
            slot.grid.blur(&mut self.bus);
        }
        self.active = (self.active + 1) % self.tables.len();
        debug!(active = self.active, "Switched table");
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);

        // Document-level click listeners run before the click reaches a grid.
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) {
            for slot in &mut self.tables {
                if self.bus.is_listening(slot.grid.table_id()) {
                    slot.grid.handle_outside_click(position, &mut self.bus);
                }
            }
        }

        let Some(index) = self.tables.iter().position(|t| t.grid.contains(position)) else {
            return;
        };
        if mouse.kind == MouseEventKind::Down(MouseButton::Left) && index != self.active {
            if let Some(slot) = self.tables.get_mut(self.active) {
                slot.grid.blur(&mut self.bus);
            }
            self.active = index;
        }

        let slot = &mut self.tables[index];
        let action = slot.grid.handle_mouse(mouse, &slot.rows, &mut self.bus);
        self.apply(index, action);
    }

    /// Store the rows handed back by table `index`.
    fn apply(&mut self, index: usize, action: Option<GridAction>) {
        let Some(GridAction::Changed(rows)) = action else {
            return;
        };
        let Some(slot) = self.tables.get_mut(index) else {
            return;
        };

        match serde_json::to_string(&rows) {
            Ok(json) => info!(table = %slot.grid.table_id(), data = %json, "Table changed"),
            Err(e) => warn!(error = %e, "Failed to serialize rows"),
        }

        slot.errors = validate(slot.grid.schema(), &rows);
        self.status = Some(format!(
            "{}: {} row(s)",
            slot.grid.props().table_name,
            rows.len()
        ));
        slot.rows = rows;
    }

    /// Render the application UI.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(self.tables.iter().map(|_| Constraint::Fill(1)));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::vertical(constraints).split(area);

        self.render_header(frame, chunks[0]);
        // Grids are drawn bottom-up so a menu opening downwards from an upper
        // grid is painted over the grid below it.
        for (index, slot) in self.tables.iter_mut().enumerate().rev() {
            slot.grid
                .render(frame, chunks[index + 1], &slot.rows, &slot.errors);
        }
        render_help_bar(frame, chunks[chunks.len() - 1], HELP_HINTS);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let mut spans = vec![Span::styled(
            " synctable ",
            Style::default()
                .fg(t.bg)
                .bg(t.accent)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(slot) = self.tables.get(self.active) {
            spans.push(Span::styled(
                format!(" editing {} ", slot.grid.props().table_name),
                Style::default().fg(t.fg),
            ));
        }
        if let Some(status) = &self.status {
            spans.push(Span::styled(
                format!(" {}", status),
                Style::default().fg(t.input_placeholder),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

/// Caller-side validation producing the error map the grids paint.
///
/// Values in an `age` column above 120 and filled rows without a `name`
/// are flagged.
pub fn validate(schema: &Schema, rows: &Rows) -> ErrorMap {
    let mut errors = ErrorMap::new();
    let has_name = schema.column("name").is_some();
    let has_age = schema
        .column("age")
        .is_some_and(|c| matches!(c.kind, ColumnKind::Number));

    for (index, row) in rows.iter().enumerate() {
        if has_age {
            if let Some(age) = row.get("age").and_then(|v| v.as_number()) {
                if age > MAX_AGE {
                    errors.mark(index, "age", CellError::Message(format!("at most {}", MAX_AGE)));
                }
            }
        }
        if has_name && !row.is_set("name") {
            errors.mark(index, "name", CellError::Flag(true));
        }
    }
    errors
}

/// The two tables mounted by the demo.
pub fn demo_tables() -> Result<Vec<(String, Schema)>, SchemaError> {
    Ok(vec![
        ("Dummy Table".to_string(), dummy_schema()?),
        ("Contacts".to_string(), contacts_schema()?),
    ])
}

fn country(code: &str, name: &str) -> SelectOption {
    SelectOption::new(code, code).with_detail("country_name", name)
}

fn plain_options(values: &[&str]) -> Vec<SelectOption> {
    values.iter().map(|v| SelectOption::new(*v, *v)).collect()
}

fn dummy_schema() -> Result<Schema, SchemaError> {
    let columns = vec![
        Column::dropdown(
            "country",
            "Country",
            vec![
                country("IND", "India"),
                country("USA", "United States"),
                country("GHI", "Ghana"),
            ],
        )
        .copying_details(["country_name"])
        .with_width(ColumnWidth::Percent(15)),
        Column::dropdown("state", "State", plain_options(&["MH", "UP", "MP", "GUJ"]))
            .with_width(ColumnWidth::Percent(12)),
        Column::text("name", "Name")
            .stamping_date("created_on")
            .with_width(ColumnWidth::Percent(18)),
        Column::number("age", "Age").with_width(ColumnWidth::Percent(10)),
        Column::duration("tenure", "Tenure").closing_on_select(true),
        Column::display("country_name", "Country name"),
        Column::display("created_on", "Created"),
    ];
    Schema::new(columns)
}

fn contacts_schema() -> Result<Schema, SchemaError> {
    let columns = vec![
        Column::text("name", "Name").with_width(ColumnWidth::Percent(25)),
        Column::text("email", "Email").with_width(ColumnWidth::Percent(30)),
        Column::dropdown(
            "role",
            "Role",
            plain_options(&["Owner", "Reviewer", "Observer"]),
        )
        .closing_on_select(true),
        Column::duration("notice", "Notice"),
    ];
    Schema::new(columns)
}
