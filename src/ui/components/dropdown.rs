//! Select editor for dropdown and duration cells.
//!
//! This module provides a select widget that:
//! - Displays the cell value when collapsed
//! - Opens a menu when Enter or Down is pressed, or when the user types
//! - Filters or composes its options from the typed query
//! - Selects with Enter or a click, clears with Backspace on an empty query
//!
//! Where the options come from is decided by an [`OptionSource`]: a fixed
//! creatable list for dropdown cells, the duration composer for duration
//! cells.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::input::TextInput;
use crate::grid::SelectOption;
use crate::ui::theme::theme;

/// Maximum number of menu entries visible at once.
const MAX_VISIBLE_ITEMS: usize = 8;

/// One menu entry: the option to deliver and the text to show for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub option: SelectOption,
    pub display: String,
}

impl Choice {
    fn plain(option: SelectOption) -> Self {
        let display = option.label.clone();
        Self { option, display }
    }
}

/// Supplies the menu entries for a typed query.
pub trait OptionSource {
    fn choices(&self, query: &str) -> Vec<Choice>;
}

/// A fixed option list, filtered by the query, that offers to create the
/// typed value when nothing matches it exactly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedOptions {
    options: Vec<SelectOption>,
}

impl FixedOptions {
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self { options }
    }
}

impl OptionSource for FixedOptions {
    fn choices(&self, query: &str) -> Vec<Choice> {
        let typed = query.trim();
        let needle = typed.to_lowercase();
        let mut choices: Vec<Choice> = self
            .options
            .iter()
            .filter(|o| {
                needle.is_empty()
                    || o.label.to_lowercase().contains(&needle)
                    || o.value.to_lowercase().contains(&needle)
            })
            .cloned()
            .map(Choice::plain)
            .collect();

        let exact = self
            .options
            .iter()
            .any(|o| o.value == typed || o.label.to_lowercase() == needle);
        if !typed.is_empty() && !exact {
            choices.push(Choice {
                option: SelectOption::new(typed, typed),
                display: format!("Create \"{}\"", typed),
            });
        }
        choices
    }
}

/// Action resulting from select input.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectAction {
    /// The user asked for the menu.
    Open,
    /// An option was chosen.
    Select(SelectOption),
    /// The value was cleared.
    Clear,
}

/// Where the expanded menu was drawn, for mapping clicks to entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuHit {
    /// Whole popup, border included.
    pub area: Rect,
    /// Area holding the entries (inside the border).
    pub inner: Rect,
    /// Index of the first visible entry.
    pub first: usize,
}

impl MenuHit {
    /// Entry index under row `y`, if any.
    pub fn index_at(&self, x: u16, y: u16) -> Option<usize> {
        let inside = x >= self.inner.x
            && x < self.inner.x + self.inner.width
            && y >= self.inner.y
            && y < self.inner.y + self.inner.height;
        inside.then(|| self.first + (y - self.inner.y) as usize)
    }
}

/// Select editor for one cell.
#[derive(Debug, Clone)]
pub struct SelectCell<S> {
    /// Where options come from.
    source: S,
    /// Text typed while the editor is focused.
    query: TextInput,
    /// Index of the highlighted entry.
    highlighted: usize,
    /// Expanded flag used when the grid does not force one.
    expanded: bool,
    /// Current cell value, shown when collapsed.
    value: Option<String>,
}

/// Select editor over a fixed option list.
pub type DropdownCell = SelectCell<FixedOptions>;

impl DropdownCell {
    /// Editor for a dropdown cell currently holding `value`.
    pub fn for_options(options: Vec<SelectOption>, value: Option<&str>) -> Self {
        SelectCell::new(FixedOptions::new(options), value)
    }
}

impl<S: OptionSource> SelectCell<S> {
    /// Create a collapsed editor.
    pub fn new(source: S, value: Option<&str>) -> Self {
        let mut query = TextInput::new();
        query.set_placeholder(value.unwrap_or_default());
        Self {
            source,
            query,
            highlighted: 0,
            expanded: false,
            value: value.map(str::to_string),
        }
    }

    /// Current menu entries.
    pub fn choices(&self) -> Vec<Choice> {
        self.source.choices(self.query.value())
    }

    /// Text typed so far.
    pub fn query(&self) -> &str {
        self.query.value()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// The editor's own expanded flag.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Collapse the menu and drop the typed query.
    pub fn collapse(&mut self) {
        self.expanded = false;
        self.highlighted = 0;
        self.query.clear();
    }

    fn choose(&mut self, index: usize) -> Option<SelectAction> {
        let choice = self.choices().into_iter().nth(index)?;
        self.value = Some(choice.option.value.clone());
        self.query.set_placeholder(choice.option.value.as_str());
        self.collapse();
        Some(SelectAction::Select(choice.option))
    }

    /// Select the entry at `index` (mouse selection).
    pub fn select_at(&mut self, index: usize) -> Option<SelectAction> {
        self.choose(index)
    }

    /// Handle keyboard input.
    ///
    /// `forced` is the menu state imposed by the grid; when it is `None`
    /// the editor's own expanded flag decides.
    pub fn handle_input(&mut self, key: KeyEvent, forced: Option<bool>) -> Option<SelectAction> {
        let expanded = forced.unwrap_or(self.expanded);

        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::NONE) | (KeyCode::Down, _) if !expanded => {
                self.expanded = true;
                self.highlighted = 0;
                Some(SelectAction::Open)
            }
            (KeyCode::Down, _) => {
                let count = self.choices().len();
                if count > 0 && self.highlighted < count - 1 {
                    self.highlighted += 1;
                }
                None
            }
            (KeyCode::Up, _) => {
                self.highlighted = self.highlighted.saturating_sub(1);
                None
            }
            (KeyCode::Enter, KeyModifiers::NONE) => self.choose(self.highlighted),
            (KeyCode::Backspace | KeyCode::Delete, _) if self.query.is_empty() => {
                // Nothing typed and nothing stored: no edit.
                self.value.take()?;
                self.query.set_placeholder("");
                self.collapse();
                Some(SelectAction::Clear)
            }
            _ => {
                if !self.query.handle_input(key) {
                    return None;
                }
                self.highlighted = 0;
                if expanded {
                    None
                } else {
                    self.expanded = true;
                    Some(SelectAction::Open)
                }
            }
        }
    }

    /// Render the collapsed cell.
    pub fn render(&self, frame: &mut Frame, area: Rect, style: Style, focused: bool, expanded: bool) {
        if area.width == 0 {
            return;
        }
        let indicator_width = 2.min(area.width);
        let text_area = Rect {
            width: area.width - indicator_width,
            ..area
        };
        let indicator_area = Rect {
            x: area.x + text_area.width,
            width: indicator_width,
            ..area
        };

        if focused {
            self.query.render(frame, text_area, style, true);
        } else {
            let text = self.value.as_deref().unwrap_or_default();
            frame.render_widget(Paragraph::new(Span::styled(text, style)), text_area);
        }

        let indicator = if expanded { " ▲" } else { " ▼" };
        frame.render_widget(
            Paragraph::new(Span::styled(indicator, Style::default().fg(theme().border))),
            indicator_area,
        );
    }

    /// Render the expanded menu as an overlay below (or above) the cell.
    ///
    /// Returns where the entries were drawn.
    pub fn render_menu(&self, frame: &mut Frame, cell_area: Rect, screen_area: Rect) -> Option<MenuHit> {
        let choices = self.choices();
        if choices.is_empty() {
            return None;
        }

        let t = theme();
        let visible = choices.len().min(MAX_VISIBLE_ITEMS);
        let list_height = (visible + 2) as u16;
        let widest = choices
            .iter()
            .map(|c| c.display.chars().count())
            .max()
            .unwrap_or(0) as u16;
        let list_width = cell_area
            .width
            .max(widest + 4)
            .min(screen_area.width.saturating_sub(cell_area.x.saturating_sub(screen_area.x)));

        let space_below = (screen_area.y + screen_area.height)
            .saturating_sub(cell_area.y + cell_area.height);
        let space_above = cell_area.y.saturating_sub(screen_area.y);

        let list_area = if space_below >= list_height || space_below >= space_above {
            Rect::new(
                cell_area.x,
                cell_area.y + cell_area.height,
                list_width,
                list_height.min(space_below),
            )
        } else {
            let height = list_height.min(space_above);
            Rect::new(cell_area.x, cell_area.y - height, list_width, height)
        };
        if list_area.height < 3 {
            return None;
        }

        frame.render_widget(Clear, list_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(t.border_focused))
            .style(Style::default().bg(t.menu_bg));
        let inner = block.inner(list_area);
        frame.render_widget(block, list_area);

        let rows = inner.height as usize;
        let first = (self.highlighted + 1).saturating_sub(rows);
        let current = self.value.as_deref();

        let items: Vec<ListItem> = choices
            .iter()
            .skip(first)
            .take(rows)
            .map(|choice| {
                let style = if Some(choice.option.value.as_str()) == current {
                    Style::default().fg(t.accent).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(t.fg)
                };
                ListItem::new(Line::from(Span::styled(choice.display.clone(), style)))
            })
            .collect();

        let list = List::new(items)
            .style(Style::default().bg(t.menu_bg).fg(t.fg))
            .highlight_style(
                Style::default()
                    .fg(t.bg)
                    .bg(t.accent)
                    .add_modifier(Modifier::BOLD),
            );

        let mut state = ListState::default();
        state.select(Some(self.highlighted - first));
        frame.render_stateful_widget(list, inner, &mut state);

        Some(MenuHit {
            area: list_area,
            inner,
            first,
        })
    }
}
