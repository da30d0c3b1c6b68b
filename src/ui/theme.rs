//! Theme and styling configuration.
//!
//! Besides the palette, this module holds the one styling policy shared by
//! every cell editor: [`cell_style`] decides how a cell is framed and
//! colored from the caller's error flag and the viewport width.

use once_cell::sync::OnceCell;
use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, warn};

/// Color theme for the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Primary background color.
    pub bg: Color,
    /// Accent for focused elements and highlighted menu entries.
    pub accent: Color,
    /// Unfocused border color.
    pub border: Color,
    /// Focused border color.
    pub border_focused: Color,
    /// Text typed into an editor.
    pub input_fg: Color,
    /// Placeholder text.
    pub input_placeholder: Color,
    /// Header row text.
    pub header: Color,
    /// Error marker color.
    pub error: Color,
    /// Menu popup background.
    pub menu_bg: Color,
}

impl Theme {
    /// The dark theme (default).
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            input_fg: Color::White,
            input_placeholder: Color::DarkGray,
            header: Color::Yellow,
            error: Color::Red,
            menu_bg: Color::Black,
        }
    }

    /// A light theme.
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Blue,
            input_fg: Color::Black,
            input_placeholder: Color::Gray,
            header: Color::Magenta,
            error: Color::Red,
            menu_bg: Color::White,
        }
    }

    /// Look up a theme by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

static THEME: OnceCell<Theme> = OnceCell::new();

/// Resolve a theme name, falling back to the dark theme.
pub fn load_theme(name: &str) -> Theme {
    Theme::by_name(name).unwrap_or_else(|| {
        warn!(theme = name, "Unknown theme, using dark");
        Theme::dark()
    })
}

/// Install the global theme. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    if THEME.set(theme).is_err() {
        debug!("Theme already initialized");
    }
}

/// The global theme.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Style resolved for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    /// Style of the cell text.
    pub text: Style,
    /// Style of the frame markers drawn around the cell.
    pub edge: Style,
    /// Whether frame markers are drawn.
    pub framed: bool,
}

/// The shared cell styling policy.
///
/// A cell is framed when it is not borderless, when it carries an error, or
/// when the viewport is narrow. Errors paint the frame and text in the error
/// color.
pub fn cell_style(has_error: bool, borderless: bool, narrow: bool) -> CellStyle {
    let t = theme();
    let framed = !borderless || has_error || narrow;
    if has_error {
        CellStyle {
            text: Style::default()
                .fg(t.error)
                .add_modifier(Modifier::UNDERLINED),
            edge: Style::default().fg(t.error).add_modifier(Modifier::BOLD),
            framed,
        }
    } else {
        CellStyle {
            text: Style::default().fg(t.input_fg),
            edge: Style::default().fg(t.border),
            framed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_theme_known_and_unknown() {
        assert_eq!(load_theme("light"), Theme::light());
        assert_eq!(load_theme("neon"), Theme::dark());
    }

    #[test]
    fn test_borderless_plain_cell_is_unframed() {
        let style = cell_style(false, true, false);
        assert!(!style.framed);
        assert_eq!(style.text.fg, Some(theme().input_fg));
    }

    #[test]
    fn test_error_cell_is_framed_in_error_color() {
        let style = cell_style(true, true, false);
        assert!(style.framed);
        assert_eq!(style.edge.fg, Some(theme().error));
        assert!(style.text.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_narrow_or_bordered_cells_are_framed() {
        assert!(cell_style(false, true, true).framed);
        assert!(cell_style(false, false, false).framed);
    }
}
