//! Key hint bar.
//!
//! Renders a line such as `[Tab] next cell  [Esc] close` with the bracketed
//! keys highlighted.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::theme::theme;

/// Render `hints` into a one-line area.
pub fn render_help_bar(frame: &mut Frame, area: Rect, hints: &str) {
    frame.render_widget(Paragraph::new(Line::from(hint_spans(hints))), area);
}

/// Split hint text into key and description spans.
///
/// An unterminated `[` is treated as plain text.
fn hint_spans(hints: &str) -> Vec<Span<'static>> {
    let t = theme();
    let key_style = Style::default().fg(t.accent);
    let text_style = Style::default().fg(t.input_placeholder);

    let mut spans = Vec::new();
    let mut rest = hints;
    while !rest.is_empty() {
        let key = rest
            .find('[')
            .and_then(|open| rest[open..].find(']').map(|len| (open, open + len + 1)));
        match key {
            Some((open, close)) => {
                if open > 0 {
                    spans.push(Span::styled(rest[..open].to_string(), text_style));
                }
                spans.push(Span::styled(rest[open..close].to_string(), key_style));
                rest = &rest[close..];
            }
            None => {
                spans.push(Span::styled(rest.to_string(), text_style));
                break;
            }
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(hints: &str) -> Vec<String> {
        hint_spans(hints)
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect()
    }

    #[test]
    fn test_keys_and_descriptions() {
        assert_eq!(
            contents("[Tab] next  [Esc] close"),
            vec!["[Tab]", " next  ", "[Esc]", " close"]
        );
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(contents("just text"), vec!["just text"]);
        assert!(contents("").is_empty());
    }

    #[test]
    fn test_unterminated_bracket() {
        assert_eq!(contents("[F2] switch [oops"), vec!["[F2]", " switch [oops"]);
    }

    #[test]
    fn test_key_style_differs() {
        let spans = hint_spans("[q] quit");
        assert_eq!(spans[0].style.fg, Some(theme().accent));
        assert_ne!(spans[0].style, spans[1].style);
    }
}
