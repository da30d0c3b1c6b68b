//! Select editor for duration cells.
//!
//! The menu entries are composed from the quantity typed so far; with
//! nothing typed, the quantity of the current value is used.

use super::dropdown::{Choice, OptionSource, SelectCell};
use crate::grid::{leading_quantity, options_for, parse_quantity};

/// Option source backed by the duration composer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationOptions {
    /// Quantity used while the query is empty.
    seed: i64,
}

impl OptionSource for DurationOptions {
    fn choices(&self, query: &str) -> Vec<Choice> {
        let quantity = if query.trim().is_empty() {
            self.seed
        } else {
            parse_quantity(query)
        };
        options_for(quantity)
            .into_iter()
            .map(|option| Choice {
                display: option.label.clone(),
                option,
            })
            .collect()
    }
}

/// Select editor over composed duration options.
pub type DurationSelect = SelectCell<DurationOptions>;

impl DurationSelect {
    /// Editor for a duration cell currently holding `value`.
    pub fn for_value(value: Option<&str>) -> Self {
        let seed = value.map(leading_quantity).unwrap_or(0);
        SelectCell::new(DurationOptions { seed }, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::dropdown::SelectAction;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn displays(select: &DurationSelect) -> Vec<String> {
        select.choices().into_iter().map(|c| c.display).collect()
    }

    #[test]
    fn test_empty_cell_offers_canonical_units() {
        let select = DurationSelect::for_value(None);
        assert_eq!(displays(&select), vec!["Day", "Week", "Month", "Year"]);
    }

    #[test]
    fn test_existing_value_seeds_quantity() {
        let select = DurationSelect::for_value(Some("3 Weeks"));
        assert_eq!(displays(&select)[0], "3 Days");
    }

    #[test]
    fn test_typing_composes_options() {
        let mut select = DurationSelect::for_value(None);
        let action = select.handle_input(KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE), None);
        assert_eq!(action, Some(SelectAction::Open));
        assert_eq!(displays(&select), vec!["2 Days", "2 Weeks", "2 Months", "2 Years"]);

        select.handle_input(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), None);
        let action = select.handle_input(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), None);
        match action {
            Some(SelectAction::Select(option)) => assert_eq!(option.value, "2 Weeks"),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_typing_one_is_singular() {
        let mut select = DurationSelect::for_value(Some("5 Days"));
        select.handle_input(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE), Some(true));
        assert_eq!(displays(&select)[3], "1 Year");
    }
}
