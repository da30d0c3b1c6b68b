//! Option builder for duration cells.
//!
//! A duration cell offers "quantity + unit" choices composed from whatever
//! numeric prefix the user has typed into the cell's menu. The chosen
//! option's value is the composed string itself, e.g. `"3 Weeks"`.

use super::schema::SelectOption;

/// A calendar unit offered by duration cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    /// All units in menu order.
    pub const ALL: [DurationUnit; 4] = [
        DurationUnit::Day,
        DurationUnit::Week,
        DurationUnit::Month,
        DurationUnit::Year,
    ];

    pub fn singular(&self) -> &'static str {
        match self {
            DurationUnit::Day => "Day",
            DurationUnit::Week => "Week",
            DurationUnit::Month => "Month",
            DurationUnit::Year => "Year",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            DurationUnit::Day => "Days",
            DurationUnit::Week => "Weeks",
            DurationUnit::Month => "Months",
            DurationUnit::Year => "Years",
        }
    }

    /// Unit name agreeing with `quantity`.
    pub fn name_for(&self, quantity: i64) -> &'static str {
        if quantity.unsigned_abs() > 1 {
            self.plural()
        } else {
            self.singular()
        }
    }
}

/// Parse the integer prefix of typed text.
///
/// Leading whitespace and a single sign are allowed; parsing stops at the
/// first non-digit. Empty, non-numeric or out-of-range input reads as zero.
pub fn parse_quantity(typed: &str) -> i64 {
    let s = typed.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..digits_end].parse().unwrap_or(0);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Re-read the quantity of a stored duration value such as `"3 Weeks"`.
pub fn leading_quantity(value: &str) -> i64 {
    parse_quantity(value)
}

/// Build the menu options for a typed quantity.
///
/// Zero yields the four canonical units with a zero placeholder value;
/// anything else pairs the quantity with each unit name.
pub fn options_for(quantity: i64) -> Vec<SelectOption> {
    DurationUnit::ALL
        .iter()
        .map(|unit| {
            if quantity == 0 {
                SelectOption::new(format!("0 {}", unit.singular()), unit.singular())
            } else {
                let composed = format!("{} {}", quantity, unit.name_for(quantity));
                SelectOption::new(composed.clone(), composed)
            }
        })
        .collect()
}
