//! Column schema for the editable grid.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::row::CellValue;

/// Errors that can occur while building or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Two columns share a field key.
    #[error("duplicate column key '{0}'")]
    DuplicateKey(String),

    /// A column has an empty field key.
    #[error("column '{0}' has an empty key")]
    EmptyKey(String),

    /// The width hint could not be parsed.
    #[error("invalid column width '{0}': expected \"<n>%\" or \"<n>\"")]
    InvalidWidth(String),

    /// The schema file could not be read.
    #[error("failed to read schema file: {0}")]
    Read(#[from] std::io::Error),

    /// The schema file is not valid TOML or names an unknown column type.
    #[error("failed to parse schema: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Side payload carried by a selectable option.
pub type SidePayload = BTreeMap<String, CellValue>;

/// An option offered by a dropdown or duration cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value written into the row.
    pub value: String,
    /// Label shown in the menu.
    pub label: String,
    /// Auxiliary values delivered alongside the selection.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: SidePayload,
}

impl SelectOption {
    /// Create an option without side payload.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            details: SidePayload::new(),
        }
    }

    /// Attach a side payload entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

/// Editor kind of a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Read-only cell showing the raw value.
    Display,
    /// Free text.
    Text,
    /// Numeric input with at most two decimals.
    Number,
    /// Quantity + unit composer.
    Duration {
        #[serde(default)]
        close_on_select: bool,
    },
    /// Creatable select over a fixed option list.
    Dropdown {
        #[serde(default)]
        options: Vec<SelectOption>,
        #[serde(default)]
        close_on_select: bool,
    },
}

impl ColumnKind {
    /// Whether the column has an input editor.
    pub fn is_editable(&self) -> bool {
        !matches!(self, ColumnKind::Display)
    }

    /// Whether the column edits through a popup menu.
    pub fn has_menu(&self) -> bool {
        matches!(self, ColumnKind::Duration { .. } | ColumnKind::Dropdown { .. })
    }

    /// Whether selecting a value closes the menu.
    pub fn close_on_select(&self) -> bool {
        match self {
            ColumnKind::Duration { close_on_select } => *close_on_select,
            ColumnKind::Dropdown {
                close_on_select, ..
            } => *close_on_select,
            ColumnKind::Display | ColumnKind::Text | ColumnKind::Number => false,
        }
    }
}

/// Width hint for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnWidth {
    /// Share of the table width, e.g. `"20%"`.
    Percent(u16),
    /// Fixed number of terminal cells, e.g. `"12"`.
    Cells(u16),
}

impl TryFrom<String> for ColumnWidth {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for ColumnWidth {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SchemaError::InvalidWidth(s.to_string());
        match trimmed.strip_suffix('%') {
            Some(pct) => {
                let pct: u16 = pct.trim().parse().map_err(|_| invalid())?;
                if pct > 100 {
                    return Err(invalid());
                }
                Ok(ColumnWidth::Percent(pct))
            }
            None => trimmed.parse().map(ColumnWidth::Cells).map_err(|_| invalid()),
        }
    }
}

impl From<ColumnWidth> for String {
    fn from(width: ColumnWidth) -> Self {
        match width {
            ColumnWidth::Percent(p) => format!("{}%", p),
            ColumnWidth::Cells(c) => c.to_string(),
        }
    }
}

/// One column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Field key in each row.
    pub key: String,
    /// Header label.
    pub label: String,
    /// Editor kind.
    #[serde(flatten)]
    pub kind: ColumnKind,
    /// Keys copied from a selection's side payload into the row.
    #[serde(default, alias = "set_respective_detail", skip_serializing_if = "Vec::is_empty")]
    pub copy_details: Vec<String>,
    /// Width hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,
    /// Field that receives today's date on the first edit of a row through this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stamp_date: Option<String>,
}

impl Column {
    fn with_kind(key: impl Into<String>, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            copy_details: Vec::new(),
            width: None,
            stamp_date: None,
        }
    }

    pub fn display(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(key, label, ColumnKind::Display)
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(key, label, ColumnKind::Text)
    }

    pub fn number(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(key, label, ColumnKind::Number)
    }

    pub fn duration(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::with_kind(
            key,
            label,
            ColumnKind::Duration {
                close_on_select: false,
            },
        )
    }

    pub fn dropdown(
        key: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self::with_kind(
            key,
            label,
            ColumnKind::Dropdown {
                options,
                close_on_select: false,
            },
        )
    }

    /// Set the close-on-select flag. Ignored for kinds without a menu.
    pub fn closing_on_select(mut self, close: bool) -> Self {
        match &mut self.kind {
            ColumnKind::Duration { close_on_select } => *close_on_select = close,
            ColumnKind::Dropdown {
                close_on_select, ..
            } => *close_on_select = close,
            ColumnKind::Display | ColumnKind::Text | ColumnKind::Number => {}
        }
        self
    }

    pub fn copying_details<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.copy_details = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn stamping_date(mut self, field: impl Into<String>) -> Self {
        self.stamp_date = Some(field.into());
        self
    }
}

#[derive(Deserialize)]
struct SchemaFile {
    #[serde(default)]
    columns: Vec<Column>,
}

/// An ordered, key-unique list of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema, rejecting empty or duplicate keys.
    pub fn new(columns: Vec<Column>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if column.key.is_empty() {
                return Err(SchemaError::EmptyKey(column.label.clone()));
            }
            if !seen.insert(column.key.as_str()) {
                return Err(SchemaError::DuplicateKey(column.key.clone()));
            }
        }
        Ok(Self { columns })
    }

    /// Parse a schema from a TOML document with a `[[columns]]` array.
    pub fn from_toml_str(s: &str) -> Result<Self, SchemaError> {
        let file: SchemaFile = toml::from_str(s)?;
        Self::new(file.columns)
    }

    /// Load a schema from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column at position `index`.
    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    /// Column with field key `key`.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Position of the first column with an editor.
    pub fn first_editable(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.kind.is_editable())
    }
}
