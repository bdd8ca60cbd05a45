//! Host schema description types.
//!
//! The host exposes a document schema describing its tables and columns;
//! the taxonomy resolver reads enumerated choice lists (and their colors)
//! out of it. Only the parts the engine consumes are modeled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A host document schema: table name to table description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables by name.
    #[serde(default)]
    pub tables: BTreeMap<String, TableSchema>,
}

impl Schema {
    /// Looks up a column description by table and column id.
    #[must_use]
    pub fn column(&self, table: &str, column: &str) -> Option<&ColumnSchema> {
        self.tables
            .get(table)?
            .columns
            .iter()
            .find(|c| c.id == column)
    }

    /// Returns the enumerated choices of a column, when it has a non-empty
    /// choice list.
    #[must_use]
    pub fn choices(&self, table: &str, column: &str) -> Option<&ChoiceOptions> {
        self.column(table, column)?
            .widget_options
            .as_ref()
            .filter(|options| !options.choices.is_empty())
    }
}

/// A single table's description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Columns in schema order.
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

/// A single column's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column identifier (the name the field mapping refers to).
    pub id: String,
    /// Widget options, present for choice-typed columns.
    #[serde(default, rename = "widgetOptions", skip_serializing_if = "Option::is_none")]
    pub widget_options: Option<ChoiceOptions>,
}

/// Choice-list options attached to a column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOptions {
    /// The enumerated values, in display order.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Positional colors for the choices; may be shorter than `choices`.
    #[serde(default)]
    pub choice_colors: Vec<String>,
}

impl ChoiceOptions {
    /// Returns the color configured for the choice at `index`, if any.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Option<&str> {
        self.choice_colors.get(index).map(String::as_str)
    }
}
