//! Data table component types.
//!
//! These types define the columns and empty state of the tables rendered in
//! the admin dashboard. Templates iterate `columns` for the header row and a
//! row view's `cells` for the body, so both must come from the same config.

use roster_core::{User, UserField};

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is shown.
    pub visible: bool,
}

impl TableColumn {
    /// Create a new visible column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            visible: true,
        }
    }

    /// Set whether the column is shown.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            empty_title: "No items found".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Columns that are shown, in order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &TableColumn> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Cell text for a user row, one entry per visible column.
    ///
    /// Columns whose key is not a user field render as empty cells.
    #[must_use]
    pub fn user_cells(&self, user: &User) -> Vec<String> {
        self.visible_columns()
            .map(|column| {
                column
                    .key
                    .parse::<UserField>()
                    .map(|field| user.field_value(field))
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Build the users table configuration: one column per user field.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    UserField::ALL
        .into_iter()
        .fold(DataTableConfig::new("users"), |config, field| {
            config.column(TableColumn::new(field.key(), field.label()))
        })
        .empty_state(
            "No users yet",
            Some("Use Add User to create the first record"),
        )
}
