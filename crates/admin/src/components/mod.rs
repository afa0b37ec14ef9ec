//! Reusable UI component configuration for admin templates.

pub mod data_table;

pub use data_table::{DataTableConfig, TableColumn, users_table_config};
