//! Domain models for the admin presentation layer.

pub mod edit_session;

pub use edit_session::{EditError, EditSession};
