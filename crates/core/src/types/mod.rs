//! Core types for Roster.
//!
//! This module provides type-safe wrappers for the user record domain.

pub mod id;
pub mod response;
pub mod user;

pub use id::*;
pub use response::{DeleteOutcome, ErrorBody};
pub use user::{FieldError, NewUser, User, UserField};
