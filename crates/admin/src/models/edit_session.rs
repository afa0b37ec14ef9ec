//! Editing flow for a single user row.
//!
//! ```text
//!            begin(user)                    save() -> draft
//!   Idle ─────────────────▶ Editing(draft) ─────────────────▶ Idle
//!                              │  ▲
//!                 set_field()  └──┘         cancel()
//!                              Editing ─────────────────────▶ Idle
//! ```
//!
//! The draft is a snapshot of the record taken when editing began; it is
//! mutated field by field and only leaves the session on `save`, which hands
//! it to the caller to issue a replace. `cancel` drops it without any request.

use roster_core::{FieldError, User, UserField, UserId};
use thiserror::Error;

/// Errors from driving an [`EditSession`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// `set_field` or `save` called with no edit in progress.
    #[error("no edit in progress")]
    NotEditing,

    /// The submitted value does not fit the field.
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Edit state for the user table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    /// No edit in progress.
    #[default]
    Idle,
    /// Holding a snapshot of the selected record.
    Editing(User),
}

impl EditSession {
    /// Start editing a snapshot of `user`, discarding any previous draft.
    pub fn begin(&mut self, user: User) {
        *self = Self::Editing(user);
    }

    /// Id of the record being edited, if any.
    #[must_use]
    pub const fn editing_id(&self) -> Option<&UserId> {
        match self {
            Self::Idle => None,
            Self::Editing(draft) => Some(&draft.id),
        }
    }

    /// The current draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&User> {
        match self {
            Self::Idle => None,
            Self::Editing(draft) => Some(draft),
        }
    }

    /// Overwrite one field of the draft.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotEditing` when idle, or `EditError::Field` if the
    /// value does not fit the field (the draft keeps its previous value).
    pub fn set_field(&mut self, field: UserField, value: &str) -> Result<(), EditError> {
        match self {
            Self::Idle => Err(EditError::NotEditing),
            Self::Editing(draft) => Ok(draft.set_field(field, value)?),
        }
    }

    /// Finish editing and return the draft to submit as a replace.
    ///
    /// # Errors
    ///
    /// Returns `EditError::NotEditing` when idle.
    pub fn save(&mut self) -> Result<User, EditError> {
        match std::mem::take(self) {
            Self::Idle => Err(EditError::NotEditing),
            Self::Editing(draft) => Ok(draft),
        }
    }

    /// Discard the draft. A no-op when idle.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Whether an edit is in progress.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }
}
