//! The user record and its create payload.
//!
//! The store performs no validation beyond type shape: names and emails are
//! free text, `password` is opaque text, and `age` is any unsigned integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::UserId;

/// A user record as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, immutable after creation.
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub alternate_email: String,
    /// Stored and transmitted as plain text.
    pub password: String,
    pub age: u32,
}

/// Create payload: a user without an `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub alternate_email: String,
    pub password: String,
    pub age: u32,
}

impl NewUser {
    /// The fixed payload issued by the "quick add" action.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            first_name: "New".to_string(),
            last_name: "User".to_string(),
            email: "new.user@example.com".to_string(),
            alternate_email: "new.user.alt@example.com".to_string(),
            password: "hashed_password".to_string(),
            age: 22,
        }
    }

    /// Attach an identifier, producing a stored record.
    #[must_use]
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            alternate_email: self.alternate_email,
            password: self.password,
            age: self.age,
        }
    }
}

impl User {
    /// Display name used in log lines and confirmation prompts.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Render a field as text for tables and form inputs.
    #[must_use]
    pub fn field_value(&self, field: UserField) -> String {
        match field {
            UserField::FirstName => self.first_name.clone(),
            UserField::LastName => self.last_name.clone(),
            UserField::Email => self.email.clone(),
            UserField::AlternateEmail => self.alternate_email.clone(),
            UserField::Password => self.password.clone(),
            UserField::Age => self.age.to_string(),
        }
    }

    /// Overwrite a single field from its text form.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidAge` if `field` is [`UserField::Age`] and
    /// `value` is not an unsigned integer. The record is left untouched.
    pub fn set_field(&mut self, field: UserField, value: &str) -> Result<(), FieldError> {
        match field {
            UserField::FirstName => value.clone_into(&mut self.first_name),
            UserField::LastName => value.clone_into(&mut self.last_name),
            UserField::Email => value.clone_into(&mut self.email),
            UserField::AlternateEmail => value.clone_into(&mut self.alternate_email),
            UserField::Password => value.clone_into(&mut self.password),
            UserField::Age => {
                self.age = value
                    .trim()
                    .parse()
                    .map_err(|_| FieldError::InvalidAge(value.to_string()))?;
            }
        }
        Ok(())
    }
}

/// The editable fields of a [`User`], in display order.
///
/// `id` is deliberately absent: it is assigned by the store and never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    FirstName,
    LastName,
    Email,
    AlternateEmail,
    Password,
    Age,
}

impl UserField {
    /// All editable fields in column order.
    pub const ALL: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::AlternateEmail,
        Self::Password,
        Self::Age,
    ];

    /// JSON / form key for the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::AlternateEmail => "alternate_email",
            Self::Password => "password",
            Self::Age => "age",
        }
    }

    /// Column header label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "Email",
            Self::AlternateEmail => "Alternate Email",
            Self::Password => "Password (hashed)",
            Self::Age => "Age",
        }
    }
}

impl fmt::Display for UserField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for UserField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Errors from editing a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Age was not an unsigned integer.
    #[error("age must be a whole number, got {0:?}")]
    InvalidAge(String),

    /// No editable field has this key.
    #[error("unknown field: {0}")]
    UnknownField(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn john() -> User {
        User {
            id: UserId::new("1"),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            alternate_email: "john.alt@example.com".to_string(),
            password: "hashed_password_1".to_string(),
            age: 30,
        }
    }

    #[test]
    fn test_wire_format_uses_snake_case_keys() {
        let json = serde_json::to_value(john()).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["first_name"], "John");
        assert_eq!(json["alternate_email"], "john.alt@example.com");
        assert_eq!(json["age"], 30);
    }

    #[test]
    fn test_new_user_ignores_id_field() {
        let payload = r#"{"id":"99","first_name":"A","last_name":"B","email":"a@b.c",
            "alternate_email":"","password":"p","age":1}"#;
        let new_user: NewUser = serde_json::from_str(payload).unwrap();
        assert_eq!(new_user.first_name, "A");
    }

    #[test]
    fn test_new_user_rejects_wrong_types() {
        let payload = r#"{"first_name":"A","last_name":"B","email":"a@b.c",
            "alternate_email":"","password":"p","age":"old"}"#;
        assert!(serde_json::from_str::<NewUser>(payload).is_err());
    }

    #[test]
    fn test_with_id_keeps_fields() {
        let user = NewUser::placeholder().with_id(UserId::new("3"));
        assert_eq!(user.id.as_str(), "3");
        assert_eq!(user.full_name(), "New User");
        assert_eq!(user.age, 22);
    }

    #[test]
    fn test_set_field_text() {
        let mut user = john();
        user.set_field(UserField::FirstName, "Johnny").unwrap();
        assert_eq!(user.first_name, "Johnny");
        assert_eq!(user.field_value(UserField::FirstName), "Johnny");
    }

    #[test]
    fn test_set_field_age() {
        let mut user = john();
        user.set_field(UserField::Age, " 41 ").unwrap();
        assert_eq!(user.age, 41);
    }

    #[test]
    fn test_set_field_invalid_age_leaves_record() {
        let mut user = john();
        let err = user.set_field(UserField::Age, "-3").unwrap_err();
        assert_eq!(err, FieldError::InvalidAge("-3".to_string()));
        assert_eq!(user, john());
    }

    #[test]
    fn test_field_from_key() {
        assert_eq!(
            "alternate_email".parse::<UserField>().unwrap(),
            UserField::AlternateEmail
        );
        assert!(matches!(
            "id".parse::<UserField>(),
            Err(FieldError::UnknownField(_))
        ));
    }

    #[test]
    fn test_labels_in_column_order() {
        let labels: Vec<_> = UserField::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(labels.first(), Some(&"First Name"));
        assert_eq!(labels.last(), Some(&"Age"));
    }
}
