//! Records loaded into a fresh store at startup.

use roster_core::{User, UserId};

/// The two demo records the dashboard starts with.
#[must_use]
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: UserId::new("1"),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            alternate_email: "john.alt@example.com".to_string(),
            password: "hashed_password_1".to_string(),
            age: 30,
        },
        User {
            id: UserId::new("2"),
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@example.com".to_string(),
            alternate_email: "jane.alt@example.com".to_string(),
            password: "hashed_password_2".to_string(),
            age: 25,
        },
    ]
}
