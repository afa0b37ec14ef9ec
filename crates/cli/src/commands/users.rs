//! User record commands.
//!
//! Each command talks to the admin server through [`UsersClient`]. Mutations
//! never patch local state: they re-fetch the list and print the table again.

use std::io::{self, BufRead, Write};

use roster_admin::client::{ClientError, UsersClient};
use roster_admin::components::users_table_config;
use roster_admin::models::{EditError, EditSession};
use roster_core::{NewUser, User, UserField, UserId};
use thiserror::Error;

/// Errors that can occur while running a users command.
#[derive(Debug, Error)]
pub enum UsersError {
    /// The API call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The user to edit is not in the list.
    #[error("No user with id {0}")]
    NotFound(UserId),

    /// A field value was rejected.
    #[error("Invalid edit: {0}")]
    Edit(#[from] EditError),

    /// Reading the prompt answer or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Field values given on the command line.
#[derive(Debug, Default, Clone, clap::Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub alternate_email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
}

impl FieldArgs {
    /// The fields that were given, as text.
    fn given(&self) -> Vec<(UserField, String)> {
        [
            (UserField::FirstName, self.first_name.clone()),
            (UserField::LastName, self.last_name.clone()),
            (UserField::Email, self.email.clone()),
            (UserField::AlternateEmail, self.alternate_email.clone()),
            (UserField::Password, self.password.clone()),
            (UserField::Age, self.age.map(|age| age.to_string())),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|value| (field, value)))
        .collect()
    }

    /// Build a create payload: given fields over the placeholder.
    fn to_new_user(&self) -> NewUser {
        let placeholder = NewUser::placeholder();
        NewUser {
            first_name: self.first_name.clone().unwrap_or(placeholder.first_name),
            last_name: self.last_name.clone().unwrap_or(placeholder.last_name),
            email: self.email.clone().unwrap_or(placeholder.email),
            alternate_email: self
                .alternate_email
                .clone()
                .unwrap_or(placeholder.alternate_email),
            password: self.password.clone().unwrap_or(placeholder.password),
            age: self.age.unwrap_or(placeholder.age),
        }
    }
}

/// Print the user table.
///
/// # Errors
///
/// Returns an error if the list cannot be fetched or output fails.
pub async fn list(client: &UsersClient, out: &mut impl Write) -> Result<(), UsersError> {
    let users = client.fetch_users().await?;
    render_table(out, &users)?;
    Ok(())
}

/// Create a user, then print the refreshed table.
///
/// # Errors
///
/// Returns an error if either request fails or output fails.
pub async fn add(
    client: &UsersClient,
    fields: &FieldArgs,
    out: &mut impl Write,
) -> Result<User, UsersError> {
    let user = client.add_user(&fields.to_new_user()).await?;
    tracing::info!(id = %user.id, "Added {}", user.full_name());

    list(client, out).await?;
    Ok(user)
}

/// Edit the given fields of a user, then print the refreshed table.
///
/// The record is snapshotted from a fresh list, so fields not given keep
/// their current server values.
///
/// # Errors
///
/// Returns `UsersError::NotFound` if the id is not listed, or an error if a
/// request or output fails.
pub async fn edit(
    client: &UsersClient,
    id: &UserId,
    fields: &FieldArgs,
    out: &mut impl Write,
) -> Result<User, UsersError> {
    let current = client
        .fetch_users()
        .await?
        .into_iter()
        .find(|user| &user.id == id)
        .ok_or_else(|| UsersError::NotFound(id.clone()))?;

    let mut session = EditSession::default();
    session.begin(current);
    for (field, value) in fields.given() {
        session.set_field(field, &value)?;
    }
    let draft = session.save()?;

    let user = client.update_user(&draft).await.map_err(|e| {
        if e.is_not_found() {
            UsersError::NotFound(id.clone())
        } else {
            UsersError::Client(e)
        }
    })?;
    tracing::info!(id = %user.id, "Saved {}", user.full_name());

    list(client, out).await?;
    Ok(user)
}

/// Delete a user after confirmation, then print the refreshed table.
///
/// Returns `false` without any request if the prompt is declined.
///
/// # Errors
///
/// Returns an error if a request, the prompt, or output fails.
pub async fn delete(
    client: &UsersClient,
    id: &UserId,
    yes: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool, UsersError> {
    if !yes && !confirm(input, out, &format!("Delete user {id}?"))? {
        writeln!(out, "Cancelled")?;
        return Ok(false);
    }

    let outcome = client.delete_user(id).await?;
    if outcome.deleted {
        tracing::info!(%id, "Deleted user");
    } else {
        tracing::info!(%id, "User was already deleted");
    }

    list(client, out).await?;
    Ok(true)
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm(input: &mut impl BufRead, out: &mut impl Write, question: &str) -> io::Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Write the user table: an id column plus one column per field.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_table(out: &mut impl Write, users: &[User]) -> io::Result<()> {
    let table = users_table_config();
    if users.is_empty() {
        return writeln!(out, "{}", table.empty_title);
    }

    let header: Vec<String> = std::iter::once("ID".to_string())
        .chain(table.visible_columns().map(|column| column.label.clone()))
        .collect();
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            std::iter::once(user.id.to_string())
                .chain(table.user_cells(user))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            std::iter::once(&header)
                .chain(&rows)
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    write_row(out, &header, &widths)?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(out, &rule, &widths)?;
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row(out: &mut impl Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())
}
