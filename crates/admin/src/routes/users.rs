//! Dashboard user table handlers.
//!
//! Every page reads through the user API client, and every mutation ends in a
//! redirect back to the list so the table is always re-fetched from the store
//! rather than patched locally. Outcomes travel in the redirect's query string
//! and render as a notice or error banner.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use roster_core::{FieldError, NewUser, User, UserField, UserId};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    components::{DataTableConfig, users_table_config},
    error::{AppError, Result},
    models::{EditError, EditSession},
    state::AppState,
};

const LIST_PATH: &str = "/dashboard/users";

/// Banner query parameters set by mutation redirects.
#[derive(Debug, Default, Deserialize)]
pub struct BannerQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// User row view for templates.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub id: String,
    pub name: String,
    pub cells: Vec<String>,
    pub edit_href: String,
    pub delete_action: String,
}

impl UserRowView {
    fn new(table: &DataTableConfig, user: &User) -> Self {
        let encoded = urlencoding::encode(user.id.as_str());
        Self {
            id: user.id.to_string(),
            name: user.full_name(),
            cells: table.user_cells(user),
            edit_href: format!("{LIST_PATH}/{encoded}/edit"),
            delete_action: format!("{LIST_PATH}/{encoded}/delete"),
        }
    }
}

/// Form input view for templates.
#[derive(Debug, Clone)]
pub struct FormFieldView {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    pub input_type: &'static str,
}

impl FormFieldView {
    fn new(field: UserField, value: String) -> Self {
        let input_type = match field {
            UserField::Email | UserField::AlternateEmail => "email",
            UserField::Age => "number",
            _ => "text",
        };
        Self {
            key: field.key(),
            label: field.label(),
            value,
            input_type,
        }
    }
}

/// Submitted user form; every field arrives as text.
#[derive(Deserialize)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub alternate_email: String,
    pub password: String,
    pub age: String,
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("alternate_email", &self.alternate_email)
            .field("password", &"[REDACTED]")
            .field("age", &self.age)
            .finish()
    }
}

impl UserForm {
    fn value(&self, field: UserField) -> &str {
        match field {
            UserField::FirstName => &self.first_name,
            UserField::LastName => &self.last_name,
            UserField::Email => &self.email,
            UserField::AlternateEmail => &self.alternate_email,
            UserField::Password => &self.password,
            UserField::Age => &self.age,
        }
    }

    fn fields(&self) -> Vec<FormFieldView> {
        UserField::ALL
            .into_iter()
            .map(|field| FormFieldView::new(field, self.value(field).to_string()))
            .collect()
    }

    /// Build a create payload.
    fn to_new_user(&self) -> std::result::Result<NewUser, FieldError> {
        let age = self
            .age
            .trim()
            .parse()
            .map_err(|_| FieldError::InvalidAge(self.age.clone()))?;
        Ok(NewUser {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            alternate_email: self.alternate_email.clone(),
            password: self.password.clone(),
            age,
        })
    }

    /// Apply every submitted field to an edit session and save it.
    fn apply(&self, mut session: EditSession) -> std::result::Result<User, EditError> {
        for field in UserField::ALL {
            session.set_field(field, self.value(field))?;
        }
        session.save()
    }
}

/// Users list page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub current_path: String,
    pub table_id: String,
    pub columns: Vec<String>,
    pub rows: Vec<UserRowView>,
    pub empty_title: String,
    pub empty_description: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Create / edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "users/form.html")]
pub struct UserFormTemplate {
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub submit_label: String,
    pub cancel_href: String,
    pub fields: Vec<FormFieldView>,
    pub error: Option<String>,
}

impl UserFormTemplate {
    fn create(fields: Vec<FormFieldView>, error: Option<String>) -> Self {
        Self {
            current_path: LIST_PATH.to_string(),
            heading: "Add User".to_string(),
            action: LIST_PATH.to_string(),
            submit_label: "Create".to_string(),
            cancel_href: LIST_PATH.to_string(),
            fields,
            error,
        }
    }

    fn edit(id: &UserId, fields: Vec<FormFieldView>, error: Option<String>) -> Self {
        Self {
            current_path: LIST_PATH.to_string(),
            heading: format!("Edit User {id}"),
            action: format!("{LIST_PATH}/{}", urlencoding::encode(id.as_str())),
            submit_label: "Save".to_string(),
            cancel_href: LIST_PATH.to_string(),
            fields,
            error,
        }
    }
}

// =============================================================================
// Redirect Helpers
// =============================================================================

/// Redirect to the list with a notice banner.
fn list_with_notice(message: &str) -> Redirect {
    Redirect::to(&format!(
        "{LIST_PATH}?notice={}",
        urlencoding::encode(message)
    ))
}

/// Redirect to the list with an error banner.
fn list_with_error(message: &str) -> Redirect {
    Redirect::to(&format!(
        "{LIST_PATH}?error={}",
        urlencoding::encode(message)
    ))
}

// =============================================================================
// Handlers
// =============================================================================

/// Users list page handler.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>, Query(banner): Query<BannerQuery>) -> Response {
    let table = users_table_config();

    let (rows, fetch_error) = match state.users_api().fetch_users().await {
        Ok(users) => (
            users
                .iter()
                .map(|user| UserRowView::new(&table, user))
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!(
                api_url = %state.users_api().base_url(),
                "Failed to fetch users: {e}"
            );
            (vec![], Some(e.to_string()))
        }
    };

    let status = if fetch_error.is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };

    let template = UsersIndexTemplate {
        current_path: LIST_PATH.to_string(),
        table_id: table.table_id.clone(),
        columns: table.visible_columns().map(|c| c.label.clone()).collect(),
        rows,
        empty_title: table.empty_title.clone(),
        empty_description: table.empty_description.clone(),
        notice: banner.notice,
        error: fetch_error.or(banner.error),
    };

    (status, template).into_response()
}

/// New user form, prefilled with the placeholder record.
#[instrument]
pub async fn new_form() -> impl IntoResponse {
    let placeholder = NewUser::placeholder().with_id(UserId::new(""));
    let fields = UserField::ALL
        .into_iter()
        .map(|field| FormFieldView::new(field, placeholder.field_value(field)))
        .collect();
    UserFormTemplate::create(fields, None)
}

/// Create a user from the form.
#[instrument(skip(state))]
pub async fn create(State(state): State<AppState>, Form(form): Form<UserForm>) -> Response {
    let new_user = match form.to_new_user() {
        Ok(new_user) => new_user,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                UserFormTemplate::create(form.fields(), Some(e.to_string())),
            )
                .into_response();
        }
    };

    add_and_return(&state, &new_user).await.into_response()
}

/// Create a user with the fixed placeholder payload.
#[instrument(skip(state))]
pub async fn quick_add(State(state): State<AppState>) -> Redirect {
    add_and_return(&state, &NewUser::placeholder()).await
}

async fn add_and_return(state: &AppState, new_user: &NewUser) -> Redirect {
    match state.users_api().add_user(new_user).await {
        Ok(user) => list_with_notice(&format!("Added {} (id {})", user.full_name(), user.id)),
        Err(e) => {
            tracing::warn!("Failed to add user: {e}");
            list_with_error(&e.to_string())
        }
    }
}

/// Edit form: snapshot the selected record into an edit session.
///
/// A failed fetch redirects to the list with an error banner.
///
/// # Errors
///
/// Returns `NotFound` if the record no longer exists.
#[instrument(skip(state))]
pub async fn edit_form(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Response> {
    let users = match state.users_api().fetch_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::warn!("Failed to load user {id} for editing: {e}");
            return Ok(list_with_error(&e.to_string()).into_response());
        }
    };
    let user = users
        .into_iter()
        .find(|user| user.id == id)
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    let mut session = EditSession::default();
    session.begin(user);

    let fields = session
        .draft()
        .map(|draft| {
            UserField::ALL
                .into_iter()
                .map(|field| FormFieldView::new(field, draft.field_value(field)))
                .collect()
        })
        .unwrap_or_default();

    let editing_id = session.editing_id().unwrap_or(&id);
    Ok(UserFormTemplate::edit(editing_id, fields, None).into_response())
}

/// Save an edit: apply the form to a fresh snapshot and replace the record.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Form(form): Form<UserForm>,
) -> Response {
    let current = match state.users_api().fetch_users().await {
        Ok(users) => users.into_iter().find(|user| user.id == id),
        Err(e) => {
            tracing::warn!("Failed to load user {id} for update: {e}");
            return list_with_error(&e.to_string()).into_response();
        }
    };

    let Some(current) = current else {
        tracing::warn!("Failed to update user {id}: no longer exists");
        return list_with_error(&format!("User {id} no longer exists")).into_response();
    };

    let mut session = EditSession::default();
    session.begin(current);

    let draft = match form.apply(session) {
        Ok(draft) => draft,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                UserFormTemplate::edit(&id, form.fields(), Some(e.to_string())),
            )
                .into_response();
        }
    };

    match state.users_api().update_user(&draft).await {
        Ok(user) => list_with_notice(&format!("Saved {}", user.full_name())).into_response(),
        Err(e) if e.is_not_found() => {
            tracing::warn!("Failed to update user {id}: removed before save");
            list_with_error(&format!("User {id} no longer exists")).into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to update user {id}: {e}");
            list_with_error(&e.to_string()).into_response()
        }
    }
}

/// Delete a user (the browser asks for confirmation before submitting).
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<UserId>) -> Redirect {
    match state.users_api().delete_user(&id).await {
        Ok(outcome) if outcome.deleted => list_with_notice(&format!("Deleted user {id}")),
        Ok(_) => list_with_notice(&format!("User {id} was already deleted")),
        Err(e) => {
            tracing::warn!("Failed to delete user {id}: {e}");
            list_with_error(&e.to_string())
        }
    }
}
