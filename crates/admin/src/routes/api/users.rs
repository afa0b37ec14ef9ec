//! User record JSON API handlers.
//!
//! Mutations address records by path id. A replace of an unknown id is a
//! 404; a delete of an unknown id still succeeds, reporting `deleted: false`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use roster_core::{DeleteOutcome, NewUser, User, UserId};
use tracing::instrument;

use crate::{
    error::{AppError, Result},
    state::AppState,
};

/// Build the users API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            axum::routing::put(replace_user).delete(delete_user),
        )
}

/// List every user.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.store().list())
}

/// Create a user from a payload without `id`.
#[instrument(skip_all)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> (StatusCode, Json<User>) {
    let user = state.store().create(new_user);
    (StatusCode::CREATED, Json(user))
}

/// Replace a user wholesale.
///
/// # Errors
///
/// Returns `BadRequest` if the body id differs from the path id, or
/// `NotFound` if no user has that id.
#[instrument(skip(state, user))]
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(user): Json<User>,
) -> Result<Json<User>> {
    if user.id != id {
        return Err(AppError::BadRequest(format!(
            "body id {} does not match path id {id}",
            user.id
        )));
    }

    state
        .store()
        .replace(user)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))
}

/// Delete a user; always reports success.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Json<DeleteOutcome> {
    let deleted = state.store().delete(&id).is_some();
    Json(DeleteOutcome {
        success: true,
        deleted,
    })
}
