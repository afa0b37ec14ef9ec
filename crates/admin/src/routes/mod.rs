//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /                                - Redirect to dashboard
//!
//! # JSON API (record store)
//! GET    /api/users                     - List users
//! POST   /api/users                     - Create user
//! PUT    /api/users/{id}                - Replace user
//! DELETE /api/users/{id}                - Delete user
//!
//! # Dashboard (reads and writes through the user API client)
//! GET  /dashboard                       - Dashboard overview
//! GET  /dashboard/users                 - User table
//! GET  /dashboard/users/new             - Add user form
//! POST /dashboard/users                 - Create user from form
//! POST /dashboard/users/quick-add       - Create placeholder user
//! GET  /dashboard/users/{id}/edit       - Edit user form
//! POST /dashboard/users/{id}            - Save edited user
//! POST /dashboard/users/{id}/delete     - Delete user
//! ```

pub mod api;
pub mod dashboard;
pub mod users;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .merge(api::router())
        .route("/dashboard", get(dashboard::index))
        .route("/dashboard/users", get(users::index).post(users::create))
        .route("/dashboard/users/new", get(users::new_form))
        .route("/dashboard/users/quick-add", post(users::quick_add))
        .route("/dashboard/users/{id}", post(users::update))
        .route("/dashboard/users/{id}/edit", get(users::edit_form))
        .route("/dashboard/users/{id}/delete", post(users::delete))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
