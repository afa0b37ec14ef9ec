//! API route handlers for admin.
//!
//! JSON API endpoints backed directly by the record store.

pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(users::router())
}
