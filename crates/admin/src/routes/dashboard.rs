//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub current_path: String,
}

/// Dashboard landing page.
#[instrument]
pub async fn index() -> impl IntoResponse {
    DashboardTemplate {
        current_path: "/dashboard".to_string(),
    }
}
