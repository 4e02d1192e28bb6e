//! API endpoints.

use axum::Router;

use crate::middleware::AppState;

pub mod admin;
pub mod banners;

/// Build the API router.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/banners", banners::router())
        .nest("/admin/banners", admin::router())
}
