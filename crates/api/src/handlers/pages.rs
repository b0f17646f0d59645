//! Handlers for the static pages: home and the post-write landing page.

use axum::http::StatusCode;
use axum::response::Response;

use crate::middleware::identity::CurrentPrincipal;
use crate::middleware::login_required::AuthUser;
use crate::views;

/// GET /
pub async fn home(CurrentPrincipal(principal): CurrentPrincipal) -> Response {
    views::page(StatusCode::OK, views::home(&principal))
}

/// GET /done/
///
/// Where create, edit and delete redirect on success.
pub async fn success(user: AuthUser) -> Response {
    views::page(StatusCode::OK, views::success(&user.principal()))
}
