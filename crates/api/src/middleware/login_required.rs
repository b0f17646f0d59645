//! Login guard for the note pages.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use yanote_core::access::{admits, Principal, RouteAccess};
use yanote_core::error::CoreError;
use yanote_core::types::DbId;

use super::identity::resolve_principal;
use crate::error::{redirect, AppError};
use crate::paths;
use crate::state::AppState;

/// Middleware for the [`RouteAccess::LoginRequired`] router group.
///
/// Anonymous requests are redirected to the login page with `next` set to
/// the requested path and query. Authenticated requests continue with the
/// resolved [`Principal`] stored in the request extensions.
pub async fn require_login(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let principal = resolve_principal(&state, req.headers()).await;

    if !admits(&principal, RouteAccess::LoginRequired) {
        let target = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or(paths::HOME);
        tracing::debug!(requested = target, "Anonymous request to a login-required page");
        return redirect(&paths::login_with_next(target));
    }

    req.extensions_mut().insert(principal);
    next.run(req).await
}

/// The authenticated user behind a login-required route.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Response> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub username: String,
}

impl AuthUser {
    pub fn principal(&self) -> Principal {
        Principal::user(self.user_id, self.username.clone())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = match parts.extensions.get::<Principal>() {
            Some(principal) => principal.clone(),
            None => resolve_principal(state, &parts.headers).await,
        };
        match principal {
            Principal::User { id, username } => Ok(AuthUser {
                user_id: id,
                username,
            }),
            Principal::Anonymous => Err(AppError::Core(CoreError::Unauthenticated)),
        }
    }
}
