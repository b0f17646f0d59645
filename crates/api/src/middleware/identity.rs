//! Resolving the session cookie to a [`Principal`].

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use yanote_core::access::Principal;
use yanote_db::SessionStore;

use crate::auth::session::{hash_session_id, read_cookie, validate_token};
use crate::state::AppState;

/// A session that passed every check: valid signature, unexpired claims and
/// an active `user_sessions` row.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub principal: Principal,
    /// Stored hash of the session id; used to revoke the session on logout.
    pub token_hash: String,
}

/// Look up the session carried by the request cookie.
///
/// Any failure (missing or tampered cookie, expired token, revoked or
/// unknown session, store error) yields `None`.
pub async fn resolve_session(state: &AppState, headers: &HeaderMap) -> Option<ActiveSession> {
    let session_config = &state.config.session;
    let token = read_cookie(headers, &session_config.cookie_name)?;

    let claims = match validate_token(token, session_config) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session token");
            return None;
        }
    };

    let token_hash = hash_session_id(&claims.jti);
    match state.store.find_active_session(&token_hash).await {
        Ok(Some(session)) if session.user_id == claims.sub => Some(ActiveSession {
            principal: Principal::user(claims.sub, claims.username),
            token_hash,
        }),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed, treating request as anonymous");
            None
        }
    }
}

/// The requesting principal, anonymous when the session does not check out.
pub async fn resolve_principal(state: &AppState, headers: &HeaderMap) -> Principal {
    resolve_session(state, headers)
        .await
        .map(|s| s.principal)
        .unwrap_or(Principal::Anonymous)
}

/// Extractor for pages that render differently for signed-in visitors but
/// never require it.
///
/// Reuses the principal stored by [`require_login`](super::login_required::require_login)
/// when the route is behind it.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Principal);

impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(CurrentPrincipal(principal.clone()));
        }
        Ok(CurrentPrincipal(resolve_principal(state, &parts.headers).await))
    }
}
