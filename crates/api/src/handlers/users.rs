//! Handlers for the `/auth` pages (signup, login, logout).

use axum::extract::{Query, State};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use yanote_core::error::FieldErrors;
use yanote_core::users::{LoginForm, SignupForm, USERNAME_TAKEN};
use yanote_db::models::session::CreateSession;
use yanote_db::models::user::CreateUser;
use yanote_db::{SessionStore, UserStore, UQ_USERS_USERNAME};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::session::{clear_session_cookie, issue_session, session_cookie};
use crate::error::{redirect, AppError, AppResult};
use crate::middleware::identity::{resolve_session, CurrentPrincipal};
use crate::state::AppState;
use crate::{paths, views};

/// Query string of `GET /auth/login/`.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// GET /auth/signup/
pub async fn signup_form() -> Response {
    views::page(StatusCode::OK, views::signup("", &FieldErrors::new()))
}

/// POST /auth/signup/
///
/// Creates the account and sends the visitor to the login page.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let username = form.username.trim().to_string();
    let form = SignupForm { username, ..form };

    let mut errors = form.field_errors();
    if !form.password1.is_empty() {
        errors.extend(validate_password_strength(
            &form.password1,
            &form.username,
            state.config.min_password_length,
        ));
    }
    if !errors.has("username")
        && state
            .store
            .find_user_by_username(&form.username)
            .await?
            .is_some()
    {
        errors.add("username", USERNAME_TAKEN);
    }
    if !errors.is_empty() {
        return Ok(signup_rerender(&form.username, &errors));
    }

    let password_hash = hash_password(&form.password1)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateUser {
        username: form.username.clone(),
        password_hash,
    };
    let user = match state.store.create_user(&input).await {
        Ok(user) => user,
        Err(e) if e.is_unique_violation(UQ_USERS_USERNAME) => {
            let errors = FieldErrors::single("username", USERNAME_TAKEN);
            return Ok(signup_rerender(&form.username, &errors));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(redirect(paths::LOGIN))
}

fn signup_rerender(username: &str, errors: &FieldErrors) -> Response {
    views::page(StatusCode::OK, views::signup(username, errors))
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// GET /auth/login/
pub async fn login_form(
    CurrentPrincipal(principal): CurrentPrincipal,
    Query(query): Query<LoginQuery>,
) -> Response {
    let html = views::login(&principal, "", query.next.as_deref(), &FieldErrors::new());
    views::page(StatusCode::OK, html)
}

/// POST /auth/login/
///
/// Verifies the credentials, opens a session, sets the cookie and redirects
/// to `next` (when it is a local path) or home.
pub async fn login(
    State(state): State<AppState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let rerender = |errors: &FieldErrors| {
        let html = views::login(&principal, &form.username, form.next.as_deref(), errors);
        views::page(StatusCode::OK, html)
    };

    let errors = form.field_errors();
    if !errors.is_empty() {
        return Ok(rerender(&errors));
    }

    // 1. Find the user and verify the password.
    let user = match state.store.find_user_by_username(&form.username).await? {
        Some(user) => user,
        None => {
            tracing::info!(username = %form.username, "Login failed: unknown username");
            return Ok(rerender(&LoginForm::invalid_credentials()));
        }
    };

    let password_valid = verify_password(&form.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login failed: wrong password");
        return Ok(rerender(&LoginForm::invalid_credentials()));
    }

    // 2. Record the login and open a session.
    state.store.record_login(user.id).await?;

    let session_config = &state.config.session;
    let issued = issue_session(user.id, &user.username, session_config)
        .map_err(|e| AppError::InternalError(format!("Session token error: {e}")))?;
    state
        .store
        .create_session(&CreateSession {
            user_id: user.id,
            token_hash: issued.token_hash,
            expires_at: issued.expires_at,
        })
        .await?;

    tracing::info!(user_id = user.id, "User logged in");

    // 3. Redirect with the cookie.
    let target = form
        .next
        .as_deref()
        .filter(|next| paths::is_safe_next(next))
        .unwrap_or(paths::HOME);
    Ok((
        StatusCode::FOUND,
        [
            (LOCATION, target.to_string()),
            (SET_COOKIE, session_cookie(&issued.token, session_config)),
        ],
    )
        .into_response())
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

/// GET or POST /auth/logout/
///
/// Revokes the current session (if any) and clears the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(session) = resolve_session(&state, &headers).await {
        state.store.revoke_session(&session.token_hash).await?;
        tracing::info!(user_id = ?session.principal.user_id(), "User logged out");
    }

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, clear_session_cookie(&state.config.session))],
        Html(views::logged_out()),
    )
        .into_response())
}
