pub mod health;

use axum::routing::get;
use axum::{middleware, Router};

use crate::handlers::{notes, pages, users};
use crate::middleware::login_required::require_login;
use crate::paths;
use crate::state::AppState;

/// Build the page routes.
///
/// Route hierarchy:
///
/// ```text
/// Public
/// /                      home
/// /auth/signup/          signup form, submit
/// /auth/login/           login form, submit
/// /auth/logout/          logout (GET or POST)
///
/// Login required (anonymous -> /auth/login/?next=...)
/// /notes/                list own notes
/// /add/                  create form, submit
/// /done/                 success landing page
/// /note/{slug}/          detail (owner only)
/// /edit/{slug}/          edit form, submit (owner only)
/// /delete/{slug}/        confirm (GET), delete (POST, DELETE) (owner only)
/// ```
pub fn page_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(public_routes())
        .merge(login_required_routes(state))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route(paths::HOME, get(pages::home))
        .route(paths::SIGNUP, get(users::signup_form).post(users::signup))
        .route(paths::LOGIN, get(users::login_form).post(users::login))
        .route(paths::LOGOUT, get(users::logout).post(users::logout))
}

fn login_required_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(paths::NOTES_LIST, get(notes::list))
        .route(paths::NOTE_ADD, get(notes::add_form).post(notes::add))
        .route(paths::SUCCESS, get(pages::success))
        .route(paths::NOTE_DETAIL_ROUTE, get(notes::detail))
        .route(paths::NOTE_EDIT_ROUTE, get(notes::edit_form).post(notes::edit))
        .route(
            paths::NOTE_DELETE_ROUTE,
            get(notes::delete_confirm)
                .post(notes::delete)
                .delete(notes::delete),
        )
        .route_layer(middleware::from_fn_with_state(state, require_login))
}
