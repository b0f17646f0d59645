//! Handlers for the note pages.
//!
//! All of these sit behind [`require_login`](crate::middleware::login_required::require_login).
//! Ownership is checked by the [`NoteService`](crate::service::NoteService);
//! someone else's note is indistinguishable from a missing one.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Form;
use yanote_core::access::Principal;
use yanote_core::error::{CoreError, FieldErrors};
use yanote_core::notes::NoteForm;

use crate::error::{redirect, AppError, AppResult};
use crate::middleware::login_required::AuthUser;
use crate::state::AppState;
use crate::{paths, views};

const ADD_HEADING: &str = "Новая заметка";
const EDIT_HEADING: &str = "Редактирование заметки";

/// GET /notes/
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Response> {
    let principal = user.principal();
    let notes = state.note_service().list(&principal).await?;
    Ok(views::page(StatusCode::OK, views::note_list(&principal, &notes)))
}

/// GET /add/
pub async fn add_form(user: AuthUser) -> Response {
    let html = views::note_form(
        &user.principal(),
        ADD_HEADING,
        paths::NOTE_ADD,
        &NoteForm::default(),
        &FieldErrors::new(),
    );
    views::page(StatusCode::OK, html)
}

/// POST /add/
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    Form(form): Form<NoteForm>,
) -> AppResult<Response> {
    let principal = user.principal();
    match state.note_service().create(&principal, form.clone()).await {
        Ok(_) => Ok(redirect(paths::SUCCESS)),
        Err(err) => rerender(err, &principal, ADD_HEADING, paths::NOTE_ADD, &form),
    }
}

/// GET /note/{slug}/
pub async fn detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let principal = user.principal();
    let note = state.note_service().detail(&principal, &slug).await?;
    Ok(views::page(StatusCode::OK, views::note_detail(&principal, &note)))
}

/// GET /edit/{slug}/
pub async fn edit_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let principal = user.principal();
    let note = state.note_service().detail(&principal, &slug).await?;
    let form = NoteForm::new(note.title, note.text, note.slug);
    let html = views::note_form(
        &principal,
        EDIT_HEADING,
        &paths::note_edit(&slug),
        &form,
        &FieldErrors::new(),
    );
    Ok(views::page(StatusCode::OK, html))
}

/// POST /edit/{slug}/
pub async fn edit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
    Form(form): Form<NoteForm>,
) -> AppResult<Response> {
    let principal = user.principal();
    match state.note_service().edit(&principal, &slug, form.clone()).await {
        Ok(_) => Ok(redirect(paths::SUCCESS)),
        Err(err) => rerender(err, &principal, EDIT_HEADING, &paths::note_edit(&slug), &form),
    }
}

/// GET /delete/{slug}/
pub async fn delete_confirm(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let principal = user.principal();
    let note = state.note_service().detail(&principal, &slug).await?;
    Ok(views::page(
        StatusCode::OK,
        views::note_delete_confirm(&principal, &note),
    ))
}

/// POST or DELETE /delete/{slug}/
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    state.note_service().delete(&user.principal(), &slug).await?;
    Ok(redirect(paths::SUCCESS))
}

/// Validation failures go back to the form with status 200; anything else
/// propagates.
fn rerender(
    err: AppError,
    principal: &Principal,
    heading: &str,
    action: &str,
    form: &NoteForm,
) -> AppResult<Response> {
    match err {
        AppError::Core(CoreError::Validation(errors)) => {
            let html = views::note_form(principal, heading, action, form, &errors);
            Ok(views::page(StatusCode::OK, html))
        }
        other => Err(other),
    }
}
