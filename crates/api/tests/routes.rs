//! Route availability: which pages answer whom, and how.

mod common;

use axum::http::StatusCode;
use common::{assert_redirects, build_test_app};
use yanote_api::paths;

// ---------------------------------------------------------------------------
// Test: public pages are available to anonymous visitors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn public_pages_available_to_anonymous() {
    let app = build_test_app();
    for uri in [paths::HOME, paths::LOGIN, paths::LOGOUT, paths::SIGNUP] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    }
}

// ---------------------------------------------------------------------------
// Test: the author can open every page of their note
// ---------------------------------------------------------------------------

#[tokio::test]
async fn note_pages_available_to_author() {
    let app = build_test_app();
    let author = app.create_user("John Snow").await;
    let note = app.create_note(&author, "Название заметки", "Текст заметки").await;
    let cookie = app.force_login(&author).await;

    let uris = [
        paths::note_detail(&note.slug),
        paths::NOTES_LIST.to_string(),
        paths::note_edit(&note.slug),
        paths::note_delete(&note.slug),
        paths::NOTE_ADD.to_string(),
        paths::SUCCESS.to_string(),
    ];
    for uri in &uris {
        let response = app.get(uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
    }
}

// ---------------------------------------------------------------------------
// Test: another user gets 404 for the author's note pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn note_pages_not_found_for_other_user() {
    let app = build_test_app();
    let author = app.create_user("Автор").await;
    let reader = app.create_user("Читатель").await;
    let note = app.create_note(&author, "Заметка", "Просто текст").await;
    let cookie = app.force_login(&reader).await;

    for uri in [
        paths::note_detail(&note.slug),
        paths::note_edit(&note.slug),
        paths::note_delete(&note.slug),
    ] {
        let response = app.get(&uri, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }
}

// ---------------------------------------------------------------------------
// Test: anonymous visitors are redirected to login with `next`
// ---------------------------------------------------------------------------

#[tokio::test]
async fn anonymous_redirected_to_login() {
    let app = build_test_app();
    let author = app.create_user("Автор").await;
    let note = app.create_note(&author, "Заметка", "").await;

    let uris = [
        paths::NOTES_LIST.to_string(),
        paths::NOTE_ADD.to_string(),
        paths::SUCCESS.to_string(),
        paths::note_detail(&note.slug),
        paths::note_edit(&note.slug),
        paths::note_delete(&note.slug),
    ];
    for uri in &uris {
        let response = app.get(uri, None).await;
        assert_redirects(&response, &format!("{}?next={uri}", paths::LOGIN));
    }
}

#[tokio::test]
async fn redirect_keeps_query_string_encoded() {
    let app = build_test_app();
    let response = app.get("/notes/?page=2", None).await;
    assert_redirects(&response, "/auth/login/?next=/notes/%3Fpage%3D2");
}

// ---------------------------------------------------------------------------
// Test: a tampered cookie counts as anonymous
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_cookie_is_anonymous() {
    let app = build_test_app();
    let response = app
        .get(paths::NOTES_LIST, Some("sessionid=not-a-token"))
        .await;
    assert_redirects(&response, "/auth/login/?next=/notes/");
}

#[tokio::test]
async fn anonymous_post_is_redirected_too() {
    let app = build_test_app();
    let response = app
        .post_form(paths::NOTE_ADD, None, &[("title", "t"), ("text", "x")])
        .await;
    assert_redirects(&response, "/auth/login/?next=/add/");
}
