//! Signup, login and logout through the HTTP forms.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use common::{assert_redirects, body_text, build_test_app, set_cookie_pair, TEST_PASSWORD};
use yanote_api::paths;
use yanote_api::views::escape;
use yanote_core::users::{INVALID_LOGIN, PASSWORD_MISMATCH, USERNAME_TAKEN};
use yanote_db::UserStore;

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_creates_user_and_redirects_to_login() {
    let app = build_test_app();
    let response = app
        .post_form(
            paths::SIGNUP,
            None,
            &[
                ("username", "arya"),
                ("password1", "needle-and-thread"),
                ("password2", "needle-and-thread"),
            ],
        )
        .await;
    assert_redirects(&response, paths::LOGIN);

    let user = app.store.find_user_by_username("arya").await.unwrap().unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn signup_rejects_mismatched_passwords() {
    let app = build_test_app();
    let response = app
        .post_form(
            paths::SIGNUP,
            None,
            &[
                ("username", "arya"),
                ("password1", "needle-and-thread"),
                ("password2", "something-else"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(&escape(PASSWORD_MISMATCH)));
    assert!(app.store.find_user_by_username("arya").await.unwrap().is_none());
}

#[tokio::test]
async fn signup_rejects_taken_username() {
    let app = build_test_app();
    app.create_user("arya").await;

    let response = app
        .post_form(
            paths::SIGNUP,
            None,
            &[
                ("username", "arya"),
                ("password1", "needle-and-thread"),
                ("password2", "needle-and-thread"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(USERNAME_TAKEN));
}

#[tokio::test]
async fn signup_enforces_password_rules() {
    let app = build_test_app();
    for password in ["short", "1234567890", "arya-stark"] {
        let response = app
            .post_form(
                paths::SIGNUP,
                None,
                &[
                    ("username", "arya-stark"),
                    ("password1", password),
                    ("password2", password),
                ],
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "password {password:?}");
    }
    assert!(app.store.find_user_by_username("arya-stark").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_wrong_password_rerenders_form() {
    let app = build_test_app();
    app.create_user("arya").await;

    let response = app
        .post_form(paths::LOGIN, None, &[("username", "arya"), ("password", "wrong")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert!(body_text(response).await.contains(&escape(INVALID_LOGIN)));
}

#[tokio::test]
async fn login_with_unknown_user_rerenders_form() {
    let app = build_test_app();
    let response = app
        .post_form(paths::LOGIN, None, &[("username", "nobody"), ("password", "whatever")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_none());
}

#[tokio::test]
async fn login_sets_cookie_and_honours_next() {
    let app = build_test_app();
    app.create_user("arya").await;

    let response = app
        .post_form(
            paths::LOGIN,
            None,
            &[("username", "arya"), ("password", TEST_PASSWORD), ("next", "/notes/")],
        )
        .await;
    assert_redirects(&response, paths::NOTES_LIST);

    let cookie_header = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cookie_header.starts_with("sessionid="));
    assert!(cookie_header.contains("HttpOnly"));
    assert!(cookie_header.contains("SameSite=Lax"));

    let user = app.store.find_user_by_username("arya").await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[tokio::test]
async fn login_ignores_offsite_next() {
    let app = build_test_app();
    app.create_user("arya").await;

    let response = app
        .post_form(
            paths::LOGIN,
            None,
            &[
                ("username", "arya"),
                ("password", TEST_PASSWORD),
                ("next", "//evil.example/"),
            ],
        )
        .await;
    assert_redirects(&response, paths::HOME);
}

#[tokio::test]
async fn login_ignores_next_with_tab() {
    let app = build_test_app();
    app.create_user("arya").await;

    let response = app
        .post_form(
            paths::LOGIN,
            None,
            &[
                ("username", "arya"),
                ("password", TEST_PASSWORD),
                ("next", "/\t/evil.example/"),
            ],
        )
        .await;
    assert_redirects(&response, paths::HOME);
}

#[tokio::test]
async fn login_ignores_next_with_newline() {
    let app = build_test_app();
    app.create_user("arya").await;

    let response = app
        .post_form(
            paths::LOGIN,
            None,
            &[
                ("username", "arya"),
                ("password", TEST_PASSWORD),
                ("next", "/notes/\n"),
            ],
        )
        .await;
    assert_redirects(&response, paths::HOME);
    assert!(set_cookie_pair(&response).is_some());
}

#[tokio::test]
async fn login_page_carries_next() {
    let app = build_test_app();
    let body = body_text(app.get("/auth/login/?next=/add/", None).await).await;
    assert!(body.contains("name=\"next\" value=\"/add/\""));
}

// ---------------------------------------------------------------------------
// Full flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn signup_login_use_logout() {
    let app = build_test_app();

    app.post_form(
        paths::SIGNUP,
        None,
        &[
            ("username", "Санса"),
            ("password1", "lemon-cakes-42"),
            ("password2", "lemon-cakes-42"),
        ],
    )
    .await;

    let login = app
        .post_form(
            paths::LOGIN,
            None,
            &[("username", "Санса"), ("password", "lemon-cakes-42")],
        )
        .await;
    assert_redirects(&login, paths::HOME);
    let cookie = set_cookie_pair(&login).unwrap();

    let list = app.get(paths::NOTES_LIST, Some(&cookie)).await;
    assert_eq!(list.status(), StatusCode::OK);

    let add = app
        .post_form(paths::NOTE_ADD, Some(&cookie), &[("title", "Список дел"), ("text", "")])
        .await;
    assert_redirects(&add, paths::SUCCESS);

    let logout = app.post_form(paths::LOGOUT, Some(&cookie), &[]).await;
    assert_eq!(logout.status(), StatusCode::OK);
    assert!(logout.headers()[SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

    // The old cookie no longer authenticates.
    let after = app.get(paths::NOTES_LIST, Some(&cookie)).await;
    assert_redirects(&after, "/auth/login/?next=/notes/");
}

#[tokio::test]
async fn logout_via_get_is_allowed() {
    let app = build_test_app();
    let user = app.create_user("arya").await;
    let cookie = app.force_login(&user).await;

    let response = app.get(paths::LOGOUT, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let after = app.get(paths::NOTES_LIST, Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::FOUND);
}
