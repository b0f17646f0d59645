#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use yanote_api::auth::password::hash_password;
use yanote_api::auth::session::{issue_session, SessionConfig};
use yanote_api::config::ServerConfig;
use yanote_api::router::build_app_router;
use yanote_api::state::AppState;
use yanote_core::access::Principal;
use yanote_core::notes::NoteForm;
use yanote_db::models::note::Note;
use yanote_db::models::session::CreateSession;
use yanote_db::models::user::{CreateUser, User};
use yanote_db::{MemoryStore, NoteStore, SessionStore, UserStore};

pub const TEST_PASSWORD: &str = "winter-is-coming";

/// Build a test `ServerConfig` with a fixed session secret.
pub fn test_config() -> ServerConfig {
    ServerConfig::with_session(SessionConfig::new("test-secret-that-is-long-enough-for-hmac"))
}

/// The full application router over a fresh in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub state: AppState,
}

/// Build the full application router with all middleware layers, exactly as
/// `main.rs` does, backed by [`MemoryStore`].
pub fn build_test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), test_config());
    TestApp {
        router: build_app_router(state.clone()),
        store,
        state,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(request(Method::GET, uri, cookie, Body::empty())).await
    }

    pub async fn post_form(&self, uri: &str, cookie: Option<&str>, fields: &[(&str, &str)]) -> Response {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        let mut req = request(Method::POST, uri, cookie, Body::from(body));
        req.headers_mut().insert(
            CONTENT_TYPE,
            "application/x-www-form-urlencoded".parse().unwrap(),
        );
        self.send(req).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(request(Method::DELETE, uri, cookie, Body::empty())).await
    }

    /// Insert a user whose password is [`TEST_PASSWORD`].
    pub async fn create_user(&self, username: &str) -> User {
        self.store
            .create_user(&CreateUser {
                username: username.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
            })
            .await
            .unwrap()
    }

    /// Open a session for `user` without going through the login form and
    /// return the `Cookie` header value that carries it.
    pub async fn force_login(&self, user: &User) -> String {
        let session_config = &self.state.config.session;
        let issued = issue_session(user.id, &user.username, session_config).unwrap();
        self.store
            .create_session(&CreateSession {
                user_id: user.id,
                token_hash: issued.token_hash,
                expires_at: issued.expires_at,
            })
            .await
            .unwrap();
        format!("{}={}", session_config.cookie_name, issued.token)
    }

    /// Create a note through the service, as `author`.
    pub async fn create_note(&self, author: &User, title: &str, text: &str) -> Note {
        let principal = Principal::user(author.id, author.username.clone());
        self.state
            .note_service()
            .create(&principal, NoteForm::new(title, text, ""))
            .await
            .unwrap()
    }

    pub async fn note_count(&self) -> i64 {
        self.store.count_notes().await.unwrap()
    }

    pub async fn find_note(&self, slug: &str) -> Option<Note> {
        self.store.find_note_by_slug(slug).await.unwrap()
    }
}

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(body).unwrap()
}

/// Read the whole body as UTF-8 text.
pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a `302 Found` to `location`.
pub fn assert_redirects(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], location);
}

/// `name=value` of the `Set-Cookie` header, without attributes.
pub fn set_cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
