//! Storage abstraction used by the HTTP layer.
//!
//! The traits are object safe (via `async_trait`) so application state can
//! hold an `Arc<dyn Store>` and tests can swap PostgreSQL for
//! [`MemoryStore`](crate::MemoryStore).
//!
//! Implementations must enforce uniqueness atomically: an insert or update
//! that would duplicate a slug, username or session hash fails with
//! [`StoreError::UniqueViolation`] naming the constraint, even when two
//! requests race past any pre-check.

use async_trait::async_trait;
use yanote_core::types::DbId;

use crate::error::StoreError;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, User};

#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn insert_note(&self, input: &CreateNote) -> Result<Note, StoreError>;

    async fn find_note_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError>;

    /// Whether `slug` belongs to any note other than `exclude_id`.
    async fn slug_taken(&self, slug: &str, exclude_id: Option<DbId>) -> Result<bool, StoreError>;

    /// Notes written by `author_id`, ordered by id ascending.
    async fn list_notes_by_author(&self, author_id: DbId) -> Result<Vec<Note>, StoreError>;

    /// Returns `None` if the note no longer exists.
    async fn update_note(&self, id: DbId, input: &UpdateNote) -> Result<Option<Note>, StoreError>;

    /// Returns `true` if a note was removed.
    async fn delete_note(&self, id: DbId) -> Result<bool, StoreError>;

    async fn count_notes(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn record_login(&self, id: DbId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError>;

    /// A session that is neither revoked nor expired.
    async fn find_active_session(&self, token_hash: &str)
        -> Result<Option<UserSession>, StoreError>;

    /// Returns `true` if an active session was revoked.
    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Drop expired and revoked sessions, returning how many were removed.
    async fn purge_sessions(&self) -> Result<u64, StoreError>;
}

/// Everything the application needs from persistence.
#[async_trait]
pub trait Store: NoteStore + UserStore + SessionStore {
    /// Cheap liveness probe for `/health`.
    async fn health_check(&self) -> Result<(), StoreError>;
}
