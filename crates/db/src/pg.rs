//! PostgreSQL-backed [`Store`], delegating to the repositories.

use async_trait::async_trait;
use yanote_core::types::DbId;

use crate::error::StoreError;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, User};
use crate::repositories::{NoteRepo, SessionRepo, UserRepo};
use crate::store::{NoteStore, SessionStore, Store, UserStore};
use crate::DbPool;

/// [`Store`] over a connection pool. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn insert_note(&self, input: &CreateNote) -> Result<Note, StoreError> {
        Ok(NoteRepo::create(&self.pool, input).await?)
    }

    async fn find_note_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError> {
        Ok(NoteRepo::find_by_slug(&self.pool, slug).await?)
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<DbId>) -> Result<bool, StoreError> {
        Ok(NoteRepo::slug_exists(&self.pool, slug, exclude_id).await?)
    }

    async fn list_notes_by_author(&self, author_id: DbId) -> Result<Vec<Note>, StoreError> {
        Ok(NoteRepo::list_by_author(&self.pool, author_id).await?)
    }

    async fn update_note(&self, id: DbId, input: &UpdateNote) -> Result<Option<Note>, StoreError> {
        Ok(NoteRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_note(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(NoteRepo::delete(&self.pool, id).await?)
    }

    async fn count_notes(&self) -> Result<i64, StoreError> {
        Ok(NoteRepo::count(&self.pool).await?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn record_login(&self, id: DbId) -> Result<(), StoreError> {
        Ok(UserRepo::record_login(&self.pool, id).await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserSession>, StoreError> {
        Ok(SessionRepo::find_active(&self.pool, token_hash).await?)
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(SessionRepo::revoke(&self.pool, token_hash).await?)
    }

    async fn purge_sessions(&self) -> Result<u64, StoreError> {
        Ok(SessionRepo::cleanup_expired(&self.pool).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
