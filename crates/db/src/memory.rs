//! In-process [`Store`] used by tests and by servers started without
//! `DATABASE_URL`.
//!
//! All state sits behind one async mutex, so every check-and-write runs
//! atomically and unique constraints hold under concurrent requests exactly
//! as they do in PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use yanote_core::types::DbId;

use crate::error::StoreError;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::session::{CreateSession, UserSession};
use crate::models::user::{CreateUser, User};
use crate::store::{NoteStore, SessionStore, Store, UserStore};
use crate::{UQ_NOTES_SLUG, UQ_USERS_USERNAME, UQ_USER_SESSIONS_TOKEN_HASH};

#[derive(Default)]
struct Tables {
    notes: BTreeMap<DbId, Note>,
    users: BTreeMap<DbId, User>,
    sessions: BTreeMap<DbId, UserSession>,
    last_note_id: DbId,
    last_user_id: DbId,
    last_session_id: DbId,
}

/// A [`Store`] holding everything in memory. Ids start at 1 per table and
/// are never reused, like BIGSERIAL columns.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn insert_note(&self, input: &CreateNote) -> Result<Note, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.notes.values().any(|n| n.slug == input.slug) {
            return Err(unique_violation(UQ_NOTES_SLUG));
        }
        tables.last_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: tables.last_note_id,
            title: input.title.clone(),
            text: input.text.clone(),
            slug: input.slug.clone(),
            author_id: input.author_id,
            created_at: now,
            updated_at: now,
        };
        tables.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn find_note_by_slug(&self, slug: &str) -> Result<Option<Note>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.notes.values().find(|n| n.slug == slug).cloned())
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<DbId>) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .notes
            .values()
            .any(|n| n.slug == slug && Some(n.id) != exclude_id))
    }

    async fn list_notes_by_author(&self, author_id: DbId) -> Result<Vec<Note>, StoreError> {
        let tables = self.tables.lock().await;
        // BTreeMap iteration is already in id order.
        Ok(tables
            .notes
            .values()
            .filter(|n| n.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn update_note(&self, id: DbId, input: &UpdateNote) -> Result<Option<Note>, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .notes
            .values()
            .any(|n| n.slug == input.slug && n.id != id)
        {
            return Err(unique_violation(UQ_NOTES_SLUG));
        }
        let Some(note) = tables.notes.get_mut(&id) else {
            return Ok(None);
        };
        note.title = input.title.clone();
        note.text = input.text.clone();
        note.slug = input.slug.clone();
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.notes.remove(&id).is_some())
    }

    async fn count_notes(&self) -> Result<i64, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.notes.len() as i64)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(unique_violation(UQ_USERS_USERNAME));
        }
        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            username: input.username.clone(),
            password_hash: input.password_hash.clone(),
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn record_login(&self, id: DbId) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(user) = tables.users.get_mut(&id) {
            let now = Utc::now();
            user.last_login_at = Some(now);
            user.updated_at = now;
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn create_session(&self, input: &CreateSession) -> Result<UserSession, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables
            .sessions
            .values()
            .any(|s| s.token_hash == input.token_hash)
        {
            return Err(unique_violation(UQ_USER_SESSIONS_TOKEN_HASH));
        }
        tables.last_session_id += 1;
        let session = UserSession {
            id: tables.last_session_id,
            user_id: input.user_id,
            token_hash: input.token_hash.clone(),
            expires_at: input.expires_at,
            is_revoked: false,
            created_at: Utc::now(),
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<UserSession>, StoreError> {
        let tables = self.tables.lock().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .values()
            .find(|s| s.token_hash == token_hash && !s.is_revoked && s.expires_at > now)
            .cloned())
    }

    async fn revoke_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let session = tables
            .sessions
            .values_mut()
            .find(|s| s.token_hash == token_hash && !s.is_revoked);
        Ok(match session {
            Some(session) => {
                session.is_revoked = true;
                true
            }
            None => false,
        })
    }

    async fn purge_sessions(&self) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let before = tables.sessions.len();
        tables
            .sessions
            .retain(|_, s| !s.is_revoked && s.expires_at >= now);
        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
