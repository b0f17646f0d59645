//! Persistence for yanote.
//!
//! - [`repositories`] -- zero-sized repositories issuing SQL against a `PgPool`.
//! - [`store`] -- object-safe [`Store`] traits the HTTP layer depends on.
//! - [`PgStore`] -- the PostgreSQL implementation built on the repositories.
//! - [`MemoryStore`] -- an in-process implementation for tests and local runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{NoteStore, SessionStore, Store, UserStore};

pub type DbPool = sqlx::PgPool;

/// Unique constraint on `notes.slug`.
pub const UQ_NOTES_SLUG: &str = "uq_notes_slug";
/// Unique constraint on `users.username`.
pub const UQ_USERS_USERNAME: &str = "uq_users_username";
/// Unique constraint on `user_sessions.token_hash`.
pub const UQ_USER_SESSIONS_TOKEN_HASH: &str = "uq_user_sessions_token_hash";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
