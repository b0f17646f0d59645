//! Repository for the `notes` table.

use sqlx::PgPool;
use yanote_core::types::DbId;

use crate::models::note::{CreateNote, Note, UpdateNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, text, slug, author_id, created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    ///
    /// A taken slug fails with a unique violation on `uq_notes_slug`.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (title, text, slug, author_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.text)
            .bind(&input.slug)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a note by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE slug = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `slug` is used by a note other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM notes
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List the notes written by `author_id`, oldest first.
    pub async fn list_by_author(pool: &PgPool, author_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE author_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the editable fields of a note.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                title = $2,
                text = $3,
                slug = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.text)
            .bind(&input.slug)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a note. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of notes across all authors.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
