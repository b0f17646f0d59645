//! Note entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yanote_core::types::{DbId, Timestamp};

/// A row from the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a note. The slug must already be resolved.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: DbId,
}

/// DTO for replacing the editable fields of a note.
///
/// Edits are full-form submissions, so every field is required.
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}
