//! Note use cases: create, list, detail, edit and delete.
//!
//! Every operation runs the access gate before touching a note, and every
//! write resolves the slug, pre-checks its uniqueness and then relies on the
//! store's unique constraint for the race the pre-check cannot see.

use yanote_core::access::{can_access, NoteAction, Principal};
use yanote_core::error::{CoreError, FieldErrors};
use yanote_core::notes::{NoteForm, FIELD_SLUG, FIELD_TITLE};
use yanote_core::slug::{duplicate_slug_message, resolve_slug, SlugError};
use yanote_core::types::DbId;
use yanote_db::models::note::{CreateNote, Note, UpdateNote};
use yanote_db::{NoteStore, Store, StoreError, UQ_NOTES_SLUG};

use crate::error::{AppError, AppResult};

pub struct NoteService<'a> {
    store: &'a dyn Store,
    warning_suffix: &'a str,
}

impl<'a> NoteService<'a> {
    pub fn new(store: &'a dyn Store, warning_suffix: &'a str) -> Self {
        Self {
            store,
            warning_suffix,
        }
    }

    pub async fn create(&self, principal: &Principal, form: NoteForm) -> AppResult<Note> {
        let author_id = require_user(principal)?;
        let form = form.normalized();

        let slug = self.validate(&form, None, None).await?;
        let input = CreateNote {
            title: form.title,
            text: form.text,
            slug,
            author_id,
        };

        let note = self
            .store
            .insert_note(&input)
            .await
            .map_err(|e| self.slug_conflict(e, &input.slug))?;

        tracing::info!(user_id = author_id, note_id = note.id, slug = %note.slug, "Note created");
        Ok(note)
    }

    /// The principal's own notes, oldest first.
    pub async fn list(&self, principal: &Principal) -> AppResult<Vec<Note>> {
        let author_id = require_user(principal)?;
        let notes = self.store.list_notes_by_author(author_id).await?;
        Ok(notes
            .into_iter()
            .filter(|note| can_access(principal, note.author_id, NoteAction::List))
            .collect())
    }

    pub async fn detail(&self, principal: &Principal, slug: &str) -> AppResult<Note> {
        self.owned_note(principal, slug, NoteAction::View).await
    }

    /// Replace title, text and slug of the principal's note.
    ///
    /// An empty slug is derived from the new title; the note's current slug
    /// may be resubmitted as is.
    pub async fn edit(&self, principal: &Principal, slug: &str, form: NoteForm) -> AppResult<Note> {
        let note = self.owned_note(principal, slug, NoteAction::Edit).await?;
        let form = form.normalized();

        let new_slug = self.validate(&form, Some(note.id), Some(&note.slug)).await?;
        let input = UpdateNote {
            title: form.title,
            text: form.text,
            slug: new_slug,
        };

        let updated = self
            .store
            .update_note(note.id, &input)
            .await
            .map_err(|e| self.slug_conflict(e, &input.slug))?
            .ok_or_else(|| CoreError::note_not_found(slug))?;

        tracing::info!(
            user_id = updated.author_id,
            note_id = updated.id,
            slug = %updated.slug,
            "Note updated"
        );
        Ok(updated)
    }

    pub async fn delete(&self, principal: &Principal, slug: &str) -> AppResult<()> {
        let note = self.owned_note(principal, slug, NoteAction::Delete).await?;
        if !self.store.delete_note(note.id).await? {
            return Err(CoreError::note_not_found(slug).into());
        }
        tracing::info!(user_id = note.author_id, note_id = note.id, slug = %note.slug, "Note deleted");
        Ok(())
    }

    /// Look a note up and run the access gate. Missing and foreign notes are
    /// both reported as not found.
    async fn owned_note(
        &self,
        principal: &Principal,
        slug: &str,
        action: NoteAction,
    ) -> AppResult<Note> {
        require_user(principal)?;
        match self.store.find_note_by_slug(slug).await? {
            Some(note) if can_access(principal, note.author_id, action) => Ok(note),
            Some(note) => {
                tracing::debug!(note_id = note.id, ?action, "Access to foreign note refused");
                Err(CoreError::note_not_found(slug).into())
            }
            None => Err(CoreError::note_not_found(slug).into()),
        }
    }

    /// Collect every problem with a submitted form and return the slug to
    /// store when there are none.
    ///
    /// `exclude_id` is the note being edited, `current_slug` its slug.
    async fn validate(
        &self,
        form: &NoteForm,
        exclude_id: Option<DbId>,
        current_slug: Option<&str>,
    ) -> AppResult<String> {
        let mut errors = form.field_errors();

        let slug = if errors.has(FIELD_SLUG) {
            None
        } else if current_slug.is_some() && form.explicit_slug() == current_slug {
            current_slug.map(str::to_string)
        } else {
            match resolve_slug(&form.title, form.explicit_slug()) {
                Ok(slug) => Some(slug),
                // A blank title is already reported on its own field.
                Err(SlugError::Underivable) if errors.has(FIELD_TITLE) => None,
                Err(e) => {
                    errors.add(FIELD_SLUG, e.to_string());
                    None
                }
            }
        };

        if let Some(slug) = &slug {
            if self.store.slug_taken(slug, exclude_id).await? {
                errors.add(FIELD_SLUG, duplicate_slug_message(slug, self.warning_suffix));
            }
        }

        match slug {
            Some(slug) if errors.is_empty() => Ok(slug),
            _ => Err(invalid_or(errors)),
        }
    }

    /// Turn a slug unique violation into the duplicate-slug form error.
    fn slug_conflict(&self, err: StoreError, slug: &str) -> AppError {
        if err.is_unique_violation(UQ_NOTES_SLUG) {
            CoreError::invalid(FIELD_SLUG, duplicate_slug_message(slug, self.warning_suffix)).into()
        } else {
            err.into()
        }
    }
}

fn require_user(principal: &Principal) -> Result<DbId, CoreError> {
    principal.user_id().ok_or(CoreError::Unauthenticated)
}

fn invalid_or(errors: FieldErrors) -> AppError {
    match errors.into_result() {
        Err(e) => e.into(),
        // Unreachable in practice: no slug is only possible alongside errors.
        Ok(()) => CoreError::Internal("slug missing without validation errors".into()).into(),
    }
}
