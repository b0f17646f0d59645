//! Note form constants and field validation.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::FieldErrors;

/// Maximum length of a note title in characters.
pub const MAX_TITLE_LENGTH: usize = 100;

pub const FIELD_TITLE: &str = "title";
pub const FIELD_TEXT: &str = "text";
pub const FIELD_SLUG: &str = "slug";

/// A submitted note form (create or edit).
///
/// Every field defaults to empty so a missing form field is reported as a
/// validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct NoteForm {
    #[serde(default)]
    #[validate(
        custom(function = "required"),
        length(max = 100, message = "Ensure this value has at most 100 characters.")
    )]
    pub title: String,

    #[serde(default)]
    pub text: String,

    /// Optional; an empty slug is derived from the title.
    #[serde(default)]
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub slug: String,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, text: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
        }
    }

    /// Trim surrounding whitespace from the single-line fields.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.slug = self.slug.trim().to_string();
        self
    }

    /// The explicit slug, if the user typed one.
    pub fn explicit_slug(&self) -> Option<&str> {
        Some(self.slug.as_str()).filter(|s| !s.is_empty())
    }

    /// Field-level checks that do not need the store.
    pub fn field_errors(&self) -> FieldErrors {
        match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(errors) => errors.into(),
        }
    }
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("This field is required.")));
    }
    Ok(())
}
