//! Account forms and username rules.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{FieldErrors, NON_FIELD_ERRORS};

/// Maximum length of a username in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Punctuation allowed in usernames besides letters and digits.
const USERNAME_EXTRA_CHARS: &[char] = &['@', '.', '+', '-', '_'];

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH: &str = "The two password fields didn't match.";
pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(
        custom(function = "username_chars"),
        length(max = 150, message = "Ensure this value has at most 150 characters.")
    )]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub password1: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub password2: String,
}

impl SignupForm {
    /// Field checks plus the password confirmation match.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if !self.password1.is_empty()
            && !self.password2.is_empty()
            && self.password1 != self.password2
        {
            errors.add("password2", PASSWORD_MISMATCH);
        }
        errors
    }
}

/// Login form. `next` carries the page the visitor originally asked for.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", "This field is required.");
        }
        if self.password.is_empty() {
            errors.add("password", "This field is required.");
        }
        errors
    }

    /// Error shown when the credentials do not match any account.
    pub fn invalid_credentials() -> FieldErrors {
        FieldErrors::single(NON_FIELD_ERRORS, INVALID_LOGIN)
    }
}

/// Whether `username` only uses letters, digits and `@ . + - _`.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || USERNAME_EXTRA_CHARS.contains(&c))
}

fn username_chars(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return required(value);
    }
    if !is_valid_username(value) {
        return Err(ValidationError::new("invalid_username").with_message(Cow::Borrowed(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )));
    }
    Ok(())
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("This field is required.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, p1: &str, p2: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            password1: p1.into(),
            password2: p2.into(),
        }
    }

    #[test]
    fn cyrillic_usernames_are_valid() {
        assert!(is_valid_username("Автор"));
        assert!(is_valid_username("sansa.stark+notes@winterfell"));
    }

    #[test]
    fn spaces_are_not_allowed() {
        assert!(!is_valid_username("Sansa Stark"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn valid_signup_has_no_errors() {
        assert!(signup("arya", "needle-123", "needle-123").field_errors().is_empty());
    }

    #[test]
    fn mismatched_passwords_are_reported_on_confirmation() {
        let errors = signup("arya", "needle-123", "needle-456").field_errors();
        assert_eq!(errors.get("password2"), [PASSWORD_MISMATCH]);
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = signup("", "", "").field_errors();
        assert!(errors.has("username"));
        assert!(errors.has("password1"));
        assert!(errors.has("password2"));
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = LoginForm::default().field_errors();
        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }

    #[test]
    fn invalid_credentials_is_a_form_level_error() {
        let errors = LoginForm::invalid_credentials();
        assert_eq!(errors.get(NON_FIELD_ERRORS), [INVALID_LOGIN]);
    }
}
