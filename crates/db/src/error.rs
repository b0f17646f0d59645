/// Errors raised by a [`Store`](crate::Store) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert or update collided with a unique constraint.
    ///
    /// `constraint` is the constraint name (e.g. [`UQ_NOTES_SLUG`](crate::UQ_NOTES_SLUG)).
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// Whether this is a unique violation on the named constraint.
    pub fn is_unique_violation(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    /// PostgreSQL reports unique violations as SQLSTATE `23505`; those are
    /// lifted into [`StoreError::UniqueViolation`] so callers can react to
    /// them without knowing the backend.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::UniqueViolation { constraint };
            }
        }
        StoreError::Database(err)
    }
}
