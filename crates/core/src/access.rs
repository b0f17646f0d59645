//! Who may see or touch a note, and which routes admit anonymous visitors.
//!
//! Notes are strictly private: only the author can view, list, edit or
//! delete them. A refusal is reported to clients as "not found" so the
//! existence of other users' notes never leaks.

use crate::types::DbId;

/// The party making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    User { id: DbId, username: String },
}

impl Principal {
    pub fn user(id: DbId, username: impl Into<String>) -> Self {
        Principal::User {
            id,
            username: username.into(),
        }
    }

    /// The authenticated user's id, or `None` for anonymous requests.
    pub fn user_id(&self) -> Option<DbId> {
        match self {
            Principal::Anonymous => None,
            Principal::User { id, .. } => Some(*id),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Principal::Anonymous => None,
            Principal::User { username, .. } => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User { .. })
    }
}

/// Something a principal wants to do with a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    View,
    /// Appear in the principal's note list.
    List,
    Edit,
    Delete,
}

/// Whether `principal` may perform `action` on a note written by `author_id`.
///
/// Ownership is the only rule: every action is allowed to the author and
/// refused to everyone else, anonymous visitors included.
pub fn can_access(principal: &Principal, author_id: DbId, _action: NoteAction) -> bool {
    principal.user_id() == Some(author_id)
}

/// Route-level authentication requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Open to everyone (home, login, logout, signup).
    Public,
    /// Anonymous visitors are sent to the login page.
    LoginRequired,
}

/// Whether a route with the given requirement admits `principal`.
pub fn admits(principal: &Principal, access: RouteAccess) -> bool {
    match access {
        RouteAccess::Public => true,
        RouteAccess::LoginRequired => principal.is_authenticated(),
    }
}
