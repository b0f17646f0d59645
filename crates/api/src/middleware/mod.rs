//! Request identity and the login guard.
//!
//! - [`identity::CurrentPrincipal`] -- the requesting principal, possibly anonymous.
//! - [`login_required::require_login`] -- redirects anonymous visitors to the login page.
//! - [`login_required::AuthUser`] -- the authenticated user on guarded routes.

pub mod identity;
pub mod login_required;
