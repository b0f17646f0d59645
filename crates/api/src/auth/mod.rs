//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing, verification and signup rules.
//! - [`session`] -- session tokens, their stored hashes, and the cookie.

pub mod password;
pub mod session;
