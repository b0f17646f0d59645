//! Domain layer for yanote: shared types, error taxonomy, and the pure
//! policies (slug derivation, note access) that the storage and HTTP layers
//! build on.

pub mod access;
pub mod error;
pub mod notes;
pub mod slug;
pub mod types;
pub mod users;
