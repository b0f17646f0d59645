//! HTTP request handlers.
//!
//! Each submodule handles one area of the site; route wiring lives in
//! [`crate::routes`].

pub mod notes;
pub mod pages;
pub mod users;
