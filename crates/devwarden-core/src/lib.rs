//! Devwarden Core Library
//!
//! Shared functionality for Devwarden components:
//! - `SQLite` pool helpers and the `define_database!` macro
//! - Tracing subscriber initialization

pub mod db;
pub mod tracing_init;

pub use db::{DatabaseError, unix_timestamp};
