//! SQLite storage for the Devwarden server.
//!
//! Persists registered devices and admin sessions.

mod models;
mod queries_devices;
mod queries_sessions;

#[cfg(test)]
mod tests;

pub use models::*;

devwarden_core::define_database!(DeviceDatabase, "Device database migrations complete");
