//! Devwarden Server Library
//!
//! Core functionality for the device registration console:
//! - SQLite storage for devices and admin sessions
//! - Shared-secret credentials and admin bearer sessions
//! - Device identity resolution and block state
//! - axum HTTP routes and the admin dashboard

pub mod auth;
pub mod config;
pub mod error;
pub mod registry;
pub mod routes;
pub mod storage;

pub use config::ServerConfig;
pub use error::{ConsoleError, Result};
