//! Authentication for the Devwarden console.
//!
//! Provides the shared-secret credential store, admin bearer sessions, and
//! the gateway that composes them for request handlers.

pub mod credentials;
pub mod gateway;
pub mod session;

pub use credentials::Credentials;
pub use gateway::AccessGateway;
pub use session::{IssuedSession, SESSION_TTL_SECS, SessionManager};
