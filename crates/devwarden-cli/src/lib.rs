//! Devwarden CLI library.
//!
//! Collects device fingerprints, signs devices in, and drives the admin API.

pub mod admin_cmd;
pub mod client;
pub mod config;
pub mod devices_cmd;
pub mod fingerprint;
pub mod signin_cmd;
