//! Data models for Devwarden storage.

use serde::{Deserialize, Serialize};

/// A registered client machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub id: i64,
    pub hostname: String,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub cpu: Option<String>,
    pub mac_address: Option<String>,
    pub disk_serial: Option<String>,
    pub system_uuid: Option<String>,
    pub motherboard_serial: Option<String>,
    pub cpu_id: Option<String>,
    pub is_blocked: bool,
    /// Unix timestamp (seconds).
    pub created_at: i64,
    /// Unix timestamp (seconds).
    pub last_signin: i64,
}

/// Fields of a device row supplied at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDevice<'a> {
    pub hostname: &'a str,
    pub os: Option<&'a str>,
    pub arch: Option<&'a str>,
    pub cpu: Option<&'a str>,
    pub mac_address: Option<&'a str>,
    pub disk_serial: Option<&'a str>,
    pub system_uuid: Option<&'a str>,
    pub motherboard_serial: Option<&'a str>,
    pub cpu_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AdminSession {
    pub session_token: String,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Block-state filter for device listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Blocked,
}

/// Device counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub total: i64,
    pub active: i64,
    pub blocked: i64,
}
