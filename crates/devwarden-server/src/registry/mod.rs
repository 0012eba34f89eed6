//! Device registry: identity resolution, listing, and block state.
//!
//! A signin is matched to an existing device by system UUID first and MAC
//! address second. Unmatched identities are registered as new devices.

mod identity;

pub use identity::DeviceIdentity;

use tracing::{info, instrument, warn};

use devwarden_core::unix_timestamp;

use crate::error::{ConsoleError, Result};
use crate::storage::{Device, DeviceDatabase, DeviceStats, NewDevice, StatusFilter};

/// Outcome of a successful signin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub device: Device,
    /// `true` when this signin registered the device.
    pub created: bool,
}

#[derive(Clone)]
pub struct DeviceRegistry {
    db: DeviceDatabase,
}

impl DeviceRegistry {
    pub const fn new(db: DeviceDatabase) -> Self {
        Self { db }
    }

    pub async fn resolve_or_create(&self, identity: &DeviceIdentity) -> Result<Resolution> {
        self.resolve_or_create_at(identity, unix_timestamp()).await
    }

    /// Resolve a signin against the registry at time `now`.
    ///
    /// Fails with `InvalidRequest` before any lookup when the hostname is
    /// missing, and with `Forbidden` (leaving `last_signin` untouched) when
    /// the matched device is blocked.
    #[instrument(skip(self, identity), fields(hostname = ?identity.hostname))]
    pub async fn resolve_or_create_at(
        &self,
        identity: &DeviceIdentity,
        now: i64,
    ) -> Result<Resolution> {
        let fields = identity
            .as_new_device()
            .ok_or_else(|| ConsoleError::InvalidRequest("Hostname is required".into()))?;

        if let Some(existing) = self.lookup(&fields).await? {
            return self.accept_existing(existing, now).await;
        }

        match self.db.insert_device(&fields, now).await? {
            Some(device) => {
                info!(device_id = device.id, hostname = %device.hostname, "New device registered");
                Ok(Resolution {
                    device,
                    created: true,
                })
            }
            None => {
                // A concurrent signin registered the same identity first.
                let existing = self.lookup(&fields).await?.ok_or_else(|| {
                    ConsoleError::Internal(devwarden_core::DatabaseError::Query(
                        "device insert conflicted but no matching row was found".into(),
                    ))
                })?;
                self.accept_existing(existing, now).await
            }
        }
    }

    /// System UUID strictly dominates MAC address.
    async fn lookup(&self, fields: &NewDevice<'_>) -> Result<Option<Device>> {
        if let Some(uuid) = fields.system_uuid {
            if let Some(device) = self.db.find_device_by_system_uuid(uuid).await? {
                return Ok(Some(device));
            }
        }
        if let Some(mac) = fields.mac_address {
            return Ok(self.db.find_device_by_mac(mac).await?);
        }
        Ok(None)
    }

    async fn accept_existing(&self, mut device: Device, now: i64) -> Result<Resolution> {
        if device.is_blocked {
            warn!(device_id = device.id, "Signin rejected for blocked device");
            return Err(ConsoleError::Forbidden(device.id));
        }
        self.db.touch_device_signin(device.id, now).await?;
        device.last_signin = now;
        info!(device_id = device.id, "Device signed in");
        Ok(Resolution {
            device,
            created: false,
        })
    }

    /// All devices, most recently registered first.
    pub async fn list(&self) -> Result<Vec<Device>> {
        self.search(None, StatusFilter::All).await
    }

    pub async fn search(&self, search: Option<&str>, status: StatusFilter) -> Result<Vec<Device>> {
        Ok(self.db.list_devices(search, status).await?)
    }

    pub async fn stats(&self) -> Result<DeviceStats> {
        Ok(self.db.device_stats().await?)
    }

    /// Set the block flag. Repeating the same value succeeds.
    pub async fn set_blocked(&self, device_id: i64, blocked: bool) -> Result<()> {
        if !self.db.set_device_blocked(device_id, blocked).await? {
            return Err(ConsoleError::NotFound(device_id));
        }
        info!(device_id, blocked, "Device block state changed");
        Ok(())
    }
}
