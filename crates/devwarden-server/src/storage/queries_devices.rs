//! Device table queries.

use devwarden_core::DatabaseError;

use super::DeviceDatabase;
use super::models::{Device, DeviceStats, NewDevice, StatusFilter};

impl DeviceDatabase {
    /// Get a device by ID.
    pub async fn get_device(&self, id: i64) -> Result<Option<Device>, DatabaseError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(device)
    }

    pub async fn find_device_by_system_uuid(
        &self,
        system_uuid: &str,
    ) -> Result<Option<Device>, DatabaseError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE system_uuid = ?")
            .bind(system_uuid)
            .fetch_optional(self.pool())
            .await?;
        Ok(device)
    }

    pub async fn find_device_by_mac(
        &self,
        mac_address: &str,
    ) -> Result<Option<Device>, DatabaseError> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE mac_address = ?")
            .bind(mac_address)
            .fetch_optional(self.pool())
            .await?;
        Ok(device)
    }

    /// Insert a device unless its system UUID or MAC address is already taken.
    ///
    /// Returns `None` when a uniqueness constraint swallowed the insert.
    pub async fn insert_device(
        &self,
        device: &NewDevice<'_>,
        now: i64,
    ) -> Result<Option<Device>, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO devices (hostname, os, arch, cpu, mac_address, disk_serial, system_uuid, \
             motherboard_serial, cpu_id, is_blocked, created_at, last_signin) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(device.hostname)
        .bind(device.os)
        .bind(device.arch)
        .bind(device.cpu)
        .bind(device.mac_address)
        .bind(device.disk_serial)
        .bind(device.system_uuid)
        .bind(device.motherboard_serial)
        .bind(device.cpu_id)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_device(result.last_insert_rowid()).await
    }

    /// Record a successful signin.
    pub async fn touch_device_signin(&self, id: i64, now: i64) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE devices SET last_signin = ? WHERE id = ?")
            .bind(now)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Set the block flag. Returns `false` if no device has this ID.
    pub async fn set_device_blocked(&self, id: i64, blocked: bool) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE devices SET is_blocked = ? WHERE id = ?")
            .bind(blocked)
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List devices, newest registration first.
    ///
    /// `search` is a case-insensitive substring matched against hostname,
    /// OS name and MAC address. Matching folds with Unicode lowercasing on
    /// both sides, since `SQLite`'s `lower()` only folds ASCII.
    pub async fn list_devices(
        &self,
        search: Option<&str>,
        status: StatusFilter,
    ) -> Result<Vec<Device>, DatabaseError> {
        let blocked = match status {
            StatusFilter::All => None,
            StatusFilter::Active => Some(false),
            StatusFilter::Blocked => Some(true),
        };

        let devices = sqlx::query_as::<_, Device>(
            "SELECT * FROM devices \
             WHERE (?1 IS NULL OR is_blocked = ?1) \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(blocked)
        .fetch_all(self.pool())
        .await?;

        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Ok(match needle {
            Some(needle) => devices
                .into_iter()
                .filter(|d| matches_search(d, &needle))
                .collect(),
            None => devices,
        })
    }

    pub async fn device_stats(&self) -> Result<DeviceStats, DatabaseError> {
        let (total, blocked): (i64, Option<i64>) =
            sqlx::query_as("SELECT COUNT(*), SUM(is_blocked) FROM devices")
                .fetch_one(self.pool())
                .await?;
        let blocked = blocked.unwrap_or(0);
        Ok(DeviceStats {
            total,
            active: total - blocked,
            blocked,
        })
    }
}

/// `needle` must already be lowercased.
fn matches_search(device: &Device, needle: &str) -> bool {
    [
        Some(device.hostname.as_str()),
        device.os.as_deref(),
        device.mac_address.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
