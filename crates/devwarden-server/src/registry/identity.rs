//! Fingerprint bundle reported by a device at signin.

use serde::{Deserialize, Serialize};

use crate::storage::NewDevice;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub disk_serial: Option<String>,
    #[serde(default)]
    pub system_uuid: Option<String>,
    #[serde(default)]
    pub motherboard_serial: Option<String>,
    #[serde(default)]
    pub cpu_id: Option<String>,
}

impl DeviceIdentity {
    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Default::default()
        }
    }

    /// Row fields for this identity, or `None` when the hostname is missing.
    ///
    /// Blank strings count as absent so optional columns stay NULL.
    pub fn as_new_device(&self) -> Option<NewDevice<'_>> {
        Some(NewDevice {
            hostname: present(self.hostname.as_ref())?,
            os: present(self.os.as_ref()),
            arch: present(self.arch.as_ref()),
            cpu: present(self.cpu.as_ref()),
            mac_address: present(self.mac_address.as_ref()),
            disk_serial: present(self.disk_serial.as_ref()),
            system_uuid: present(self.system_uuid.as_ref()),
            motherboard_serial: present(self.motherboard_serial.as_ref()),
            cpu_id: present(self.cpu_id.as_ref()),
        })
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}
