//! Hardware/OS fingerprint collection.
//!
//! Everything beyond hostname, OS and architecture is best-effort and read
//! from procfs/sysfs; on other platforms those fields stay `None`.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Identity bundle posted at signin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motherboard_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_id: Option<String>,
}

/// DMI values firmware vendors ship instead of real identifiers.
const PLACEHOLDER_IDS: &[&str] = &[
    "none",
    "default string",
    "to be filled by o.e.m.",
    "not specified",
    "not applicable",
    "system serial number",
    "03000200-0400-0500-0006-000700080009",
    "00000000-0000-0000-0000-000000000000",
];

/// Reads fingerprint sources below a filesystem root (`/` in production).
#[derive(Debug, Clone)]
pub struct Collector {
    root: PathBuf,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Collector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Collect a fingerprint for the current machine.
    pub fn collect(&self) -> Fingerprint {
        let hostname = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .or_else(|| self.read_trimmed("etc/hostname"))
            .unwrap_or_else(|| "unknown".into());

        Fingerprint {
            hostname,
            os: Some(std::env::consts::OS.to_string()),
            arch: Some(std::env::consts::ARCH.to_string()),
            cpu: self.cpu_model(),
            mac_address: self.primary_mac(),
            disk_serial: self.disk_serial(),
            system_uuid: self
                .read_id("sys/class/dmi/id/product_uuid")
                .or_else(|| self.read_id("etc/machine-id")),
            motherboard_serial: self.read_id("sys/class/dmi/id/board_serial"),
            cpu_id: self.cpu_id(),
        }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn read_trimmed(&self, rel: &str) -> Option<String> {
        read_trimmed(&self.path(rel))
    }

    /// Read an identifier, discarding firmware placeholders.
    fn read_id(&self, rel: &str) -> Option<String> {
        self.read_trimmed(rel)
            .filter(|v| !PLACEHOLDER_IDS.contains(&v.to_ascii_lowercase().as_str()))
    }

    fn cpuinfo_field(&self, key: &str) -> Option<String> {
        let cpuinfo = std::fs::read_to_string(self.path("proc/cpuinfo")).ok()?;
        cpuinfo.lines().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            (k.trim() == key)
                .then(|| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
    }

    fn cpu_model(&self) -> Option<String> {
        self.cpuinfo_field("model name")
            .or_else(|| self.cpuinfo_field("Hardware"))
    }

    /// x86 family/model/stepping, or the ARM implementer/part pair.
    fn cpu_id(&self) -> Option<String> {
        let family = self.cpuinfo_field("cpu family");
        let model = self.cpuinfo_field("model");
        let stepping = self.cpuinfo_field("stepping");
        if let (Some(f), Some(m), Some(s)) = (family, model, stepping) {
            return Some(format!("{f}-{m}-{s}"));
        }
        match (
            self.cpuinfo_field("CPU implementer"),
            self.cpuinfo_field("CPU part"),
        ) {
            (Some(i), Some(p)) => Some(format!("{i}-{p}")),
            _ => None,
        }
    }

    /// MAC of the first physical interface in name order.
    fn primary_mac(&self) -> Option<String> {
        let net = self.path("sys/class/net");
        let mut names: Vec<String> = std::fs::read_dir(&net)
            .ok()?
            .filter_map(|e| e.ok()?.file_name().into_string().ok())
            .filter(|name| name != "lo" && self.path(&format!("sys/class/net/{name}/device")).exists())
            .collect();
        names.sort();
        names.into_iter().find_map(|name| {
            read_trimmed(&net.join(&name).join("address"))
                .filter(|mac| mac != "00:00:00:00:00:00")
        })
    }

    /// Serial of the first non-virtual block device in name order.
    fn disk_serial(&self) -> Option<String> {
        let block = self.path("sys/block");
        let mut names: Vec<String> = std::fs::read_dir(&block)
            .ok()?
            .filter_map(|e| e.ok()?.file_name().into_string().ok())
            .filter(|name| !is_virtual_block(name))
            .collect();
        names.sort();
        names.into_iter().find_map(|name| {
            let dev = block.join(&name).join("device");
            read_trimmed(&dev.join("serial")).or_else(|| read_trimmed(&dev.join("wwid")))
        })
    }
}

fn is_virtual_block(name: &str) -> bool {
    ["loop", "ram", "zram", "dm-", "md", "sr", "nbd"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

fn read_trimmed(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
