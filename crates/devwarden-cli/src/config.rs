//! CLI configuration management.
//!
//! Persists the console URL and the admin token to `~/.devwarden/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persistent CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Console base URL (e.g., "<https://devices.example.com>").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
    /// Admin session from the last `admin login`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminAuth>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminAuth {
    pub token: String,
    /// Unix timestamp (seconds).
    pub expires_at: i64,
}

impl CliConfig {
    /// Path to the config directory: `~/.devwarden/`.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".devwarden"))
    }

    /// Path to the config file: `~/.devwarden/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.json"))
    }

    /// Load config from disk. Returns default if file doesn't exist or is invalid.
    pub fn load() -> Self {
        Self::config_path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path =
            Self::config_path().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        // The admin token is a bearer credential.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Forget the admin session. The server keeps it until it expires.
    pub fn clear_admin(&mut self) {
        self.admin = None;
    }

    /// Token of a session that has not yet expired at `now`.
    pub fn live_token(&self, now: i64) -> Option<&str> {
        self.admin
            .as_ref()
            .filter(|a| a.expires_at > now)
            .map(|a| a.token.as_str())
    }
}
