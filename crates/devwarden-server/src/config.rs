//! Server configuration, parsed once at startup from flags and environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::auth::Credentials;

#[derive(Parser, Debug, Clone)]
#[command(name = "devwarden-server")]
#[command(version, about = "Devwarden device registration and management console")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "DEVWARDEN_ADDR", default_value = "0.0.0.0:8080")]
    pub addr: SocketAddr,

    /// Path to SQLite database file.
    #[arg(long, env = "DEVWARDEN_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Password administrators use to open the dashboard.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: String,

    /// Shared password devices present at signin.
    #[arg(long, env = "API_PASSWORD", hide_env_values = true)]
    pub api_password: String,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    EmptySecret(&'static str),

    #[error("Cannot determine home directory")]
    NoHomeDir,
}

impl ServerConfig {
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if self.admin_password.is_empty() {
            return Err(ConfigError::EmptySecret("ADMIN_PASSWORD"));
        }
        if self.api_password.is_empty() {
            return Err(ConfigError::EmptySecret("API_PASSWORD"));
        }
        Ok(Credentials::new(
            self.admin_password.clone(),
            self.api_password.clone(),
        ))
    }

    /// Configured database path, or `~/.devwarden/devwarden.db`.
    pub fn resolved_db_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".devwarden").join("devwarden.db"))
                .ok_or(ConfigError::NoHomeDir),
        }
    }
}
