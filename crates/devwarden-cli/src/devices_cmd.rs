//! Device subcommands: list, block, unblock, stats.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use devwarden_core::unix_timestamp;

use crate::admin_cmd::{format_duration, require_token};
use crate::client::{ClientError, ConsoleClient, DeviceCounts, DeviceRecord};
use crate::config::CliConfig;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusArg {
    #[default]
    All,
    Active,
    Blocked,
}

impl StatusArg {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Blocked => "blocked",
        }
    }
}

/// Device subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum DevicesAction {
    /// List registered devices, newest first.
    List {
        /// Case-insensitive match on hostname, OS or MAC address.
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
    },
    /// Block a device from signing in.
    Block {
        /// Device ID.
        id: i64,
    },
    /// Allow a blocked device to sign in again.
    Unblock {
        /// Device ID.
        id: i64,
    },
    /// Show total, active and blocked counts.
    Stats,
}

/// Execute a devices subcommand.
pub async fn run(
    action: DevicesAction,
    client: &ConsoleClient,
    config: &CliConfig,
) -> anyhow::Result<()> {
    let token = require_token(config)?;
    let mut out = io::stdout();
    match action {
        DevicesAction::List { search, status } => {
            let devices = client
                .list_devices(token, search.as_deref(), status.as_str())
                .await
                .map_err(session_error)?;
            write_device_table(&mut out, &devices, unix_timestamp())?;
        }
        DevicesAction::Block { id } => set_blocked(client, token, id, true, &mut out).await?,
        DevicesAction::Unblock { id } => set_blocked(client, token, id, false, &mut out).await?,
        DevicesAction::Stats => {
            let counts = client.stats(token).await.map_err(session_error)?;
            write_stats(&mut out, &counts)?;
        }
    }
    Ok(())
}

async fn set_blocked(
    client: &ConsoleClient,
    token: &str,
    id: i64,
    block: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    client
        .set_blocked(token, id, block)
        .await
        .map_err(session_error)?;
    let verb = if block { "blocked" } else { "unblocked" };
    writeln!(out, "Device {id} {verb}")?;
    Ok(())
}

fn session_error(e: ClientError) -> anyhow::Error {
    match e {
        ClientError::Unauthorized => {
            anyhow::anyhow!("Session rejected by the console. Run: devwarden admin login")
        }
        e => e.into(),
    }
}

pub fn write_device_table(
    w: &mut impl Write,
    devices: &[DeviceRecord],
    now: i64,
) -> io::Result<()> {
    if devices.is_empty() {
        return writeln!(w, "No devices found");
    }
    writeln!(
        w,
        "{:<6} {:<24} {:<10} {:<18} {:<8} {}",
        "ID", "HOSTNAME", "OS", "MAC", "STATUS", "LAST SIGNIN"
    )?;
    for d in devices {
        let status = if d.is_blocked { "blocked" } else { "active" };
        writeln!(
            w,
            "{:<6} {:<24} {:<10} {:<18} {:<8} {} ago",
            d.id,
            d.hostname,
            d.os.as_deref().unwrap_or("-"),
            d.mac_address.as_deref().unwrap_or("-"),
            status,
            format_duration(now - d.last_signin)
        )?;
    }
    Ok(())
}

pub fn write_stats(w: &mut impl Write, counts: &DeviceCounts) -> io::Result<()> {
    writeln!(w, "Total:   {}", counts.total)?;
    writeln!(w, "Active:  {}", counts.active)?;
    writeln!(w, "Blocked: {}", counts.blocked)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn device(id: i64, hostname: &str, blocked: bool) -> DeviceRecord {
        DeviceRecord {
            id,
            hostname: hostname.into(),
            os: Some("linux".into()),
            arch: None,
            mac_address: None,
            system_uuid: None,
            is_blocked: blocked,
            created_at: 1_000,
            last_signin: 1_000,
        }
    }

    #[test]
    fn table_lists_each_device() {
        let mut buf = Vec::new();
        write_device_table(
            &mut buf,
            &[device(2, "beta", true), device(1, "alpha", false)],
            1_000 + 90,
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].starts_with("2 "));
        assert!(lines[1].contains("beta"));
        assert!(lines[1].contains("blocked"));
        assert!(lines[2].contains("active"));
        assert!(lines[2].ends_with("1m ago"));
        assert!(lines[2].contains(" - "));
    }

    #[test]
    fn empty_table() {
        let mut buf = Vec::new();
        write_device_table(&mut buf, &[], 0).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No devices found\n");
    }

    #[test]
    fn stats_output() {
        let mut buf = Vec::new();
        write_stats(
            &mut buf,
            &DeviceCounts {
                total: 3,
                active: 2,
                blocked: 1,
            },
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Total:   3\nActive:  2\nBlocked: 1\n"
        );
    }

    #[test]
    fn status_arg_strings_match_api() {
        assert_eq!(StatusArg::default().as_str(), "all");
        assert_eq!(StatusArg::Active.as_str(), "active");
        assert_eq!(StatusArg::Blocked.as_str(), "blocked");
    }
}
