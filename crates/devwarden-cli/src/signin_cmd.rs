//! `devwarden signin`: report this machine's fingerprint to the console.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use tracing::debug;

use crate::client::{ClientError, ConsoleClient, SigninOutcome};
use crate::fingerprint::{Collector, Fingerprint};

#[derive(clap::Args, Debug)]
pub struct SigninArgs {
    /// Shared device API password.
    #[arg(short, long, env = "DEVWARDEN_API_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Report this hostname instead of the detected one.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Print the collected fingerprint without contacting the console.
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(args: SigninArgs, client: &ConsoleClient) -> anyhow::Result<()> {
    let fingerprint = collect(args.hostname);
    debug!(?fingerprint, "Collected fingerprint");

    let mut out = io::stdout();
    if args.dry_run {
        write_fingerprint(&mut out, &fingerprint)?;
        return Ok(());
    }

    match client.signin(&args.password, &fingerprint).await {
        Ok(outcome) => {
            write_outcome(&mut out, &outcome)?;
            Ok(())
        }
        Err(ClientError::Unauthorized) => Err(anyhow::anyhow!("Invalid device API password")),
        Err(ClientError::Blocked) => Err(anyhow::anyhow!(
            "This device has been blocked by an administrator"
        )),
        Err(e) => Err(e.into()),
    }
}

fn collect(hostname: Option<String>) -> Fingerprint {
    let mut fingerprint = Collector::default().collect();
    if let Some(hostname) = hostname.filter(|h| !h.trim().is_empty()) {
        fingerprint.hostname = hostname;
    }
    fingerprint
}

pub fn write_outcome(w: &mut impl Write, outcome: &SigninOutcome) -> io::Result<()> {
    writeln!(w, "{}", outcome.message)?;
    if outcome.created {
        writeln!(w, "Device ID: {} (newly registered)", outcome.device_id)?;
    } else {
        writeln!(w, "Device ID: {}", outcome.device_id)?;
    }
    Ok(())
}

pub fn write_fingerprint(w: &mut impl Write, fp: &Fingerprint) -> io::Result<()> {
    let fields = [
        ("OS", &fp.os),
        ("Arch", &fp.arch),
        ("CPU", &fp.cpu),
        ("CPU ID", &fp.cpu_id),
        ("MAC", &fp.mac_address),
        ("Disk", &fp.disk_serial),
        ("UUID", &fp.system_uuid),
        ("Board", &fp.motherboard_serial),
    ];
    writeln!(w, "  Hostname: {}", fp.hostname)?;
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(w, "  {:<9} {}", format!("{label}:"), value)?;
        }
    }
    Ok(())
}
