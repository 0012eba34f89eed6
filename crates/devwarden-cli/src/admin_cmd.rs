//! Admin subcommands: login, logout, status.
//!
//! User-facing output uses writeln! to stdout (this is a CLI binary, not debug output).

use std::io::{self, Write};

use devwarden_core::unix_timestamp;

use crate::client::{ClientError, ConsoleClient};
use crate::config::{AdminAuth, CliConfig};

/// Admin subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum AdminAction {
    /// Log in to the console and store the session token.
    Login {
        /// Admin password.
        #[arg(short, long, env = "DEVWARDEN_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the stored session.
    Status,
}

/// Execute an admin subcommand.
pub async fn run(
    action: AdminAction,
    client: &ConsoleClient,
    config: &mut CliConfig,
) -> anyhow::Result<()> {
    match action {
        AdminAction::Login { password } => login(client, config, &password).await,
        AdminAction::Logout => logout(config),
        AdminAction::Status => {
            write_status(&mut io::stdout(), config, unix_timestamp())?;
            Ok(())
        }
    }
}

/// Token of the stored session, or an error telling the user to log in.
pub fn require_token(config: &CliConfig) -> anyhow::Result<&str> {
    config
        .live_token(unix_timestamp())
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run: devwarden admin login"))
}

async fn login(client: &ConsoleClient, config: &mut CliConfig, password: &str) -> anyhow::Result<()> {
    let session = client.login(password).await.map_err(|e| match e {
        ClientError::Unauthorized => anyhow::anyhow!("Login failed: invalid admin password"),
        e => e.into(),
    })?;

    config.admin = Some(AdminAuth {
        token: session.token,
        expires_at: session.expires_at,
    });
    config.save()?;

    let mut out = io::stdout();
    writeln!(
        out,
        "Logged in (session expires in {})",
        format_duration(session.expires_at - unix_timestamp())
    )?;
    Ok(())
}

fn logout(config: &mut CliConfig) -> anyhow::Result<()> {
    config.clear_admin();
    config.save()?;
    let mut out = io::stdout();
    writeln!(out, "Logged out")?;
    Ok(())
}

pub fn write_status(w: &mut impl Write, config: &CliConfig, now: i64) -> io::Result<()> {
    if let Some(url) = &config.server_url {
        writeln!(w, "Console: {url}")?;
    }
    match &config.admin {
        Some(auth) if auth.expires_at > now => writeln!(
            w,
            "Logged in (session expires in {})",
            format_duration(auth.expires_at - now)
        ),
        Some(_) => writeln!(w, "Session expired. Run: devwarden admin login"),
        None => writeln!(w, "Not logged in"),
    }
}

/// Render a number of seconds as `2h 05m`, `4m`, or `30s`.
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let (hours, mins) = (secs / 3600, (secs % 3600) / 60);
    if hours > 0 {
        format!("{hours}h {mins:02}m")
    } else if mins > 0 {
        format!("{mins}m")
    } else {
        format!("{secs}s")
    }
}
