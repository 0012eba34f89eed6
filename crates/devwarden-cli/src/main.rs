//! Devwarden CLI
//!
//! Signs this machine in to a Devwarden console and administers devices.

use clap::{Parser, Subcommand};
use tracing::debug;

use devwarden_cli::admin_cmd::{self, AdminAction};
use devwarden_cli::client::ConsoleClient;
use devwarden_cli::config::CliConfig;
use devwarden_cli::devices_cmd::{self, DevicesAction};
use devwarden_cli::signin_cmd::{self, SigninArgs};
use devwarden_core::tracing_init::{LogTarget, init_tracing};

const DEFAULT_SERVER: &str = "http://localhost:8080";

#[derive(Parser, Debug)]
#[command(name = "devwarden")]
#[command(version, about = "Device registration and console administration", long_about = None)]
struct Cli {
    /// Console URL (saved to the config file when given).
    #[arg(long, global = true, env = "DEVWARDEN_SERVER")]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report this machine's fingerprint and sign in.
    Signin(SigninArgs),
    /// Administrator session management.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// List and manage registered devices.
    Devices {
        #[command(subcommand)]
        action: DevicesAction,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("devwarden=warn,devwarden_cli=warn", false, LogTarget::Stderr);

    let mut config = CliConfig::load();
    if let Some(server) = cli.server {
        if config.server_url.as_deref() != Some(server.as_str()) {
            config.server_url = Some(server);
            config.save()?;
        }
    }
    let server_url = config
        .server_url
        .clone()
        .unwrap_or_else(|| DEFAULT_SERVER.into());
    debug!(%server_url, "Using console");

    let client = ConsoleClient::new(&server_url)?;
    match cli.command {
        Command::Signin(args) => signin_cmd::run(args, &client).await,
        Command::Admin { action } => admin_cmd::run(action, &client, &mut config).await,
        Command::Devices { action } => devices_cmd::run(action, &client, &config).await,
    }
}
