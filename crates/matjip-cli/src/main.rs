//! matjip - a terminal client for the matjip restaurant review community.
//!
//! Usage:
//!   matjip login [email] [--remember]
//!   matjip logout
//!   matjip whoami
//!   matjip posts [--category <name> | --search <keyword> | --mine]
//!   matjip post <id>
//!   matjip like <post-id>
//!   matjip comment <post-id> <text>

mod commands;
mod format;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use matjip_core::{ClientConfig, FileSessionStore, RequestClient, RequestError};

use commands::Command;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, commands::USAGE);
            std::process::exit(2);
        }
    };

    let config = ClientConfig::load()?;
    let store = Arc::new(FileSessionStore::open(ClientConfig::session_dir()?));
    let client = RequestClient::new(&config, store)?.on_session_expired(|| {
        eprintln!("Your session has expired. Run `matjip login` to sign in again.");
    });
    info!(base_url = %config.base_url, "matjip starting");

    match commands::run(&client, command).await {
        Ok(()) => Ok(()),
        // The hook already told the user what to do
        Err(e) if e.downcast_ref::<RequestError>().is_some_and(RequestError::is_auth_expired) => {
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
