// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! PTT MCP Host
//!
//! Model Context Protocol server that lets AI assistants operate one PTT
//! account: log in, read and write posts, send mail, look up users and boards.
//! The board session itself lives in a bridge process spoken to over stdio.
//!
//! # Usage
//!
//! ```bash
//! PTT_ID=CodingMan PTT_PW=secret ptt-mcp-host --client-command pyptt-bridge
//! ```
//!
//! Credentials may also come from a `.env` file in the working directory.

mod classify;
mod envelope;
mod gateway;
mod mcp_server;
mod mcp_types;
mod prompts;
mod session;
#[cfg(test)]
mod testing;
mod tools;

use clap::Parser;
use clap_derive::Parser;
use eyre::{Result, eyre};
use figment::{
    Figment,
    providers::{Format, Serialized, Yaml},
};
use mcp_server::McpServer;
use ptt_client::{BridgeConfig, BridgeFactory};
use serde_derive::{Deserialize, Serialize};
use session::{Credentials, SessionContext};
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info};

/// PTT MCP Host - AI assistant interface for the PTT bulletin board
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(name = "ptt-mcp-host")]
#[command(about = "Model Context Protocol server for the PTT bulletin board")]
#[command(version)]
struct Args {
    /// PTT account ID
    #[arg(long, env = "PTT_ID")]
    ptt_id: Option<String>,

    /// PTT account password
    #[arg(long, env = "PTT_PW", hide_env_values = true)]
    ptt_pw: Option<String>,

    /// Bridge program that holds the board session
    #[arg(long, default_value = "pyptt-bridge")]
    client_command: String,

    /// Extra argument for the bridge program (repeatable)
    #[arg(long = "client-arg", allow_hyphen_values = true)]
    client_args: Vec<String>,

    /// Enable debug logging (logs go to stderr to avoid interfering with MCP)
    #[arg(long, default_value = "false")]
    debug: bool,

    /// YAML config file to use (overrides CLI args)
    #[arg(long)]
    config_file: Option<String>,
}

impl Args {
    fn credentials(&self) -> Result<Credentials> {
        let present = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        let ptt_id = present(&self.ptt_id).ok_or_else(|| eyre!("PTT_ID is not set"))?;
        let password = present(&self.ptt_pw).ok_or_else(|| eyre!("PTT_PW is not set"))?;
        Ok(Credentials { ptt_id, password })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Values from .env win over the inherited environment
    let dotenv = dotenvy::dotenv_override();

    // Parse arguments
    let cli_args = Args::parse();
    let config_file = cli_args.config_file.clone();
    let mut args_figment = Figment::new().merge(Serialized::defaults(cli_args));
    if let Some(config_file) = config_file {
        args_figment = args_figment.merge(Yaml::file(config_file));
    }
    let args: Args = args_figment.extract()?;

    // Setup logging to stderr (so it doesn't interfere with MCP on stdout)
    setup_logging(args.debug)?;

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(eyre!("Unable to load .env: {}", e)),
    }

    let credentials = args.credentials()?;

    info!("PTT MCP Host starting...");
    info!("Account: {}", credentials.ptt_id);
    info!("Bridge command: {} {:?}", args.client_command, args.client_args);

    let factory = BridgeFactory::new(BridgeConfig {
        command: args.client_command.clone(),
        args: args.client_args.clone(),
    });
    let mut server = McpServer::new(SessionContext::new(factory, credentials));

    let mut term_signal = signal(SignalKind::terminate())?;
    let mut stop_signal = signal(SignalKind::interrupt())?;

    // Run the MCP server
    info!("MCP server ready, listening on stdio");
    let outcome = tokio::select! {
        result = server.run_stdio() => result,
        _ = term_signal.recv() => {
            info!("SIGTERM received");
            Ok(())
        }
        _ = stop_signal.recv() => {
            info!("SIGINT received");
            Ok(())
        }
    };
    if let Err(e) = &outcome {
        error!("MCP server failed: {}", e);
    }

    server.shutdown().await;
    info!("MCP server shutting down");
    outcome
}

/// Setup logging to stderr
fn setup_logging(debug: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .map_err(|e| eyre!("Unable to configure logging: {}", e))?;

    Ok(())
}
