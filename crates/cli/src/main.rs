// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `sv`: thin operator client for the process supervisor daemon. Every
//! subcommand connects to the daemon's Unix socket and round-trips through
//! `sv-rpc`'s client helpers; nothing here touches the supervised processes
//! directly.

mod client;
mod color;
mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::client::DaemonClient;
use crate::output::OutputFormat;

fn default_socket_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("/var/lib"))
        .join("sv")
        .join("sv.sock")
}

#[derive(Debug, Parser)]
#[command(name = "sv", about = "Process supervisor CLI", styles = color::styles())]
struct Cli {
    /// Path to the daemon's control socket.
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every supervised service.
    Ps,
    /// Show detail for one service.
    Show { service_name: String },
    /// Stream daemon state until interrupted.
    Events {
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
    /// Request a graceful stop.
    Stop {
        service_name: String,
        #[arg(long, default_value_t = 10_000)]
        deadline_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let socket_path = cli.socket.unwrap_or_else(default_socket_path);
    let mut client = DaemonClient::connect(&socket_path).await?;

    match cli.command {
        Command::Ps => commands::ps::run(&mut client, cli.format).await,
        Command::Show { service_name } => commands::show::run(&mut client, service_name, cli.format).await,
        Command::Events { interval_ms } => commands::events::run(&mut client, interval_ms, cli.format).await,
        Command::Stop { service_name, deadline_ms } => {
            commands::stop::run(&mut client, service_name, deadline_ms).await
        }
    }
}
