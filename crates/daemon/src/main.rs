// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `svd`: the process supervisor daemon binary. Loads a fleet config,
//! starts every enabled service, and serves the RPC surface over a Unix
//! domain socket until told to stop.

mod config;
mod lifecycle;
mod pid1;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

use sv_core::SystemClock;

use crate::config::FleetConfig;
use crate::pid1::SignalDriver;

const DEFAULT_STOP_DEADLINE: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(name = "svd", about = "Process supervisor daemon")]
struct Args {
    /// Path to the fleet's TOML config file.
    #[arg(long, default_value = "/etc/sv/fleet.toml")]
    config: PathBuf,
}

fn init_tracing(log_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "svd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(non_blocking)
        .init();
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let fleet = match FleetConfig::load(&args.config) {
        Ok(fleet) => fleet,
        Err(e) => {
            eprintln!("failed to load config {:?}: {e}", args.config);
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = init_tracing(&fleet.daemon.log_dir());

    let daemon = match lifecycle::startup(&fleet, SystemClock).await {
        Ok(daemon) => Arc::new(daemon),
        Err(e) => {
            tracing::error!(error = %e, "daemon startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(Notify::new());
    let signals = match SignalDriver::spawn(
        Arc::clone(&daemon.supervisor),
        daemon.reaper.clone(),
        Arc::clone(&shutdown),
        args.config.clone(),
    ) {
        Ok(signals) => signals,
        Err(e) => {
            tracing::error!(error = %e, "failed to install signal handlers");
            return ExitCode::FAILURE;
        }
    };

    let aggregator = Arc::clone(&daemon.aggregator);
    let interval = Duration::from_millis(fleet.daemon.aggregator_interval_ms.max(100));
    let aggregator_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            aggregator.tick();
        }
    });

    let accept_daemon = Arc::clone(&daemon);
    let accept_shutdown = Arc::clone(&shutdown);
    let accept_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                accepted = accept_daemon.listener.accept() => {
                    let Ok((stream, _addr)) = accepted else { continue };
                    let rpc = Arc::clone(&accept_daemon.rpc);
                    tokio::spawn(async move {
                        if let Err(e) = rpc.run_connection(stream).await {
                            tracing::debug!(error = %e, "connection ended");
                        }
                    });
                }
                _ = accept_shutdown.notified() => break,
            }
        }
    });

    shutdown.notified().await;
    aggregator_task.abort();
    accept_task.abort();
    lifecycle::shutdown(&daemon, DEFAULT_STOP_DEADLINE).await;
    signals.stop();

    ExitCode::SUCCESS
}
