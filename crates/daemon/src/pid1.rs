// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal-driven background loop: `SIGCHLD` wakes the zombie reaper,
//! `SIGTERM`/`SIGINT` trigger graceful shutdown, `SIGHUP` reloads the fleet
//! config. Self-pipe pattern via `signal-hook-tokio`, the standard way to
//! observe Unix signals from async code without racing the runtime.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::stream::StreamExt;
use rand::Rng;
use signal_hook::consts::{SIGCHLD, SIGHUP, SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use sv_core::Clock;
use sv_supervisor::{Reaper, Supervisor};

use crate::config::FleetConfig;

/// Owns the signal-handling background task. Dropping this without calling
/// [`SignalDriver::stop`] leaves the task running; callers should always
/// `stop` during shutdown.
pub struct SignalDriver {
    handle: signal_hook_tokio::Handle,
    task: JoinHandle<()>,
}

impl SignalDriver {
    /// Installs the signal set and starts the reaper. `shutdown` is notified
    /// exactly once, the first time `SIGTERM` or `SIGINT` arrives. `SIGHUP`
    /// re-reads `config_path` and diffs it into the running fleet via
    /// `Supervisor::reload`; a bad config on reload is logged and otherwise
    /// ignored, leaving the fleet exactly as it was.
    pub fn spawn<C: Clock + 'static>(
        supervisor: Arc<Supervisor<C>>,
        reaper: Reaper,
        shutdown: Arc<Notify>,
        config_path: PathBuf,
    ) -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGCHLD, SIGTERM, SIGINT, SIGHUP])?;
        let handle = signals.handle();
        reaper.start();

        let task = tokio::spawn(async move {
            while let Some(signal) = signals.next().await {
                match signal {
                    SIGCHLD => {
                        for reaped in reaper.reap_once() {
                            let jitter_roll = rand::thread_rng().gen_range(-1.0..=1.0);
                            supervisor.route_exit(reaped, jitter_roll);
                        }
                    }
                    SIGTERM | SIGINT => {
                        tracing::info!(signal, "received termination signal");
                        shutdown.notify_one();
                    }
                    SIGHUP => {
                        tracing::info!("received SIGHUP, reloading fleet config");
                        match reload_from_disk(&supervisor, &config_path).await {
                            Ok(()) => tracing::info!("fleet config reloaded"),
                            Err(e) => tracing::warn!(error = %e, "fleet config reload failed"),
                        }
                    }
                    _ => {}
                }
            }
        });

        Ok(Self { handle, task })
    }

    /// Stops delivering signals to the background task and aborts it. Safe
    /// to call more than once.
    pub fn stop(&self) {
        self.handle.close();
        self.task.abort();
    }
}

#[derive(Debug, thiserror::Error)]
enum ReloadError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Supervisor(#[from] sv_supervisor::SupervisorError),
}

async fn reload_from_disk<C: Clock + 'static>(
    supervisor: &Arc<Supervisor<C>>,
    config_path: &std::path::Path,
) -> Result<(), ReloadError> {
    let fleet = FleetConfig::load(config_path)?;
    let specs = fleet.process_specs()?;
    supervisor.reload(specs).await?;
    Ok(())
}
