// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and shutdown: lock-file acquisition, socket bind,
//! component wiring, graceful stop. Lock is acquired before any other
//! side effect, and the control socket is bound last.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use fs2::FileExt;
use tokio::net::UnixListener;
use tracing::{info, warn};

use sv_adapters::{CgroupV2Provider, LinuxHostInfoProvider, LinuxMetricsProvider, NullKubernetesProvider, NullMeshProvider};
use sv_aggregator::{Aggregator, ProcessSource};
use sv_bus::EventBus;
use sv_core::Clock;
use sv_rpc::RpcServer;
use sv_supervisor::{Reaper, Supervisor, SupervisorError};

use crate::config::{ConfigError, DaemonConfig, FleetConfig};

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("another daemon instance already holds the lock at {0:?}")]
    LockHeld(PathBuf),
    #[error("binding control socket {0:?}: {1}")]
    Bind(PathBuf, #[source] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// Everything the running daemon owns, handed back by [`startup`] and
/// consumed by the accept loop and by [`shutdown`].
pub struct Daemon<C: Clock + 'static> {
    pub supervisor: Arc<Supervisor<C>>,
    pub aggregator: Arc<Aggregator<C>>,
    pub rpc: Arc<RpcServer<C>>,
    pub bus: EventBus,
    pub reaper: Reaper,
    pub listener: UnixListener,
    pub socket_path: PathBuf,
    lock_file: std::fs::File,
    lock_path: PathBuf,
}

/// Opens (creating if absent) and exclusively locks the daemon's PID file,
/// writing the current PID only after the lock is confirmed — truncating
/// first would wipe a running daemon's PID out from under it.
fn acquire_lock(lock_path: &Path) -> Result<std::fs::File, LifecycleError> {
    let mut file = OpenOptions::new().write(true).create(true).truncate(false).open(lock_path)?;
    file.try_lock_exclusive().map_err(|_| LifecycleError::LockHeld(lock_path.to_path_buf()))?;
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())?;
    Ok(file)
}

/// Brings up every component in order: lock, then directories, then the
/// supervised fleet, then the control socket last — the socket is bound
/// only once startup has otherwise succeeded.
pub async fn startup<C: Clock + 'static>(
    fleet: &FleetConfig,
    clock: C,
) -> Result<Daemon<C>, LifecycleError> {
    let daemon_config: &DaemonConfig = &fleet.daemon;
    std::fs::create_dir_all(&daemon_config.state_dir)?;
    std::fs::create_dir_all(daemon_config.log_dir())?;

    let lock_path = daemon_config.lock_path();
    let lock_file = acquire_lock(&lock_path)?;
    info!(pid = std::process::id(), lock_path = %lock_path.display(), "acquired daemon lock");

    if Reaper::is_pid1() {
        info!("running as PID 1; this process is the zombie reaper of last resort");
    }

    let bus = EventBus::default();
    let supervisor = Arc::new(Supervisor::new(bus.clone(), clock.clone()));
    for spec in fleet.process_specs()? {
        supervisor.register(spec)?;
    }
    supervisor.start_all().await?;

    let process_source: Arc<dyn ProcessSource> = Arc::clone(&supervisor) as Arc<dyn ProcessSource>;
    let host_info = LinuxHostInfoProvider::new(env!("CARGO_PKG_VERSION"), clock.epoch_ms());
    let aggregator = Arc::new(Aggregator::new(
        process_source,
        Box::new(host_info),
        Box::new(LinuxMetricsProvider::new()),
        Box::new(CgroupV2Provider::new()),
        Some(Box::new(NullMeshProvider)),
        Some(Box::new(NullKubernetesProvider)),
        clock,
    ));
    aggregator.tick();

    let rpc = Arc::new(RpcServer::new(Arc::clone(&aggregator), Arc::clone(&supervisor)));

    let socket_path = daemon_config.socket_path();
    if socket_path.exists() {
        std::fs::remove_file(&socket_path)?;
    }
    let listener = UnixListener::bind(&socket_path)
        .map_err(|e| LifecycleError::Bind(socket_path.clone(), e))?;
    info!(socket = %socket_path.display(), "control socket bound");

    let reaper = Reaper::new();

    Ok(Daemon { supervisor, aggregator, rpc, bus, reaper, listener, socket_path, lock_file, lock_path })
}

/// Graceful stop: mark the RPC health surface not-serving first so new
/// clients see unhealthy before any service actually goes down, then stop
/// every service in reverse dependency order, and only once every entry has
/// settled do we stop the reaper. The caller's signal-handling task must
/// likewise stay alive until this returns, or children killed during
/// `stop_all` are never reaped and their entries never leave `Stopping`.
pub async fn shutdown<C: Clock + 'static>(daemon: &Daemon<C>, deadline: Duration) {
    daemon.rpc.mark_shutting_down();
    if let Err(e) = daemon.supervisor.stop_all(deadline).await {
        warn!(error = %e, "error while stopping services during shutdown");
    }
    daemon.reaper.stop();
    daemon.bus.close();
    if daemon.socket_path.exists() {
        let _ = std::fs::remove_file(&daemon.socket_path);
    }
    let _ = daemon.lock_file.unlock();
    if daemon.lock_path.exists() {
        let _ = std::fs::remove_file(&daemon.lock_path);
    }
    info!("daemon shut down cleanly");
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
