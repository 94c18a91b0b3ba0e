// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service-fleet configuration: a `toml` file listing the services to
//! supervise, parsed once at startup. Config loading lives in the binary,
//! not in `sv-core`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use nix::sys::signal::Signal;
use serde::Deserialize;
use sv_core::{BackoffPolicy, RestartBudget, RestartPolicy, ServiceName, ServiceNameError};
use sv_supervisor::{ProcessSpec, StopStep};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {0:?}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("parsing config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("service {0:?}: {1}")]
    InvalidName(String, #[source] ServiceNameError),
    #[error("service {service:?}: unknown signal {signal:?}")]
    InvalidSignal { service: String, signal: String },
}

fn default_true() -> bool {
    true
}

fn default_backoff_base_ms() -> u64 {
    500
}

fn default_backoff_cap_ms() -> u64 {
    30_000
}

fn default_restart_budget_max() -> u32 {
    5
}

fn default_restart_budget_window_secs() -> u64 {
    60
}

fn default_start_deadline_secs() -> u64 {
    10
}

fn default_stop_signal() -> String {
    "SIGTERM".to_string()
}

fn default_stop_grace_secs() -> u64 {
    10
}

/// One `[[service]]` table. Field names mirror `ProcessSpec` so the mapping
/// is a straight transcription; only the escalation sequence and signal
/// names need translating out of their wire form.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub command: Vec<String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(default)]
    pub restart_policy: RestartPolicy,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    #[serde(default = "default_backoff_cap_ms")]
    pub backoff_cap_ms: u64,
    #[serde(default)]
    pub backoff_jitter: f64,
    #[serde(default = "default_restart_budget_max")]
    pub restart_budget_max: u32,
    #[serde(default = "default_restart_budget_window_secs")]
    pub restart_budget_window_secs: u64,
    #[serde(default = "default_start_deadline_secs")]
    pub start_deadline_secs: u64,
    #[serde(default = "default_stop_signal")]
    pub stop_signal: String,
    #[serde(default = "default_stop_grace_secs")]
    pub stop_grace_secs: u64,
    #[serde(default)]
    pub restart_on_unhealthy: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl ServiceConfig {
    fn into_spec(self) -> Result<ProcessSpec, ConfigError> {
        let name = ServiceName::new(&self.name)
            .map_err(|e| ConfigError::InvalidName(self.name.clone(), e))?;
        let depends_on = self
            .depends_on
            .iter()
            .map(|d| ServiceName::new(d).map_err(|e| ConfigError::InvalidName(d.clone(), e)))
            .collect::<Result<Vec<_>, _>>()?;
        let stop_signal =
            Signal::from_str(&self.stop_signal).map_err(|_| ConfigError::InvalidSignal {
                service: self.name.clone(),
                signal: self.stop_signal.clone(),
            })?;

        Ok(ProcessSpec {
            name,
            command: self.command,
            cwd: self.cwd,
            env: self.env,
            uid: self.uid,
            gid: self.gid,
            restart_policy: self.restart_policy,
            backoff: BackoffPolicy::new(
                Duration::from_millis(self.backoff_base_ms),
                Duration::from_millis(self.backoff_cap_ms),
                self.backoff_jitter,
            ),
            restart_budget: RestartBudget::new(
                self.restart_budget_max,
                Duration::from_secs(self.restart_budget_window_secs),
            ),
            start_deadline: Duration::from_secs(self.start_deadline_secs),
            stop_sequence: vec![
                StopStep { signal: stop_signal, deadline: Duration::from_secs(self.stop_grace_secs) },
                StopStep { signal: Signal::SIGKILL, deadline: Duration::ZERO },
            ],
            restart_on_unhealthy: self.restart_on_unhealthy,
            enabled: self.enabled,
            depends_on,
        })
    }
}

/// `[daemon]` table: everything about where the daemon lives on disk and how
/// it's reached, independent of the service fleet itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub state_dir: PathBuf,
    pub socket_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub tcp_listen: Option<String>,
    pub auth_token: Option<String>,
    pub aggregator_interval_ms: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let state_dir = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("/var/lib"))
            .join("sv");
        Self {
            state_dir,
            socket_path: None,
            log_dir: None,
            tcp_listen: None,
            auth_token: None,
            aggregator_interval_ms: 1000,
        }
    }
}

impl DaemonConfig {
    pub fn socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(|| self.state_dir.join("sv.sock"))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join("sv.lock")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| self.state_dir.join("logs"))
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FleetConfig {
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(rename = "service", default)]
    pub services: Vec<ServiceConfig>,
}

impl FleetConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(toml::from_str(&text)?)
    }

    pub fn process_specs(&self) -> Result<Vec<ProcessSpec>, ConfigError> {
        self.services.iter().cloned().map(ServiceConfig::into_spec).collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
