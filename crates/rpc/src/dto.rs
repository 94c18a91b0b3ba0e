// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-shaped mirrors of the `sv-core` snapshot types. PID and restart
//! count are clamped to 32 bits on the way out; every other field carries
//! over unchanged.

use serde::{Deserialize, Serialize};
use sv_core::{CpuUsage, DaemonState, HostInfo, KubernetesState, MemoryUsage, MeshTopology, ProcessMetrics, State, SystemState};

use crate::wire::clamp_to_i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateWire {
    Unspecified,
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
    Backoff,
}

impl From<State> for StateWire {
    fn from(state: State) -> Self {
        match state {
            State::Stopped => StateWire::Stopped,
            State::Starting => StateWire::Starting,
            State::Running => StateWire::Running,
            State::Stopping => StateWire::Stopping,
            State::Failed => StateWire::Failed,
            State::Backoff => StateWire::Backoff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetricsWire {
    pub service_name: String,
    pub pid: i32,
    pub state: StateWire,
    pub healthy: bool,
    pub cpu: CpuUsage,
    pub memory: MemoryUsage,
    pub start_time_ms: u64,
    pub uptime_ms: u64,
    pub restart_count: i32,
    pub last_error: Option<String>,
    pub timestamp_ms: u64,
}

impl From<&ProcessMetrics> for ProcessMetricsWire {
    fn from(m: &ProcessMetrics) -> Self {
        ProcessMetricsWire {
            service_name: m.service_name.to_string(),
            pid: m.pid.map(clamp_to_i32).unwrap_or(0),
            state: m.state.into(),
            healthy: m.healthy,
            cpu: m.cpu,
            memory: m.memory,
            start_time_ms: m.start_time_ms.unwrap_or(0),
            uptime_ms: m.uptime_ms(),
            restart_count: clamp_to_i32(i64::from(m.restart_count)),
            last_error: m.last_error.clone(),
            timestamp_ms: m.timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostInfoWire {
    pub hostname: String,
    pub os: String,
    pub arch: String,
    pub kernel: String,
    pub daemon_pid: i32,
    pub version: String,
    pub start_time_ms: u64,
}

impl From<&HostInfo> for HostInfoWire {
    fn from(h: &HostInfo) -> Self {
        HostInfoWire {
            hostname: h.hostname.clone(),
            os: h.os.clone(),
            arch: h.arch.clone(),
            kernel: h.kernel.clone(),
            daemon_pid: clamp_to_i32(h.daemon_pid),
            version: h.version.clone(),
            start_time_ms: h.start_time_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonStateWire {
    pub timestamp_ms: u64,
    pub version: String,
    pub uptime_ms: u64,
    pub healthy: bool,
    pub host: HostInfoWire,
    pub processes: Vec<ProcessMetricsWire>,
    pub system: SystemState,
    pub mesh: Option<MeshTopology>,
    pub kubernetes: Option<KubernetesState>,
}

impl From<&DaemonState> for DaemonStateWire {
    fn from(s: &DaemonState) -> Self {
        DaemonStateWire {
            timestamp_ms: s.timestamp_ms,
            version: s.version.clone(),
            uptime_ms: s.uptime_ms(),
            healthy: s.healthy(),
            host: HostInfoWire::from(&s.host),
            processes: s.processes.iter().map(ProcessMetricsWire::from).collect(),
            system: s.system,
            mesh: s.mesh.clone(),
            kubernetes: s.kubernetes.clone(),
        }
    }
}

#[cfg(test)]
#[path = "dto_tests.rs"]
mod tests;
