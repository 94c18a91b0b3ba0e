// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonState` snapshot and its constituent value types.

use crate::service::ServiceName;
use crate::state::State;
use serde::{Deserialize, Serialize};

/// CPU time accounting for a process, in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuUsage {
    pub user_ns: u64,
    pub system_ns: u64,
    pub total_ns: u64,
}

/// Memory accounting for a process, all fields in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub rss: u64,
    pub vms: u64,
    pub swap: u64,
    pub shared: u64,
    pub data: u64,
    pub stack: u64,
}

/// Per-service sample composed by the Snapshot Aggregator from the
/// Supervisor's `GetAllProcessMetrics` plus the metrics/cgroup collectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessMetrics {
    pub service_name: ServiceName,
    /// `None` iff `state` has no PID.
    pub pid: Option<i64>,
    pub state: State,
    pub healthy: bool,
    pub cpu: CpuUsage,
    pub memory: MemoryUsage,
    pub start_time_ms: Option<u64>,
    pub restart_count: u32,
    pub last_error: Option<String>,
    pub timestamp_ms: u64,
}

impl ProcessMetrics {
    /// `now - StartTime` while the entry has a start time and is running;
    /// zero otherwise.
    pub fn uptime_ms(&self) -> u64 {
        match (self.state, self.start_time_ms) {
            (State::Running, Some(start)) => self.timestamp_ms.saturating_sub(start),
            _ => 0,
        }
    }
}

/// Host facts, captured once at daemon start plus a live PID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: String,
    pub os: String,
    pub arch: String,
    pub kernel: String,
    pub daemon_pid: i64,
    pub version: String,
    pub start_time_ms: u64,
}

impl HostInfo {
    pub fn uptime_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.start_time_ms)
    }
}

/// Host-wide resource usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub cpu_jiffies_total: u64,
    pub cpu_jiffies_idle: u64,
    pub memory_total: u64,
    pub memory_used: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub load_1: f64,
    pub load_5: f64,
    pub load_15: f64,
    pub disk_total: u64,
    pub disk_used: u64,
    /// `0.0..=1.0`; degraded to `0.0` when the kernel pressure-stall file
    /// is unavailable.
    pub pressure_cpu_some: f64,
}

/// Mesh membership facet, present only when mesh discovery is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshTopology {
    pub node_id: String,
    pub leader_id: Option<String>,
    pub peers: Vec<String>,
}

/// Kubernetes pod identity facet, present only when running in a pod;
/// omitted when not running in a pod, signalled by an empty pod name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KubernetesState {
    pub pod_name: String,
    pub namespace: String,
    pub node_name: String,
}

/// Immutable, point-in-time composite of all observable daemon state.
/// Produced whole by the Aggregator; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonState {
    pub timestamp_ms: u64,
    pub version: String,
    pub host: HostInfo,
    pub processes: Vec<ProcessMetrics>,
    pub system: SystemState,
    pub mesh: Option<MeshTopology>,
    pub kubernetes: Option<KubernetesState>,
}

impl DaemonState {
    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn running_process_count(&self) -> usize {
        self.processes.iter().filter(|p| p.state == State::Running).count()
    }

    pub fn healthy_process_count(&self) -> usize {
        self.processes.iter().filter(|p| p.state == State::Running && p.healthy).count()
    }

    /// `true` iff every known process is healthy and the count is >= 1.
    pub fn healthy(&self) -> bool {
        !self.processes.is_empty() && self.healthy_process_count() == self.process_count()
    }

    pub fn uptime_ms(&self) -> u64 {
        self.host.uptime_ms(self.timestamp_ms)
    }

    pub fn process(&self, name: &str) -> Option<&ProcessMetrics> {
        self.processes.iter().find(|p| p.service_name.as_str() == name)
    }

    /// Checks the invariant:
    /// `HealthyProcessCount() <= RunningProcessCount() <= ProcessCount()`.
    pub fn check_invariant(&self) -> bool {
        self.healthy_process_count() <= self.running_process_count()
            && self.running_process_count() <= self.process_count()
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
