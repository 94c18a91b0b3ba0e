// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability traits for the Aggregator's external collaborators. Concrete
//! Linux implementations and `Fake*` test doubles live in `sv-adapters`.

use sv_core::{HostInfo, KubernetesState, MeshTopology};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("process {0} not found")]
    NotFound(i32),
    #[error("collector unavailable: {0}")]
    Unavailable(String),
}

/// A single CPU/memory sample for one process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcSample {
    pub cpu_user_ns: u64,
    pub cpu_system_ns: u64,
    pub rss: u64,
    pub vms: u64,
    pub swap: u64,
    pub shared: u64,
    pub data: u64,
    pub stack: u64,
}

/// Kernel-enforced cgroup v2 bounds, read-only inputs to the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CgroupLimits {
    pub memory_max: Option<u64>,
    pub cpu_quota_us: Option<i64>,
    pub pids_max: Option<u64>,
}

pub trait MetricsProvider: Send + Sync {
    fn sample(&self, pid: i32) -> Result<ProcSample, CollectError>;
}

pub trait HostInfoProvider: Send + Sync {
    fn host_info(&self) -> HostInfo;
    fn system_cpu_jiffies(&self) -> Result<(u64, u64), CollectError>;
    fn system_memory(&self) -> Result<(u64, u64, u64, u64), CollectError>;
    fn load_average(&self) -> Result<(f64, f64, f64), CollectError>;
    fn disk_usage(&self) -> Result<(u64, u64), CollectError>;
}

pub trait CgroupProvider: Send + Sync {
    fn limits(&self, pid: i32) -> Option<CgroupLimits>;
}

pub trait MeshProvider: Send + Sync {
    fn topology(&self) -> Option<MeshTopology>;
}

pub trait KubernetesProvider: Send + Sync {
    fn state(&self) -> Option<KubernetesState>;
}
