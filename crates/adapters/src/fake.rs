// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configurable test doubles for the capability traits, exported behind
//! `test-support` so downstream crates can assemble an `Aggregator`
//! without touching `/proc` or a real cgroup filesystem.

use parking_lot::Mutex;
use sv_aggregator::providers::{
    CgroupLimits, CgroupProvider, CollectError, HostInfoProvider, KubernetesProvider, MeshProvider,
    MetricsProvider, ProcSample,
};
use sv_core::{HostInfo, KubernetesState, MeshTopology};

pub struct FakeMetricsProvider {
    samples: Mutex<std::collections::HashMap<i32, ProcSample>>,
}

impl FakeMetricsProvider {
    pub fn new() -> Self {
        Self { samples: Mutex::new(std::collections::HashMap::new()) }
    }

    pub fn set(&self, pid: i32, sample: ProcSample) {
        self.samples.lock().insert(pid, sample);
    }
}

impl Default for FakeMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for FakeMetricsProvider {
    fn sample(&self, pid: i32) -> Result<ProcSample, CollectError> {
        self.samples.lock().get(&pid).copied().ok_or(CollectError::NotFound(pid))
    }
}

pub struct FakeHostInfoProvider {
    pub info: HostInfo,
    pub cpu_jiffies: (u64, u64),
    pub memory: (u64, u64, u64, u64),
    pub load: (f64, f64, f64),
    pub disk: (u64, u64),
}

impl HostInfoProvider for FakeHostInfoProvider {
    fn host_info(&self) -> HostInfo {
        self.info.clone()
    }

    fn system_cpu_jiffies(&self) -> Result<(u64, u64), CollectError> {
        Ok(self.cpu_jiffies)
    }

    fn system_memory(&self) -> Result<(u64, u64, u64, u64), CollectError> {
        Ok(self.memory)
    }

    fn load_average(&self) -> Result<(f64, f64, f64), CollectError> {
        Ok(self.load)
    }

    fn disk_usage(&self) -> Result<(u64, u64), CollectError> {
        Ok(self.disk)
    }
}

#[derive(Default)]
pub struct FakeCgroupProvider {
    limits: Mutex<std::collections::HashMap<i32, CgroupLimits>>,
}

impl FakeCgroupProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pid: i32, limits: CgroupLimits) {
        self.limits.lock().insert(pid, limits);
    }
}

impl CgroupProvider for FakeCgroupProvider {
    fn limits(&self, pid: i32) -> Option<CgroupLimits> {
        self.limits.lock().get(&pid).copied()
    }
}

#[derive(Default)]
pub struct FakeMeshProvider(pub Option<MeshTopology>);

impl MeshProvider for FakeMeshProvider {
    fn topology(&self) -> Option<MeshTopology> {
        self.0.clone()
    }
}

#[derive(Default)]
pub struct FakeKubernetesProvider(pub Option<KubernetesState>);

impl KubernetesProvider for FakeKubernetesProvider {
    fn state(&self) -> Option<KubernetesState> {
        self.0.clone()
    }
}
