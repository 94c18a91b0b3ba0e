// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot Aggregator: periodically composes a `DaemonState` from the
//! process table, host, cgroup, and optional mesh/k8s facets.

use crate::providers::{CgroupProvider, HostInfoProvider, KubernetesProvider, MeshProvider, MetricsProvider};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use sv_core::{Clock, CpuUsage, DaemonState, MemoryUsage, ProcessMetrics, SystemState};

/// Anything that can report the current set of `ProcessMetrics`, decoupling
/// the Aggregator's generic code from `sv-supervisor`'s concrete,
/// clock-generic `Supervisor<C>` type.
pub trait ProcessSource: Send + Sync {
    fn process_metrics(&self) -> Vec<ProcessMetrics>;
}

/// Default cadence between aggregator cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Caps how often an event-driven early refresh (dirty bit) may run, so a
/// flood of `process.*` events cannot starve the regular cadence.
const MIN_REFRESH_SPACING: Duration = Duration::from_millis(100);

pub struct Aggregator<C: Clock> {
    process_source: Arc<dyn ProcessSource>,
    host_info: Box<dyn HostInfoProvider>,
    metrics: Box<dyn MetricsProvider>,
    cgroup: Box<dyn CgroupProvider>,
    mesh: Option<Box<dyn MeshProvider>>,
    kubernetes: Option<Box<dyn KubernetesProvider>>,
    clock: C,
    /// Swap-on-publish latest snapshot: readers take a clone of the `Arc`
    /// under a short read lock, so a reader is never blocked by, or exposed
    /// to, an in-progress publish.
    latest: RwLock<Option<Arc<DaemonState>>>,
    last_refresh_ms: RwLock<u64>,
    dirty: AtomicBool,
}

impl<C: Clock> Aggregator<C> {
    pub fn new(
        process_source: Arc<dyn ProcessSource>,
        host_info: Box<dyn HostInfoProvider>,
        metrics: Box<dyn MetricsProvider>,
        cgroup: Box<dyn CgroupProvider>,
        mesh: Option<Box<dyn MeshProvider>>,
        kubernetes: Option<Box<dyn KubernetesProvider>>,
        clock: C,
    ) -> Self {
        Self {
            process_source,
            host_info,
            metrics,
            cgroup,
            mesh,
            kubernetes,
            clock,
            latest: RwLock::new(None),
            last_refresh_ms: RwLock::new(0),
            dirty: AtomicBool::new(false),
        }
    }

    /// Marks the next `tick` as due immediately, subject to
    /// [`MIN_REFRESH_SPACING`] since the last publish.
    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    fn should_refresh_now(&self, now_ms: u64) -> bool {
        if !self.dirty.load(Ordering::Acquire) {
            return false;
        }
        now_ms.saturating_sub(*self.last_refresh_ms.read()) >= MIN_REFRESH_SPACING.as_millis() as u64
    }

    /// Composes and publishes one `DaemonState`. Collector errors degrade
    /// the corresponding field rather than aborting the cycle.
    pub fn tick(&self) -> Arc<DaemonState> {
        let now_ms = self.clock.epoch_ms();
        self.dirty.store(false, Ordering::Release);
        *self.last_refresh_ms.write() = now_ms;

        let host = self.host_info.host_info();
        let system = self.collect_system_state();
        let processes = self.collect_process_metrics(now_ms);
        let mesh = self.mesh.as_ref().and_then(|m| m.topology());
        let kubernetes = self.kubernetes.as_ref().and_then(|k| k.state());

        let state = Arc::new(DaemonState {
            timestamp_ms: now_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
            host,
            processes,
            system,
            mesh,
            kubernetes,
        });
        *self.latest.write() = Some(state.clone());
        state
    }

    fn collect_process_metrics(&self, now_ms: u64) -> Vec<ProcessMetrics> {
        self.process_source
            .process_metrics()
            .into_iter()
            .map(|mut p| {
                if let Some(pid) = p.pid {
                    if let Ok(sample) = self.metrics.sample(pid as i32) {
                        p.cpu = CpuUsage {
                            user_ns: sample.cpu_user_ns,
                            system_ns: sample.cpu_system_ns,
                            total_ns: sample.cpu_user_ns + sample.cpu_system_ns,
                        };
                        p.memory = MemoryUsage {
                            rss: sample.rss,
                            vms: sample.vms,
                            swap: sample.swap,
                            shared: sample.shared,
                            data: sample.data,
                            stack: sample.stack,
                        };
                        if let Some(limits) = self.cgroup.limits(pid as i32) {
                            if let Some(max) = limits.memory_max {
                                if sample.rss > max {
                                    tracing::debug!(service = %p.service_name, rss = sample.rss, max, "process exceeds its cgroup memory limit");
                                }
                            }
                        }
                    }
                }
                p.timestamp_ms = now_ms;
                p
            })
            .collect()
    }

    fn collect_system_state(&self) -> SystemState {
        let (cpu_total, cpu_idle) = self.host_info.system_cpu_jiffies().unwrap_or((0, 0));
        let (mem_total, mem_used, swap_total, swap_used) =
            self.host_info.system_memory().unwrap_or((0, 0, 0, 0));
        let (load_1, load_5, load_15) = self.host_info.load_average().unwrap_or((0.0, 0.0, 0.0));
        let (disk_total, disk_used) = self.host_info.disk_usage().unwrap_or((0, 0));
        SystemState {
            cpu_jiffies_total: cpu_total,
            cpu_jiffies_idle: cpu_idle,
            memory_total: mem_total,
            memory_used: mem_used,
            swap_total,
            swap_used,
            load_1,
            load_5,
            load_15,
            disk_total,
            disk_used,
            pressure_cpu_some: 0.0,
        }
    }

    /// Returns the most recently published snapshot, if any.
    pub fn current(&self) -> Option<Arc<DaemonState>> {
        self.latest.read().clone()
    }

    pub fn should_refresh(&self) -> bool {
        self.should_refresh_now(self.clock.epoch_ms())
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
