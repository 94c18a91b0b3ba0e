// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-process CPU/memory sampling from `/proc/[pid]/stat` and
//! `/proc/[pid]/status`, via the `procfs` crate.

use nix::unistd::SysconfVar;
use sv_aggregator::providers::{CollectError, MetricsProvider, ProcSample};

/// Reads CPU and memory usage for a single PID out of `/proc`.
pub struct LinuxMetricsProvider {
    tick_hz: u64,
}

impl LinuxMetricsProvider {
    pub fn new() -> Self {
        let tick_hz = nix::unistd::sysconf(SysconfVar::CLK_TCK)
            .ok()
            .flatten()
            .filter(|hz| *hz > 0)
            .map(|hz| hz as u64)
            .unwrap_or(100);
        Self { tick_hz }
    }

    fn ticks_to_ns(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(1_000_000_000) / self.tick_hz
    }
}

impl Default for LinuxMetricsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsProvider for LinuxMetricsProvider {
    fn sample(&self, pid: i32) -> Result<ProcSample, CollectError> {
        let process = procfs::process::Process::new(pid)
            .map_err(|_| CollectError::NotFound(pid))?;
        let stat = process
            .stat()
            .map_err(|e| CollectError::Unavailable(e.to_string()))?;

        let page_size = procfs::page_size();
        let rss = (stat.rss as u64).saturating_mul(page_size);

        let mut sample = ProcSample {
            cpu_user_ns: self.ticks_to_ns(stat.utime),
            cpu_system_ns: self.ticks_to_ns(stat.stime),
            rss,
            vms: stat.vsize,
            ..Default::default()
        };

        if let Ok(status) = process.status() {
            sample.swap = status.vmswap.unwrap_or(0).saturating_mul(1024);
            sample.data = status.vmdata.unwrap_or(0).saturating_mul(1024);
            sample.stack = status.vmstk.unwrap_or(0).saturating_mul(1024);
        }

        Ok(sample)
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
