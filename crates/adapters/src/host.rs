// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host-wide facts: CPU jiffies, memory, load average, and disk usage,
//! read from `/proc` and `statvfs(2)`.

use nix::sys::statvfs::statvfs;
use sv_aggregator::providers::{CollectError, HostInfoProvider};
use sv_core::HostInfo;

const OS_RELEASE_PATH: &str = "/proc/sys/kernel/osrelease";
const ROOT_FS: &str = "/";

pub struct LinuxHostInfoProvider {
    version: String,
    start_time_ms: u64,
}

impl LinuxHostInfoProvider {
    pub fn new(version: impl Into<String>, start_time_ms: u64) -> Self {
        Self { version: version.into(), start_time_ms }
    }

    fn kernel_release() -> String {
        std::fs::read_to_string(OS_RELEASE_PATH)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| "unknown".to_string())
    }

    fn hostname() -> String {
        nix::unistd::gethostname()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

impl HostInfoProvider for LinuxHostInfoProvider {
    fn host_info(&self) -> HostInfo {
        HostInfo {
            hostname: Self::hostname(),
            os: "linux".to_string(),
            arch: std::env::consts::ARCH.to_string(),
            kernel: Self::kernel_release(),
            daemon_pid: nix::unistd::getpid().as_raw(),
            version: self.version.clone(),
            start_time_ms: self.start_time_ms,
        }
    }

    fn system_cpu_jiffies(&self) -> Result<(u64, u64), CollectError> {
        let stats = procfs::KernelStats::new()
            .map_err(|e| CollectError::Unavailable(e.to_string()))?;
        let cpu = stats.total;
        let idle = cpu.idle.saturating_add(cpu.iowait.unwrap_or(0));
        let busy = cpu
            .user
            .saturating_add(cpu.nice)
            .saturating_add(cpu.system)
            .saturating_add(cpu.irq.unwrap_or(0))
            .saturating_add(cpu.softirq.unwrap_or(0))
            .saturating_add(cpu.steal.unwrap_or(0));
        Ok((busy.saturating_add(idle), idle))
    }

    fn system_memory(&self) -> Result<(u64, u64, u64, u64), CollectError> {
        let mem = procfs::Meminfo::new().map_err(|e| CollectError::Unavailable(e.to_string()))?;
        let available = mem.mem_available.unwrap_or(mem.mem_free);
        let mem_used = mem.mem_total.saturating_sub(available);
        let swap_used = mem.swap_total.saturating_sub(mem.swap_free);
        Ok((mem.mem_total, mem_used, mem.swap_total, swap_used))
    }

    fn load_average(&self) -> Result<(f64, f64, f64), CollectError> {
        let load =
            procfs::LoadAverage::new().map_err(|e| CollectError::Unavailable(e.to_string()))?;
        Ok((load.one as f64, load.five as f64, load.fifteen as f64))
    }

    fn disk_usage(&self) -> Result<(u64, u64), CollectError> {
        let stats = statvfs(ROOT_FS).map_err(|e| CollectError::Unavailable(e.to_string()))?;
        let frsize = stats.fragment_size();
        let total = (stats.blocks() as u64).saturating_mul(frsize as u64);
        let free = (stats.blocks_free() as u64).saturating_mul(frsize as u64);
        Ok((total, total.saturating_sub(free)))
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
