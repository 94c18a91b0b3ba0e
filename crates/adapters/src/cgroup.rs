// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! cgroup v2 resource limits, read from the unified hierarchy under
//! `/sys/fs/cgroup`. Absence of cgroup v2, or of a given controller,
//! degrades to `None` rather than an error.

use std::fs;
use std::path::{Path, PathBuf};
use sv_aggregator::providers::{CgroupLimits, CgroupProvider};

const DEFAULT_CGROUP_ROOT: &str = "/sys/fs/cgroup";

pub struct CgroupV2Provider {
    root: PathBuf,
}

impl CgroupV2Provider {
    pub fn new() -> Self {
        Self::with_root(DEFAULT_CGROUP_ROOT)
    }

    /// Builds a provider rooted at a given cgroup filesystem mount, so
    /// tests can point at a fixture directory instead of the real one.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// The process's cgroup v2 path, from the `0::<path>` line of
    /// `/proc/[pid]/cgroup`.
    fn unified_path(pid: i32) -> Option<String> {
        let contents = fs::read_to_string(format!("/proc/{pid}/cgroup")).ok()?;
        contents.lines().find_map(|line| {
            let mut parts = line.splitn(3, ':');
            let hierarchy = parts.next()?;
            let controllers = parts.next()?;
            let path = parts.next()?;
            (hierarchy == "0" && controllers.is_empty()).then(|| path.to_string())
        })
    }

    fn read_limit(&self, dir: &str, file: &str) -> Option<u64> {
        let raw = fs::read_to_string(self.root.join(dir.trim_start_matches('/')).join(file)).ok()?;
        let value = raw.trim();
        if value == "max" {
            return None;
        }
        value.parse().ok()
    }

    fn read_cpu_quota(&self, dir: &str) -> Option<i64> {
        let raw = fs::read_to_string(
            self.root.join(dir.trim_start_matches('/')).join("cpu.max"),
        )
        .ok()?;
        let quota = raw.split_whitespace().next()?;
        if quota == "max" {
            return None;
        }
        quota.parse().ok()
    }
}

impl Default for CgroupV2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl CgroupProvider for CgroupV2Provider {
    fn limits(&self, pid: i32) -> Option<CgroupLimits> {
        let dir = Self::unified_path(pid)?;
        Some(CgroupLimits {
            memory_max: self.read_limit(&dir, "memory.max"),
            cpu_quota_us: self.read_cpu_quota(&dir),
            pids_max: self.read_limit(&dir, "pids.max"),
        })
    }
}

#[cfg(test)]
#[path = "cgroup_tests.rs"]
mod tests;
