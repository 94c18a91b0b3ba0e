// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Zombie collection under PID 1.

use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One reaped child's exit, forwarded to the Supervisor's `pid -> entry`
/// routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReapedChild {
    pub pid: i32,
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

/// Reaps every exited child, including grandchildren re-parented to PID 1.
///
/// Only meaningful when the current process is PID 1; the caller is
/// responsible for gating construction on [`is_pid1`].
#[derive(Clone)]
pub struct Reaper {
    running: Arc<AtomicBool>,
}

impl Reaper {
    pub fn new() -> Self {
        Self { running: Arc::new(AtomicBool::new(false)) }
    }

    /// `true` when the current process is PID 1 and must act as the
    /// reaper of last resort.
    pub fn is_pid1() -> bool {
        nix::unistd::getpid() == Pid::from_raw(1)
    }

    /// One non-blocking sweep: reap every waitable child with `WNOHANG`
    /// until none remain. Returns every reaped exit. Safe to call without
    /// the background task running.
    pub fn reap_once(&self) -> Vec<ReapedChild> {
        let mut reaped = Vec::new();
        loop {
            match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
                Ok(WaitStatus::Exited(pid, code)) => {
                    reaped.push(ReapedChild { pid: pid.as_raw(), code: Some(code), signal: None });
                }
                Ok(WaitStatus::Signaled(pid, signal, _)) => {
                    reaped.push(ReapedChild {
                        pid: pid.as_raw(),
                        code: None,
                        signal: Some(signal as i32),
                    });
                }
                Ok(WaitStatus::StillAlive) | Err(nix::errno::Errno::ECHILD) => break,
                Ok(_) => continue,
                Err(_) => break,
            }
        }
        reaped
    }

    pub fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    /// Idempotent; stops the background loop spawned by
    /// `sv_daemon`'s lifecycle wiring from consuming further SIGCHLD wakeups.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Default for Reaper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
