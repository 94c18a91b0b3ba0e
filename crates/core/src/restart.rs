// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Restart policy, backoff, and restart-budget data types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// When a process entry may be restarted after it exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    Never,
    OnFailure,
    Always,
}

impl RestartPolicy {
    /// Whether a clean (code 0, no signal) exit should be restarted.
    pub fn restart_on_clean_exit(self) -> bool {
        matches!(self, RestartPolicy::Always)
    }

    /// Whether a non-zero exit or signal death should be restarted.
    pub fn restart_on_failure(self) -> bool {
        matches!(self, RestartPolicy::OnFailure | RestartPolicy::Always)
    }
}

/// Exponential backoff parameters between restart attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub cap: Duration,
    /// Fraction of the computed delay that may be added or subtracted,
    /// in `[0.0, 1.0]`. `0.0` disables jitter.
    pub jitter: f64,
}

impl BackoffPolicy {
    pub fn new(base: Duration, cap: Duration, jitter: f64) -> Self {
        Self { base, cap, jitter: jitter.clamp(0.0, 1.0) }
    }

    /// Delay before the `attempt`-th restart (0-indexed), capped, before
    /// jitter is applied. `base * 2^attempt`, saturating rather than
    /// overflowing on large attempt counts.
    fn uncapped_delay(&self, attempt: u32) -> Duration {
        self.base.checked_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX)).unwrap_or(self.cap)
    }

    /// Delay for the `attempt`-th restart (0-indexed) after capping.
    /// `jitter_roll` is a caller-supplied sample in `[-1.0, 1.0]`; the final
    /// delay is `capped * (1 + jitter * jitter_roll)`, clamped to
    /// `[0, cap]`. Passing `0.0` reproduces a deterministic sequence
    /// (100, 200, 400, 800, 1600, 2000, 2000 ms for base=100ms, cap=2s).
    pub fn delay_for_attempt(&self, attempt: u32, jitter_roll: f64) -> Duration {
        let capped = self.uncapped_delay(attempt).min(self.cap);
        if self.jitter == 0.0 {
            return capped;
        }
        let roll = jitter_roll.clamp(-1.0, 1.0);
        let factor = 1.0 + self.jitter * roll;
        let nanos = (capped.as_nanos() as f64 * factor).max(0.0);
        Duration::from_nanos(nanos as u64).min(self.cap)
    }
}

/// Sliding-window bound on permitted restart failures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestartBudget {
    pub max: u32,
    pub window: Duration,
}

impl RestartBudget {
    pub fn new(max: u32, window: Duration) -> Self {
        Self { max, window }
    }

    /// Given the epoch-ms timestamps of prior failures (any order) and the
    /// current time, returns whether one more failure would exceed the
    /// budget's window-bounded count.
    pub fn would_exceed(&self, failures_epoch_ms: &[u64], now_ms: u64) -> bool {
        let window_start = now_ms.saturating_sub(self.window.as_millis() as u64);
        let in_window = failures_epoch_ms.iter().filter(|&&t| t >= window_start).count();
        in_window as u32 + 1 > self.max
    }
}

#[cfg(test)]
#[path = "restart_tests.rs"]
mod tests;
