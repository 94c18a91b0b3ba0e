// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process Entry state machine states.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a supervised process entry.
///
/// `Stopped -> Starting -> Running -> Stopping -> Stopped|Failed`, with
/// `Failed` a stable resting state awaiting operator action or reload.
/// A crash-restart does not jump straight back to `Starting`: it waits out
/// its backoff delay in `Backoff` first, since no PID exists until the
/// respawn actually fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Stopped,
    Starting,
    Running,
    Stopping,
    Failed,
    Backoff,
}

impl State {
    /// True while a PID is expected to be valid for the entry: zero iff
    /// state is `Stopped`, `Failed`, or `Backoff`.
    pub fn has_pid(self) -> bool {
        matches!(self, State::Starting | State::Running | State::Stopping)
    }

    pub fn is_terminal_rest(self) -> bool {
        matches!(self, State::Stopped | State::Failed)
    }
}

crate::simple_display! {
    State {
        Stopped => "stopped",
        Starting => "starting",
        Running => "running",
        Stopping => "stopping",
        Failed => "failed",
        Backoff => "backoff",
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
