// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process Entry: the per-service state machine.
//!
//! An entry holds no back-reference to the supervisor. Every mutation is a
//! plain method that updates `self` and returns the events the transition
//! produced; the supervisor decides when to call them and performs the
//! actual fork/exec and signal delivery.

use nix::sys::signal::Signal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use sv_core::{BackoffPolicy, Event, EventType, ProcessEvent, RestartBudget, RestartPolicy, ServiceName, State};

/// One step of a stop escalation sequence (e.g. SIGTERM, wait 10s, SIGKILL).
#[derive(Debug, Clone, Copy)]
pub struct StopStep {
    pub signal: Signal,
    pub deadline: Duration,
}

/// Static configuration for one supervised service.
#[derive(Debug, Clone)]
pub struct ProcessSpec {
    pub name: ServiceName,
    pub command: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: HashMap<String, String>,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub restart_policy: RestartPolicy,
    pub backoff: BackoffPolicy,
    pub restart_budget: RestartBudget,
    pub start_deadline: Duration,
    pub stop_sequence: Vec<StopStep>,
    pub restart_on_unhealthy: bool,
    pub enabled: bool,
    pub depends_on: Vec<ServiceName>,
}

impl ProcessSpec {
    /// Default escalation: SIGTERM with a 10s grace period, then SIGKILL.
    pub fn default_stop_sequence() -> Vec<StopStep> {
        vec![
            StopStep { signal: Signal::SIGTERM, deadline: Duration::from_secs(10) },
            StopStep { signal: Signal::SIGKILL, deadline: Duration::ZERO },
        ]
    }
}

/// The outcome of a child process exit, as reaped by [`crate::reaper::Reaper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitStatus {
    pub fn is_clean(&self) -> bool {
        self.code == Some(0) && self.signal.is_none()
    }
}

/// Runtime state for one service, mutated exclusively by the owning
/// `Supervisor` under its single-writer command loop.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub spec: ProcessSpec,
    pub state: State,
    pub pid: Option<i32>,
    pub start_time_ms: Option<u64>,
    pub last_exit: Option<ExitStatus>,
    pub restart_count: u32,
    pub healthy: bool,
    pub last_error: Option<String>,
    /// Epoch-ms timestamps of restart-counted failures, for the sliding
    /// restart-budget window.
    failure_times_ms: Vec<u64>,
    /// `true` while the current `Stopping` transition was operator-requested
    /// rather than a crash; an intentional stop never schedules a restart.
    stopping_intentionally: bool,
    stop_step: usize,
}

impl ProcessEntry {
    pub fn new(spec: ProcessSpec) -> Self {
        Self {
            spec,
            state: State::Stopped,
            pid: None,
            start_time_ms: None,
            last_exit: None,
            restart_count: 0,
            healthy: false,
            last_error: None,
            failure_times_ms: Vec::new(),
            stopping_intentionally: false,
            stop_step: 0,
        }
    }

    pub fn name(&self) -> &ServiceName {
        &self.spec.name
    }

    fn event(&self, ty: EventType, now_ms: u64) -> Event {
        Event::new(ty, now_ms).with_service(self.spec.name.clone())
    }

    /// `Stopped|Failed -> Starting`. The supervisor follows this with a
    /// fork/exec and one of `on_spawn_ok`/`on_spawn_fail`.
    pub fn on_start_requested(&mut self) {
        debug_assert!(matches!(self.state, State::Stopped | State::Failed | State::Backoff));
        self.state = State::Starting;
        self.stopping_intentionally = false;
    }

    pub fn on_spawn_ok(&mut self, pid: i32, now_ms: u64) -> Vec<Event> {
        self.pid = Some(pid);
        self.start_time_ms = Some(now_ms);
        vec![self.event(EventType::Process(ProcessEvent::Started), now_ms)]
    }

    /// Spawn failed before exec (binary missing, permission denied, ...).
    /// Per the open-question resolution in `DESIGN.md`, pre-exec failures
    /// do not consume the restart budget but are still published as
    /// `process.failed`.
    pub fn on_spawn_fail(&mut self, reason: impl Into<String>, now_ms: u64) -> Vec<Event> {
        self.pid = None;
        self.state = State::Failed;
        let reason = reason.into();
        self.last_error = Some(reason.clone());
        vec![self
            .event(EventType::Process(ProcessEvent::Failed), now_ms)
            .with_data("reason", reason)]
    }

    /// The startup gate passed (health probe succeeded, or grace elapsed
    /// without early exit): `Starting -> Running`.
    pub fn on_ready(&mut self, now_ms: u64) -> Vec<Event> {
        self.state = State::Running;
        self.healthy = true;
        vec![self.event(EventType::Process(ProcessEvent::Healthy), now_ms)]
    }

    /// The start deadline elapsed before the gate passed. The caller is
    /// expected to send the first stop signal immediately afterward.
    pub fn on_start_deadline_exceeded(&mut self) {
        self.state = State::Stopping;
        self.stopping_intentionally = false;
        self.stop_step = 0;
    }

    /// Health probe edge. Does not change `State`: only flips `healthy`
    /// and emits the corresponding event.
    pub fn on_health_change(&mut self, healthy: bool, now_ms: u64) -> Vec<Event> {
        if healthy == self.healthy {
            return vec![];
        }
        self.healthy = healthy;
        let ty = if healthy { ProcessEvent::Healthy } else { ProcessEvent::Unhealthy };
        vec![self.event(EventType::Process(ty), now_ms)]
    }

    /// Operator-initiated stop: any non-`Stopped` state moves to `Stopping`
    /// and the first escalation signal is returned for the caller to send.
    /// An entry resting in `Backoff` has no process to signal, so it settles
    /// straight to `Stopped` instead; the supervisor is responsible for not
    /// honoring the scheduled restart once this returns `None`.
    pub fn on_stop_requested(&mut self) -> Option<StopStep> {
        match self.state {
            State::Stopped => return None,
            State::Backoff => {
                self.state = State::Stopped;
                self.stopping_intentionally = false;
                return None;
            }
            _ => {}
        }
        self.state = State::Stopping;
        self.stopping_intentionally = true;
        self.stop_step = 0;
        self.spec.stop_sequence.first().copied()
    }

    /// The current escalation step's deadline elapsed without an exit;
    /// returns the next step to send, or `None` if the sequence is exhausted
    /// (the caller should then fall back to a bare `SIGKILL`).
    pub fn escalate_stop(&mut self) -> Option<StopStep> {
        self.stop_step += 1;
        self.spec.stop_sequence.get(self.stop_step).copied()
    }

    /// Decide whether a just-observed exit should schedule a restart, per
    /// (policy, exit cause, restart budget). Returns the backoff delay to
    /// wait out in `State::Backoff` before the supervisor calls
    /// `on_start_requested` again, or `None` if the entry settles in a
    /// resting state.
    pub fn on_exit(&mut self, exit: ExitStatus, now_ms: u64, jitter_roll: f64) -> (Vec<Event>, Option<Duration>) {
        self.pid = None;
        self.last_exit = Some(exit);
        let intentional = self.stopping_intentionally;
        self.stopping_intentionally = false;

        let clean = exit.is_clean();
        let mut events = Vec::new();

        if intentional {
            self.state = State::Stopped;
            events.push(self.event(EventType::Process(ProcessEvent::Stopped), now_ms));
            return (events, None);
        }

        if !clean {
            self.last_error = Some(format!(
                "exit code={:?} signal={:?}",
                exit.code, exit.signal
            ));
        }

        let wants_restart = if clean {
            self.spec.restart_policy.restart_on_clean_exit()
        } else {
            self.spec.restart_policy.restart_on_failure()
        };

        let ty = if clean { ProcessEvent::Stopped } else { ProcessEvent::Failed };
        let mut ev = self.event(EventType::Process(ty), now_ms);
        if !clean {
            ev = ev.with_data("reason", self.last_error.clone().unwrap_or_default());
        }
        events.push(ev);

        if !wants_restart {
            self.state = if clean { State::Stopped } else { State::Failed };
            return (events, None);
        }

        if !clean && self.spec.restart_budget.would_exceed(&self.failure_times_ms, now_ms) {
            self.state = State::Failed;
            return (events, None);
        }
        if !clean {
            self.failure_times_ms.push(now_ms);
        }

        let attempt = self.restart_count;
        self.restart_count = self.restart_count.saturating_add(1);
        self.state = State::Backoff;
        events.push(self.event(EventType::Process(ProcessEvent::Restarted), now_ms));
        let delay = self.spec.backoff.delay_for_attempt(attempt, jitter_roll);
        (events, Some(delay))
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
