// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor: owns the set of Process Entries and serialises every
//! mutation under a single lock (`lock_state`/`lock_state_mut`), enforcing
//! single-writer discipline over the service table.

use crate::depgraph;
use crate::entry::{ExitStatus, ProcessEntry, ProcessSpec, StopStep};
use crate::error::SupervisorError;
use crate::reaper::ReapedChild;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::mem;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use sv_bus::{EventBus, Subscription};
use sv_core::{Clock, DaemonEvent, Event, EventType, ProcessMetrics, ServiceName, State};
use tokio::time::sleep;

struct SupervisorState {
    entries: IndexMap<ServiceName, ProcessEntry>,
    /// Reverse index populated on spawn so exit routing (`route_exit`) is
    /// O(1) instead of a linear scan over every entry.
    pid_owner: HashMap<i32, ServiceName>,
}

/// Owns every supervised service and the bus they publish to.
pub struct Supervisor<C: Clock> {
    state: Mutex<SupervisorState>,
    bus: EventBus,
    clock: C,
}

impl<C: Clock + 'static> Supervisor<C> {
    pub fn new(bus: EventBus, clock: C) -> Self {
        Self {
            state: Mutex::new(SupervisorState { entries: IndexMap::new(), pid_owner: HashMap::new() }),
            bus,
            clock,
        }
    }

    fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    fn publish_all(&self, events: Vec<Event>) {
        for event in events {
            self.bus.publish(event);
        }
    }

    fn dep_map(&self, state: &SupervisorState) -> IndexMap<ServiceName, Vec<ServiceName>> {
        state.entries.iter().map(|(n, e)| (n.clone(), e.spec.depends_on.clone())).collect()
    }

    /// Registers a new service in the `Stopped` state. Fatal
    /// ([`SupervisorError::DuplicateService`]) if the name is already taken.
    pub fn register(&self, spec: ProcessSpec) -> Result<(), SupervisorError> {
        let mut state = self.state.lock();
        if state.entries.contains_key(&spec.name) {
            return Err(SupervisorError::DuplicateService(spec.name));
        }
        state.entries.insert(spec.name.clone(), ProcessEntry::new(spec));
        Ok(())
    }

    /// Spawns the named service's command, transitioning `Stopped|Failed ->
    /// Starting -> Running` (subject to its startup gate). Fork/exec runs on
    /// a blocking thread so it never stalls the async runtime.
    pub async fn start(&self, name: &ServiceName) -> Result<(), SupervisorError> {
        let (command, cwd, env, uid, gid) = {
            let mut state = self.state.lock();
            let entry =
                state.entries.get_mut(name).ok_or_else(|| SupervisorError::NotFound(name.clone()))?;
            entry.on_start_requested();
            (
                entry.spec.command.clone(),
                entry.spec.cwd.clone(),
                entry.spec.env.clone(),
                entry.spec.uid,
                entry.spec.gid,
            )
        };

        let name_owned = name.clone();
        let spawn_result = tokio::task::spawn_blocking(move || spawn_child(&command, cwd, &env, uid, gid))
            .await
            .map_err(|source| SupervisorError::SpawnTaskPanicked { service: name_owned.clone(), source })?;

        let now = self.now_ms();
        let events = {
            let mut state = self.state.lock();
            let entry = state
                .entries
                .get_mut(&name_owned)
                .ok_or_else(|| SupervisorError::NotFound(name_owned.clone()))?;
            match spawn_result {
                Ok(pid) => {
                    let events = entry.on_spawn_ok(pid, now);
                    state.pid_owner.insert(pid, name_owned.clone());
                    events
                }
                Err(err) => entry.on_spawn_fail(err.to_string(), now),
            }
        };
        self.publish_all(events);
        Ok(())
    }

    /// Marks the startup gate as passed for `name`. Called by the
    /// health-probe / grace-period driver, which is external to this crate.
    pub fn mark_ready(&self, name: &ServiceName) {
        let now = self.now_ms();
        let events = {
            let mut state = self.state.lock();
            match state.entries.get_mut(name) {
                Some(entry) if entry.state == State::Starting => entry.on_ready(now),
                _ => vec![],
            }
        };
        self.publish_all(events);
    }

    /// Sends the configured escalation sequence to `name`, waiting up to
    /// `deadline` in total for the process to exit.
    /// Returns once the entry settles in `Stopped` or `Failed`.
    pub async fn stop(&self, name: &ServiceName, deadline: Duration) -> Result<(), SupervisorError> {
        let first = {
            let mut state = self.state.lock();
            let entry =
                state.entries.get_mut(name).ok_or_else(|| SupervisorError::NotFound(name.clone()))?;
            entry.on_stop_requested()
        };
        let Some(mut step) = first else {
            return Ok(());
        };

        let deadline_at = tokio::time::Instant::now() + deadline;
        loop {
            self.send_signal(name, step);
            let step_wait = step.deadline.min(deadline.max(Duration::ZERO));
            tokio::select! {
                _ = sleep(step_wait) => {}
                _ = self.wait_until_settled(name) => return Ok(()),
            }
            if self.is_settled(name) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline_at {
                self.send_signal(name, StopStep { signal: nix::sys::signal::Signal::SIGKILL, deadline: Duration::ZERO });
                return Ok(());
            }
            let mut state = self.state.lock();
            let entry =
                state.entries.get_mut(name).ok_or_else(|| SupervisorError::NotFound(name.clone()))?;
            match entry.escalate_stop() {
                Some(next) => step = next,
                None => {
                    drop(state);
                    self.send_signal(name, StopStep { signal: nix::sys::signal::Signal::SIGKILL, deadline: Duration::ZERO });
                    return Ok(());
                }
            }
        }
    }

    fn is_settled(&self, name: &ServiceName) -> bool {
        self.state
            .lock()
            .entries
            .get(name)
            .map(|e| e.state.is_terminal_rest())
            .unwrap_or(true)
    }

    async fn wait_until_settled(&self, name: &ServiceName) {
        while !self.is_settled(name) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    fn send_signal(&self, name: &ServiceName, step: StopStep) {
        let pid = self.state.lock().entries.get(name).and_then(|e| e.pid);
        if let Some(pid) = pid {
            let _ = nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), step.signal);
        }
    }

    pub async fn restart(&self, name: &ServiceName, deadline: Duration) -> Result<(), SupervisorError> {
        self.stop(name, deadline).await?;
        self.start(name).await
    }

    pub async fn start_all(&self) -> Result<(), SupervisorError> {
        let order = {
            let state = self.state.lock();
            depgraph::start_order(&self.dep_map(&state))?
        };
        for name in order {
            let enabled = self.state.lock().entries.get(&name).map(|e| e.spec.enabled).unwrap_or(false);
            if enabled {
                self.start(&name).await?;
            }
        }
        Ok(())
    }

    /// Graceful shutdown sequence: publish `daemon.stopping`,
    /// stop every service in reverse dependency order, wait for settlement.
    /// Closing the bus and stopping the reaper are the caller's
    /// responsibility (owned by `sv-daemon`'s lifecycle, not this crate).
    pub async fn stop_all(&self, deadline: Duration) -> Result<(), SupervisorError> {
        let now = self.now_ms();
        self.bus.publish(Event::new(EventType::Daemon(DaemonEvent::Stopping), now));

        let order = {
            let state = self.state.lock();
            depgraph::stop_order(&self.dep_map(&state))?
        };
        for name in order {
            self.stop(&name, deadline).await?;
        }
        Ok(())
    }

    /// Routes one reaped exit to its owning entry, scheduling a restart
    /// after the entry's backoff delay if the exit was restartable. The
    /// entry rests in `State::Backoff` (no PID) for the duration of that
    /// delay; the scheduled respawn re-checks the entry is still backing
    /// off before calling `start`, so an operator stop during the wait wins.
    /// Reaped PIDs absent from `pid_owner` are orphans with no
    /// supervisor-owned entry and are silently ignored here.
    pub fn route_exit(self: &Arc<Self>, reaped: ReapedChild, jitter_roll: f64) {
        let exit = ExitStatus { code: reaped.code, signal: reaped.signal };
        let now = self.now_ms();
        let (name, events, delay) = {
            let mut state = self.state.lock();
            let Some(name) = state.pid_owner.remove(&reaped.pid) else {
                return;
            };
            let entry = match state.entries.get_mut(&name) {
                Some(e) => e,
                None => return,
            };
            let (events, delay) = entry.on_exit(exit, now, jitter_roll);
            (name, events, delay)
        };
        self.publish_all(events);
        if let Some(delay) = delay {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                sleep(delay).await;
                let still_backing_off =
                    this.state.lock().entries.get(&name).map(|e| e.state == State::Backoff).unwrap_or(false);
                if still_backing_off {
                    let _ = this.start(&name).await;
                }
            });
        }
    }

    pub fn get_process_metrics(&self, name: &ServiceName) -> Option<ProcessMetrics> {
        let now = self.now_ms();
        self.state.lock().entries.get(name).map(|e| to_metrics(e, now))
    }

    pub fn get_all_process_metrics(&self) -> Vec<ProcessMetrics> {
        let now = self.now_ms();
        self.state.lock().entries.values().map(|e| to_metrics(e, now)).collect()
    }

    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    pub fn unsubscribe(&self, id: u64) {
        self.bus.unsubscribe(id);
    }

    /// Diffs the current service set against `specs`: additions are
    /// registered (and started if enabled), removals are dropped after
    /// stopping, and in-place modifications update policy/env without
    /// retyping the entry — unless `command`/`cwd`/`uid`/`gid` changed, in
    /// which case the fields that require a new process changed, so the
    /// old one is stopped and the entry is recreated and (re)started under
    /// the new spec.
    pub async fn reload(&self, specs: Vec<ProcessSpec>) -> Result<(), SupervisorError> {
        let new_names: std::collections::HashSet<ServiceName> =
            specs.iter().map(|s| s.name.clone()).collect();
        let removed: Vec<ServiceName> = {
            let state = self.state.lock();
            state.entries.keys().filter(|n| !new_names.contains(*n)).cloned().collect()
        };
        for name in removed {
            self.stop(&name, Duration::from_secs(10)).await?;
            self.state.lock().entries.shift_remove(&name);
        }

        for spec in specs {
            let needs_respawn = {
                let state = self.state.lock();
                state.entries.get(&spec.name).map(|e| requires_new_process(&e.spec, &spec))
            };
            match needs_respawn {
                Some(true) => {
                    self.stop(&spec.name, Duration::from_secs(10)).await?;
                    self.state.lock().entries.shift_remove(&spec.name);
                    let name = spec.name.clone();
                    let enabled = spec.enabled;
                    self.register(spec)?;
                    if enabled {
                        self.start(&name).await?;
                    }
                }
                Some(false) => {
                    let mut state = self.state.lock();
                    if let Some(entry) = state.entries.get_mut(&spec.name) {
                        entry.spec = spec;
                    }
                }
                None => {
                    let name = spec.name.clone();
                    let enabled = spec.enabled;
                    self.register(spec)?;
                    if enabled {
                        self.start(&name).await?;
                    }
                }
            }
        }

        let now = self.now_ms();
        self.bus.publish(Event::new(EventType::Daemon(DaemonEvent::ConfigReloaded), now));
        Ok(())
    }
}

/// Whether reloading `old` into `new` requires stopping the running
/// process and starting a fresh one, as opposed to an in-place policy
/// update: true when anything that shapes the actual fork/exec changed.
fn requires_new_process(old: &ProcessSpec, new: &ProcessSpec) -> bool {
    old.command != new.command || old.cwd != new.cwd || old.env != new.env || old.uid != new.uid || old.gid != new.gid
}

fn to_metrics(entry: &ProcessEntry, now_ms: u64) -> ProcessMetrics {
    ProcessMetrics {
        service_name: entry.spec.name.clone(),
        pid: entry.pid.map(i64::from),
        state: entry.state,
        healthy: entry.healthy,
        cpu: Default::default(),
        memory: Default::default(),
        start_time_ms: entry.start_time_ms,
        restart_count: entry.restart_count,
        last_error: entry.last_error.clone(),
        timestamp_ms: now_ms,
    }
}

/// Forks and execs `command`, returning the child PID. Ownership of the
/// exit status passes to the `Reaper`'s `WNOHANG` sweep: this function must
/// not call `Child::wait`, or it would race the reaper's collection of the
/// same PID.
fn spawn_child(
    command: &[String],
    cwd: Option<std::path::PathBuf>,
    env: &HashMap<String, String>,
    uid: Option<u32>,
    gid: Option<u32>,
) -> std::io::Result<i32> {
    let (program, args) = command.split_first().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command")
    })?;
    let mut cmd = Command::new(program);
    cmd.args(args).envs(env);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        if let Some(uid) = uid {
            cmd.uid(uid);
        }
        if let Some(gid) = gid {
            cmd.gid(gid);
        }
    }
    let child = cmd.spawn()?;
    let pid = child.id() as i32;
    mem::forget(child);
    Ok(pid)
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
