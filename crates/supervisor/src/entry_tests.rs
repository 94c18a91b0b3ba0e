use super::*;
use std::time::Duration;
use sv_core::{RestartBudget, RestartPolicy};

fn spec(name: &str, policy: RestartPolicy) -> ProcessSpec {
    ProcessSpec {
        name: ServiceName::new(name).unwrap(),
        command: vec!["/bin/true".to_string()],
        cwd: None,
        env: HashMap::new(),
        uid: None,
        gid: None,
        restart_policy: policy,
        backoff: BackoffPolicy::new(Duration::from_millis(100), Duration::from_secs(2), 0.0),
        restart_budget: RestartBudget::new(5, Duration::from_secs(60)),
        start_deadline: Duration::from_secs(5),
        stop_sequence: ProcessSpec::default_stop_sequence(),
        restart_on_unhealthy: false,
        enabled: true,
        depends_on: vec![],
    }
}

#[test]
fn pid_is_present_only_while_starting_running_stopping() {
    let mut entry = ProcessEntry::new(spec("web", RestartPolicy::Never));
    assert!(entry.pid.is_none());

    entry.on_start_requested();
    entry.on_spawn_ok(123, 0);
    assert_eq!(entry.pid, Some(123));

    let (_, delay) = entry.on_exit(ExitStatus { code: Some(0), signal: None }, 10, 0.0);
    assert!(delay.is_none());
    assert!(entry.pid.is_none());
    assert_eq!(entry.state, State::Stopped);
}

#[test]
fn restart_count_is_monotonically_non_decreasing() {
    let mut entry = ProcessEntry::new(spec("crasher", RestartPolicy::OnFailure));
    entry.on_start_requested();
    entry.on_spawn_ok(1, 0);

    let mut prev = entry.restart_count;
    for t in [100u64, 300, 700] {
        let (_, delay) = entry.on_exit(ExitStatus { code: Some(1), signal: None }, t, 0.0);
        assert!(delay.is_some());
        assert!(entry.restart_count >= prev);
        prev = entry.restart_count;
        entry.on_start_requested();
        entry.on_spawn_ok(1, t);
    }
}

#[test]
fn exact_backoff_sequence_and_budget_exhaustion() {
    // base=100ms cap=2s jitter=0, on-failure, exit code 137 (SIGKILL).
    let mut entry = ProcessEntry::new(spec("crasher", RestartPolicy::OnFailure));
    let expected_delays_ms = [100u64, 200, 400, 800, 1600];
    let mut now = 0u64;
    for (i, &expected) in expected_delays_ms.iter().enumerate() {
        entry.on_start_requested();
        entry.on_spawn_ok(1, now);
        let (events, delay) = entry.on_exit(
            ExitStatus { code: None, signal: Some(9) },
            now,
            0.0,
        );
        assert_eq!(delay, Some(Duration::from_millis(expected)), "attempt {i}");
        assert!(events.iter().any(|e| e.category() == "process"));
        now += expected;
    }

    // 5th failure (index 4, the 5th overall) stays within budget (max=5),
    // resting in Backoff until the supervisor respawns it.
    assert_eq!(entry.state, State::Backoff);

    // A 6th failure within the 60s window exceeds the budget -> Failed.
    entry.on_spawn_ok(1, now);
    let (_, delay) = entry.on_exit(ExitStatus { code: None, signal: Some(9) }, now, 0.0);
    assert!(delay.is_none());
    assert_eq!(entry.state, State::Failed);
    assert!(entry.last_error.as_ref().unwrap().contains('9'));
}

#[test]
fn never_policy_goes_straight_to_failed_on_crash() {
    let mut entry = ProcessEntry::new(spec("oneshot", RestartPolicy::Never));
    entry.on_start_requested();
    entry.on_spawn_ok(1, 0);
    let (_, delay) = entry.on_exit(ExitStatus { code: Some(1), signal: None }, 10, 0.0);
    assert!(delay.is_none());
    assert_eq!(entry.state, State::Failed);
}

#[test]
fn intentional_stop_never_restarts_even_with_always_policy() {
    let mut entry = ProcessEntry::new(spec("web", RestartPolicy::Always));
    entry.on_start_requested();
    entry.on_spawn_ok(1, 0);
    let step = entry.on_stop_requested().unwrap();
    assert_eq!(step.signal, nix::sys::signal::Signal::SIGTERM);

    let (events, delay) = entry.on_exit(ExitStatus { code: Some(0), signal: None }, 10, 0.0);
    assert!(delay.is_none());
    assert_eq!(entry.state, State::Stopped);
    assert!(events.iter().any(|e| e.ty == EventType::Process(ProcessEvent::Stopped)));
}

#[test]
fn clean_exit_restarts_under_always_policy() {
    let mut entry = ProcessEntry::new(spec("daemon", RestartPolicy::Always));
    entry.on_start_requested();
    entry.on_spawn_ok(1, 0);
    let (_, delay) = entry.on_exit(ExitStatus { code: Some(0), signal: None }, 10, 0.0);
    assert!(delay.is_some());
    assert_eq!(entry.state, State::Backoff);
}

#[test]
fn backoff_has_no_pid_until_respawn() {
    let mut entry = ProcessEntry::new(spec("crasher", RestartPolicy::Always));
    entry.on_start_requested();
    entry.on_spawn_ok(1, 0);

    let (_, delay) = entry.on_exit(ExitStatus { code: Some(1), signal: None }, 10, 0.0);
    assert!(delay.is_some());
    assert_eq!(entry.state, State::Backoff);
    assert!(!entry.state.has_pid());
    assert!(entry.pid.is_none());

    entry.on_start_requested();
    assert_eq!(entry.state, State::Starting);
    assert!(entry.pid.is_none());

    entry.on_spawn_ok(2, 20);
    assert!(entry.state.has_pid());
    assert_eq!(entry.pid, Some(2));
}

#[test]
fn health_change_does_not_alter_state() {
    let mut entry = ProcessEntry::new(spec("web", RestartPolicy::Never));
    entry.on_start_requested();
    entry.on_spawn_ok(1, 0);
    entry.on_ready(1);
    assert_eq!(entry.state, State::Running);

    let events = entry.on_health_change(false, 5);
    assert_eq!(entry.state, State::Running);
    assert!(!entry.healthy);
    assert_eq!(events[0].ty, EventType::Process(ProcessEvent::Unhealthy));
}
