use super::*;
use crate::config::{DaemonConfig, ServiceConfig};
use sv_core::FakeClock;

fn fleet_in(dir: &std::path::Path) -> FleetConfig {
    FleetConfig {
        daemon: DaemonConfig { state_dir: dir.to_path_buf(), ..Default::default() },
        services: vec![],
    }
}

#[tokio::test]
async fn startup_binds_socket_and_creates_state_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let fleet = fleet_in(tmp.path());

    let daemon = startup(&fleet, FakeClock::new()).await.unwrap();
    assert!(daemon.socket_path.exists());
    assert!(tmp.path().join("sv.lock").exists());

    shutdown(&daemon, Duration::from_millis(50)).await;
    assert!(!daemon.socket_path.exists());
}

#[tokio::test]
async fn startup_registers_and_starts_enabled_services() {
    let tmp = tempfile::tempdir().unwrap();
    let mut fleet = fleet_in(tmp.path());
    fleet.services.push(ServiceConfig {
        name: "sleeper".to_string(),
        command: vec!["/bin/sleep".to_string(), "5".to_string()],
        cwd: None,
        env: Default::default(),
        uid: None,
        gid: None,
        restart_policy: sv_core::RestartPolicy::Never,
        backoff_base_ms: 100,
        backoff_cap_ms: 1000,
        backoff_jitter: 0.0,
        restart_budget_max: 3,
        restart_budget_window_secs: 60,
        start_deadline_secs: 5,
        stop_signal: "SIGTERM".to_string(),
        stop_grace_secs: 1,
        restart_on_unhealthy: false,
        enabled: true,
        depends_on: vec![],
    });

    let daemon = startup(&fleet, FakeClock::new()).await.unwrap();
    let metrics = daemon.supervisor.get_process_metrics(&sv_core::ServiceName::new("sleeper").unwrap());
    assert!(metrics.is_some());

    shutdown(&daemon, Duration::from_secs(2)).await;
}

#[tokio::test]
async fn second_startup_against_the_same_state_dir_fails_to_lock() {
    let tmp = tempfile::tempdir().unwrap();
    let fleet = fleet_in(tmp.path());

    let first = startup(&fleet, FakeClock::new()).await.unwrap();
    let second = startup(&fleet, FakeClock::new()).await;
    assert!(matches!(second, Err(LifecycleError::LockHeld(_))));

    shutdown(&first, Duration::from_millis(50)).await;
}
