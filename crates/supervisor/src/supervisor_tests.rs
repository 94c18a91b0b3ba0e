use super::*;
use sv_core::{FakeClock, ProcessEvent, RestartBudget, RestartPolicy};

fn name(s: &str) -> ServiceName {
    ServiceName::new(s).unwrap()
}

fn spec(n: &str, command: &[&str], policy: RestartPolicy, depends_on: Vec<ServiceName>) -> ProcessSpec {
    ProcessSpec {
        name: name(n),
        command: command.iter().map(|s| s.to_string()).collect(),
        cwd: None,
        env: HashMap::new(),
        uid: None,
        gid: None,
        restart_policy: policy,
        backoff: sv_core::BackoffPolicy::new(Duration::from_millis(10), Duration::from_millis(100), 0.0),
        restart_budget: RestartBudget::new(5, Duration::from_secs(60)),
        start_deadline: Duration::from_secs(5),
        stop_sequence: ProcessSpec::default_stop_sequence(),
        restart_on_unhealthy: false,
        enabled: true,
        depends_on,
    }
}

#[tokio::test]
async fn register_rejects_duplicate_name() {
    let sup = Supervisor::new(EventBus::new(16), FakeClock::new());
    sup.register(spec("web", &["true"], RestartPolicy::Never, vec![])).unwrap();
    let err = sup.register(spec("web", &["true"], RestartPolicy::Never, vec![])).unwrap_err();
    assert!(matches!(err, SupervisorError::DuplicateService(_)));
}

#[tokio::test]
async fn start_spawns_a_real_process_and_records_its_pid() {
    let sup = Supervisor::new(EventBus::new(16), FakeClock::new());
    sup.register(spec("oneshot", &["true"], RestartPolicy::Never, vec![])).unwrap();
    sup.start(&name("oneshot")).await.unwrap();

    let metrics = sup.get_process_metrics(&name("oneshot")).unwrap();
    assert!(metrics.pid.is_some());
    assert!(matches!(metrics.state, State::Starting | State::Running));
}

#[tokio::test]
async fn start_unknown_service_is_not_found() {
    let sup = Supervisor::new(EventBus::new(16), FakeClock::new());
    let err = sup.start(&name("ghost")).await.unwrap_err();
    assert!(matches!(err, SupervisorError::NotFound(_)));
}

#[tokio::test]
async fn route_exit_settles_a_clean_never_policy_exit() {
    let sup = Arc::new(Supervisor::new(EventBus::new(16), FakeClock::new()));
    sup.register(spec("oneshot", &["true"], RestartPolicy::Never, vec![])).unwrap();
    sup.start(&name("oneshot")).await.unwrap();

    let pid = sup.get_process_metrics(&name("oneshot")).unwrap().pid.unwrap() as i32;
    sup.route_exit(ReapedChild { pid, code: Some(0), signal: None }, 0.0);

    let metrics = sup.get_process_metrics(&name("oneshot")).unwrap();
    assert_eq!(metrics.state, State::Stopped);
    assert!(metrics.pid.is_none());
}

#[tokio::test]
async fn route_exit_for_unknown_pid_is_ignored() {
    let sup = Arc::new(Supervisor::new(EventBus::new(16), FakeClock::new()));
    sup.register(spec("oneshot", &["true"], RestartPolicy::Never, vec![])).unwrap();
    // No start() call, so pid 99999 is not owned by any entry.
    sup.route_exit(ReapedChild { pid: 99_999, code: Some(0), signal: None }, 0.0);
    let metrics = sup.get_process_metrics(&name("oneshot")).unwrap();
    assert_eq!(metrics.state, State::Stopped);
}

#[tokio::test]
async fn start_all_starts_dependencies_before_dependents() {
    let bus = EventBus::new(16);
    let mut sub = bus.subscribe();
    let sup = Supervisor::new(bus, FakeClock::new());
    sup.register(spec("db", &["true"], RestartPolicy::Never, vec![])).unwrap();
    sup.register(spec("web", &["true"], RestartPolicy::Never, vec![name("db")])).unwrap();

    sup.start_all().await.unwrap();

    let mut order = Vec::new();
    while let Ok(event) = sub.try_recv() {
        if event.ty == EventType::Process(ProcessEvent::Started) {
            order.push(event.service_name.clone().unwrap());
        }
    }
    let db_pos = order.iter().position(|n| n == &name("db")).unwrap();
    let web_pos = order.iter().position(|n| n == &name("web")).unwrap();
    assert!(db_pos < web_pos);
}

#[tokio::test]
async fn reload_adds_and_removes_services() {
    let sup = Supervisor::new(EventBus::new(16), FakeClock::new());
    sup.register(spec("old", &["true"], RestartPolicy::Never, vec![])).unwrap();

    sup.reload(vec![spec("new", &["true"], RestartPolicy::Never, vec![])]).await.unwrap();

    assert!(sup.get_process_metrics(&name("old")).is_none());
    assert!(sup.get_process_metrics(&name("new")).is_some());
}

#[tokio::test]
async fn reload_with_a_changed_command_stops_and_respawns() {
    let sup = Supervisor::new(EventBus::new(16), FakeClock::new());
    sup.register(spec("svc", &["true"], RestartPolicy::Never, vec![])).unwrap();
    sup.start(&name("svc")).await.unwrap();
    let old_pid = sup.get_process_metrics(&name("svc")).unwrap().pid.unwrap();

    sup.reload(vec![spec("svc", &["false"], RestartPolicy::Never, vec![])]).await.unwrap();

    let metrics = sup.get_process_metrics(&name("svc")).unwrap();
    assert!(matches!(metrics.state, State::Starting | State::Running));
    assert_ne!(metrics.pid.unwrap(), old_pid, "command change must spawn a fresh process");
}

#[tokio::test]
async fn reload_with_unchanged_command_keeps_the_running_process() {
    let sup = Supervisor::new(EventBus::new(16), FakeClock::new());
    sup.register(spec("svc", &["true"], RestartPolicy::Never, vec![])).unwrap();
    sup.start(&name("svc")).await.unwrap();
    let old_pid = sup.get_process_metrics(&name("svc")).unwrap().pid.unwrap();

    sup.reload(vec![spec("svc", &["true"], RestartPolicy::Always, vec![])]).await.unwrap();

    let metrics = sup.get_process_metrics(&name("svc")).unwrap();
    assert_eq!(metrics.pid.unwrap(), old_pid, "policy-only change must not respawn");
}
