use super::*;

#[test]
fn category_is_first_segment_of_name() {
    let ty = EventType::Process(ProcessEvent::Started);
    assert_eq!(ty.category(), "process");
    assert_eq!(ty.name(), "process.started");
}

#[test]
fn all_type_names_are_ascii_lower_dotted() {
    let all = [
        EventType::Process(ProcessEvent::Started),
        EventType::Process(ProcessEvent::Stopped),
        EventType::Process(ProcessEvent::Failed),
        EventType::Process(ProcessEvent::Restarted),
        EventType::Process(ProcessEvent::Healthy),
        EventType::Process(ProcessEvent::Unhealthy),
        EventType::Mesh(MeshEvent::NodeUp),
        EventType::Mesh(MeshEvent::NodeDown),
        EventType::Mesh(MeshEvent::LeaderChanged),
        EventType::Mesh(MeshEvent::TopologyChanged),
        EventType::Kubernetes(KubernetesEvent::PodCreated),
        EventType::Kubernetes(KubernetesEvent::PodDeleted),
        EventType::Kubernetes(KubernetesEvent::PodReady),
        EventType::Kubernetes(KubernetesEvent::PodFailed),
        EventType::System(SystemEvent::CpuHigh),
        EventType::System(SystemEvent::MemoryHigh),
        EventType::System(SystemEvent::DiskFull),
        EventType::Daemon(DaemonEvent::Started),
        EventType::Daemon(DaemonEvent::Stopping),
        EventType::Daemon(DaemonEvent::ConfigReloaded),
        EventType::Unknown,
    ];
    for ty in all {
        let name = ty.name();
        assert!(name.is_ascii());
        assert_eq!(name, name.to_lowercase());
        assert!(name.chars().next().unwrap().is_alphabetic());
    }
}

#[test]
fn builder_methods_set_optional_fields() {
    let name = ServiceName::new("web").unwrap();
    let event = Event::new(EventType::Process(ProcessEvent::Failed), 1_000)
        .with_service(name.clone())
        .with_message("boom")
        .with_data("reason", "exit code 137");

    assert_eq!(event.service_name, Some(name));
    assert_eq!(event.message, "boom");
    assert_eq!(event.data.get("reason"), Some(&DataValue::Str("exit code 137".to_string())));
    assert_eq!(event.category(), "process");
}
