use super::*;
use sv_core::ServiceName;

fn process(pid: Option<i64>, restart_count: u32) -> ProcessMetrics {
    ProcessMetrics {
        service_name: ServiceName::new("web").unwrap(),
        pid,
        state: State::Running,
        healthy: true,
        cpu: CpuUsage::default(),
        memory: MemoryUsage::default(),
        start_time_ms: Some(0),
        restart_count,
        last_error: None,
        timestamp_ms: 1_000,
    }
}

#[test]
fn pid_out_of_i32_range_clamps_rather_than_wraps() {
    let huge = process(Some(i64::MAX), 0);
    let wire = ProcessMetricsWire::from(&huge);
    assert_eq!(wire.pid, i32::MAX);
}

#[test]
fn missing_pid_becomes_zero() {
    let none = process(None, 0);
    let wire = ProcessMetricsWire::from(&none);
    assert_eq!(wire.pid, 0);
}

#[test]
fn restart_count_beyond_i32_max_clamps() {
    let p = process(Some(1), u32::MAX);
    let wire = ProcessMetricsWire::from(&p);
    assert_eq!(wire.restart_count, i32::MAX);
}

#[test]
fn state_maps_to_matching_wire_variant() {
    assert_eq!(StateWire::from(State::Failed), StateWire::Failed);
    assert_eq!(StateWire::from(State::Running), StateWire::Running);
}
