use super::*;

#[test]
fn host_info_reports_the_current_process_as_daemon_pid() {
    let provider = LinuxHostInfoProvider::new("0.2.0", 1_000);
    let info = provider.host_info();
    assert_eq!(info.daemon_pid, nix::unistd::getpid().as_raw());
    assert_eq!(info.os, "linux");
    assert_eq!(info.start_time_ms, 1_000);
}

#[test]
fn system_memory_totals_are_nonzero() {
    let provider = LinuxHostInfoProvider::new("0.2.0", 0);
    let (total, used, _swap_total, _swap_used) = provider.system_memory().unwrap();
    assert!(total > 0);
    assert!(used <= total);
}

#[test]
fn disk_usage_root_is_nonzero() {
    let provider = LinuxHostInfoProvider::new("0.2.0", 0);
    let (total, used) = provider.disk_usage().unwrap();
    assert!(total > 0);
    assert!(used <= total);
}
