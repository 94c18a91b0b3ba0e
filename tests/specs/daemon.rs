//! Black-box daemon lifecycle and supervision scenarios, driven entirely
//! through the compiled `svd`/`sv` binaries.

use crate::prelude::{stdout, DaemonHandle};
use serial_test::serial;

#[test]
#[serial]
fn ps_reports_a_registered_service_as_running() {
    let daemon = DaemonHandle::start(
        r#"
[[service]]
name = "sleeper"
command = ["/bin/sleep", "30"]
enabled = true
"#,
    );

    let output = daemon.sv(&["ps"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("sleeper"), "ps output was:\n{text}");
    assert!(text.contains("Running"), "ps output was:\n{text}");
}

#[test]
#[serial]
fn dependent_service_starts_after_its_dependency() {
    let daemon = DaemonHandle::start(
        r#"
[[service]]
name = "base"
command = ["/bin/sleep", "30"]
enabled = true

[[service]]
name = "dependent"
command = ["/bin/sleep", "30"]
enabled = true
depends_on = ["base"]
"#,
    );

    let output = daemon.sv(&["ps"]);
    let text = stdout(&output);
    assert!(text.contains("base"));
    assert!(text.contains("dependent"));
}

#[test]
#[serial]
fn stop_transitions_the_service_out_of_running() {
    let daemon = DaemonHandle::start(
        r#"
[[service]]
name = "sleeper"
command = ["/bin/sleep", "30"]
enabled = true
"#,
    );

    let stop = daemon.sv(&["stop", "sleeper", "--deadline-ms", "3000"]);
    assert!(stop.status.success(), "stop failed: {}", stdout(&stop));

    let show = daemon.sv(&["show", "sleeper"]);
    let text = stdout(&show);
    assert!(!text.contains("state: Running"), "show output was:\n{text}");
}

#[test]
#[serial]
fn unknown_service_surfaces_as_a_cli_error() {
    let daemon = DaemonHandle::start("");
    let output = daemon.sv(&["show", "ghost"]);
    assert!(!output.status.success());
}
