//! CLI output-format specs.

use crate::prelude::{stdout, DaemonHandle};
use serial_test::serial;

#[test]
#[serial]
fn ps_json_output_is_valid_and_lists_the_service() {
    let daemon = DaemonHandle::start(
        r#"
[[service]]
name = "sleeper"
command = ["/bin/sleep", "30"]
enabled = true
"#,
    );

    let output = daemon.sv(&["--format", "json", "ps"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    let processes = value["processes"].as_array().expect("processes array");
    assert!(processes.iter().any(|p| p["service_name"] == "sleeper"));
}

#[test]
#[serial]
fn show_json_output_matches_the_requested_service() {
    let daemon = DaemonHandle::start(
        r#"
[[service]]
name = "sleeper"
command = ["/bin/sleep", "30"]
enabled = true
"#,
    );

    let output = daemon.sv(&["--format", "json", "show", "sleeper"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid json");
    assert_eq!(value["service_name"], "sleeper");
}

#[test]
fn help_lists_every_subcommand() {
    let bin = assert_cmd::cargo::cargo_bin("sv");
    let output = std::process::Command::new(bin).arg("--help").output().expect("run sv --help");
    let text = stdout(&output);
    for name in ["ps", "show", "events", "stop"] {
        assert!(text.contains(name), "--help output missing {name}:\n{text}");
    }
}
