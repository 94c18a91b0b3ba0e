use super::*;

#[test]
fn pid_expected_only_while_active() {
    assert!(!State::Stopped.has_pid());
    assert!(State::Starting.has_pid());
    assert!(State::Running.has_pid());
    assert!(State::Stopping.has_pid());
    assert!(!State::Failed.has_pid());
    assert!(!State::Backoff.has_pid());
}

#[test]
fn display_matches_lower_case_name() {
    assert_eq!(State::Running.to_string(), "running");
    assert_eq!(State::Failed.to_string(), "failed");
}
