//! Shared harness: spawns a real `svd` against a temp state dir and talks to
//! it through the real `sv` binary, exactly as an operator would.

use std::path::PathBuf;
use std::process::{Child, Command, Output};
use std::time::Duration;

pub struct DaemonHandle {
    child: Child,
    socket_path: PathBuf,
    _dir: tempfile::TempDir,
}

impl DaemonHandle {
    /// Starts `svd` with `fleet_body` appended after a generated `[daemon]`
    /// table pointing at a fresh temp directory.
    pub fn start(fleet_body: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let state_dir = dir.path().join("state");
        let config_path = dir.path().join("fleet.toml");
        let config = format!(
            "[daemon]\nstate_dir = {:?}\n\n{fleet_body}",
            state_dir.to_string_lossy()
        );
        std::fs::write(&config_path, config).expect("write fleet config");

        let bin = assert_cmd::cargo::cargo_bin("svd");
        let child = Command::new(bin)
            .arg("--config")
            .arg(&config_path)
            .spawn()
            .expect("spawn svd");

        let socket_path = state_dir.join("sv.sock");
        wait_for_socket(&socket_path);

        Self { child, socket_path, _dir: dir }
    }

    pub fn sv(&self, args: &[&str]) -> Output {
        let bin = assert_cmd::cargo::cargo_bin("sv");
        Command::new(bin)
            .arg("--socket")
            .arg(&self.socket_path)
            .args(args)
            .output()
            .expect("run sv")
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn wait_for_socket(path: &std::path::Path) {
    for _ in 0..200 {
        if path.exists() {
            return;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("daemon socket never appeared at {path:?}");
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
