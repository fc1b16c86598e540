//! Shared helpers for integration tests.
//!
//! [`LeaseLensProcess`] drives the compiled binary either to completion
//! (`spawn_command`) or interactively over piped stdin (`spawn_session`).

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, ChildStdin, Command};

/// A spawned `leaselens` process under test.
pub struct LeaseLensProcess {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl LeaseLensProcess {
    /// Returns the path to a fixture file under `tests/fixtures/`.
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    /// Runs the binary to completion with the given arguments.
    pub fn spawn_command(args: &[&str]) -> Output {
        std::process::Command::new(env!("CARGO_BIN_EXE_leaselens"))
            .args(args)
            .output()
            .expect("failed to run leaselens binary")
    }

    /// Runs the binary to completion with extra environment variables.
    pub fn spawn_command_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
        std::process::Command::new(env!("CARGO_BIN_EXE_leaselens"))
            .args(args)
            .envs(envs.iter().copied())
            .output()
            .expect("failed to run leaselens binary")
    }

    /// Spawns an interactive session with piped stdin/stdout.
    ///
    /// Logging is silenced with `--quiet` so stdout assertions see only
    /// session output.
    pub fn spawn_session(args: &[&str]) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_leaselens"))
            .arg("--quiet")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn leaselens binary");
        let stdin = child.stdin.take();
        Self { child, stdin }
    }

    /// Sends one command line to the session.
    pub async fn send_line(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .expect("failed to write to session stdin");
        stdin.flush().await.expect("failed to flush session stdin");
    }

    /// Closes stdin and collects the session's output.
    ///
    /// Panics if the process does not exit within five seconds; the
    /// session must treat the EOF as a clean shutdown request.
    pub async fn finish(mut self) -> Output {
        drop(self.stdin.take());
        tokio::time::timeout(Duration::from_secs(5), self.child.wait_with_output())
            .await
            .expect("session did not exit within 5s of stdin closing")
            .expect("failed to collect session output")
    }
}

/// Fast engine and chat timings so interactive tests finish quickly.
pub const FAST_TIMINGS: &[&str] = &[
    "--step-interval",
    "10ms",
    "--finalize-delay",
    "10ms",
    "--reply-delay",
    "10ms",
];

/// Sleeps long enough for a fast-timing analysis or reply to land.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(700)).await;
}
