//! Script execution module
//!
//! Spawns the configured interpreter against a script file and captures its
//! output. The script path is passed as a discrete argument, never through a
//! shell.

use std::path::Path;
use tokio::process::Command;

/// Result of running a script: exactly one of the two variants, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The child exited with status zero; carries the captured stdout.
    Success { stdout: String },
    /// The child exited nonzero, or could not be spawned at all; carries the
    /// captured stderr (or the OS error text when there is no stderr).
    Failure { stderr: String },
}

impl ExecOutcome {
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Run `interpreter <script>` and capture its output.
///
/// The handler awaits the child without blocking the runtime; other requests
/// are served while the child runs. Once spawned, the child always runs to
/// completion: there is no timeout and no kill path.
///
/// Every failure class collapses into `Failure`: a missing script, a missing
/// interpreter, a script that raises, or a permission error all surface as
/// the text the caller would have seen on stderr.
pub async fn run_script(interpreter: &str, script: &Path) -> ExecOutcome {
    let result = Command::new(interpreter).arg(script).output().await;

    match result {
        Ok(output) if output.status.success() => ExecOutcome::Success {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        },
        Ok(output) => ExecOutcome::Failure {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        },
        Err(e) => ExecOutcome::Failure {
            stderr: format!("failed to start '{interpreter}': {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests drive the executor with `sh` so the suite runs without a Python
    // installation; the executor itself is interpreter-agnostic.

    #[tokio::test]
    async fn test_success_captures_exact_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ok.sh");
        std::fs::write(&script, "echo hello\n").unwrap();

        let outcome = run_script("sh", &script).await;
        assert_eq!(
            outcome,
            ExecOutcome::Success {
                stdout: "hello\n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_captures_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("bad.sh");
        std::fs::write(&script, "echo boom >&2\nexit 3\n").unwrap();

        let outcome = run_script("sh", &script).await;
        assert_eq!(
            outcome,
            ExecOutcome::Failure {
                stderr: "boom\n".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_script_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("no-such-script.sh");

        let outcome = run_script("sh", &script).await;
        match outcome {
            ExecOutcome::Failure { stderr } => assert!(!stderr.is_empty()),
            ExecOutcome::Success { .. } => panic!("missing script must not succeed"),
        }
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("ok.sh");
        std::fs::write(&script, "echo hello\n").unwrap();

        let outcome = run_script("definitely-not-an-installed-interpreter", &script).await;
        match outcome {
            ExecOutcome::Failure { stderr } => {
                assert!(stderr.contains("failed to start"));
            }
            ExecOutcome::Success { .. } => panic!("missing interpreter must not succeed"),
        }
    }
}
