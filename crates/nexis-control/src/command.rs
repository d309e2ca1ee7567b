//! Subprocess building and bounded execution.

use nexis_core::error::NexisError;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Build a command that runs `line` through the platform shell.
///
/// Configured launch commands may carry arguments, quoting, or `start` verbs,
/// so they are handed to the shell rather than split here.
pub(crate) fn shell_command(line: &str) -> Command {
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(line);
        cmd
    }
    #[cfg(not(target_os = "windows"))]
    {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

/// Build a direct program invocation.
pub(crate) fn program(program: &str, args: &[&str]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd
}

/// Start a command and let it run on its own (GUI applications).
///
/// Only the spawn itself is bounded; the child is not waited for.
pub(crate) fn spawn_detached(mut cmd: Command, label: &str) -> Result<(), NexisError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false);
    debug!("spawning {label}");
    cmd.spawn()
        .map(|_child| ())
        .map_err(|e| NexisError::Launcher(format!("failed to start {label}: {e}")))
}

/// Run a command to completion within `timeout`.
///
/// Returns the exit status; a non-zero exit is not an error here because
/// some callers (process termination) read meaning into it.
pub(crate) async fn run_with_timeout(
    mut cmd: Command,
    label: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus, NexisError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("executing {label}");
    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| {
            NexisError::Launcher(format!("{label} timed out after {}s", timeout.as_secs()))
        })?
        .map_err(|e| NexisError::Launcher(format!("failed to run {label}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{label} exited with {}: {}", output.status, stderr.trim());
    }

    Ok(output.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_uses_platform_shell() {
        let cmd = shell_command("echo hi");
        let program = cmd.as_std().get_program().to_string_lossy().to_string();
        if cfg!(target_os = "windows") {
            assert_eq!(program, "cmd");
        } else {
            assert_eq!(program, "sh");
        }
    }

    #[test]
    fn test_program_keeps_args() {
        let cmd = program("pkill", &["-x", "firefox"]);
        let args: Vec<String> = cmd
            .as_std()
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(args, vec!["-x", "firefox"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_status() {
        let ok = run_with_timeout(shell_command("exit 0"), "true", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(ok.success());
        let failed = run_with_timeout(shell_command("exit 3"), "false", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(failed.code(), Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_times_out() {
        let started = std::time::Instant::now();
        let err = run_with_timeout(shell_command("sleep 5"), "sleep", Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_missing_program_is_error() {
        let err = run_with_timeout(
            program("__nexis_no_such_program__", &[]),
            "missing",
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, NexisError::Launcher(_)));
    }
}
