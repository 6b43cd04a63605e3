//! Subprocess runner for the rclone binary
//!
//! One short-lived child per operation, with piped output, a hard timeout,
//! and tracing around each invocation. Argument values are never logged:
//! they can carry the account name, an obscured password, or (for the
//! obscure subcommand) the plaintext secret itself.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info};

use pdrive_core::domain::newtypes::RunId;

use crate::error::RcloneError;

/// Captured result of one finished invocation
#[derive(Debug, Clone)]
pub struct CmdOutput {
    /// Exit code, absent when the child died to a signal
    pub code: Option<i32>,
    /// Whether the child exited successfully
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    /// stderr with surrounding whitespace removed, for display
    #[must_use]
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Runs rclone subcommands as child processes
#[derive(Debug, Clone)]
pub struct RcloneRunner {
    binary: PathBuf,
}

impl RcloneRunner {
    /// Create a runner for the given binary name or path
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The binary this runner invokes
    #[must_use]
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run a subcommand to completion, capturing both streams
    ///
    /// A child still running when `allowed` elapses is killed and reported
    /// as [`RcloneError::Timeout`]. A missing binary is reported as
    /// [`RcloneError::NotInstalled`].
    pub async fn run(&self, args: &[String], allowed: Duration) -> Result<CmdOutput, RcloneError> {
        let run_id = RunId::new();
        let subcommand = args.first().map(String::as_str).unwrap_or("");
        info!(%run_id, binary = %self.binary.display(), %subcommand, "Invoking tool");

        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::classify_spawn_error(e))?;

        // Dropping the future on timeout drops the child, which kills it
        // (kill_on_drop above).
        let output = match timeout(allowed, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(RcloneError::Io(e)),
            Err(_) => {
                info!(%run_id, %subcommand, "Tool timed out");
                return Err(RcloneError::Timeout {
                    seconds: allowed.as_secs(),
                });
            }
        };

        let result = CmdOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        info!(
            %run_id,
            %subcommand,
            code = ?result.code,
            success = result.success,
            "Tool finished"
        );

        Ok(result)
    }

    /// Like [`run`](Self::run), but a non-zero exit becomes
    /// [`RcloneError::Failed`] carrying the trimmed stderr
    pub async fn run_checked(
        &self,
        args: &[String],
        allowed: Duration,
    ) -> Result<CmdOutput, RcloneError> {
        let output = self.run(args, allowed).await?;
        if output.success {
            Ok(output)
        } else {
            Err(RcloneError::Failed {
                code: output.code,
                stderr: output.stderr_trimmed().to_string(),
            })
        }
    }

    /// Run a subcommand, forwarding its output lines as they arrive
    ///
    /// stdout and stderr are read concurrently and interleaved into
    /// `lines` in arrival order. Returns when the child exits; there is no
    /// timeout, because a long transfer is making progress for as long as
    /// it keeps printing.
    pub async fn stream(
        &self,
        args: &[String],
        lines: mpsc::UnboundedSender<String>,
    ) -> Result<CmdOutput, RcloneError> {
        let run_id = RunId::new();
        let subcommand = args.first().map(String::as_str).unwrap_or("");
        info!(%run_id, binary = %self.binary.display(), %subcommand, "Invoking tool (streaming)");

        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Self::classify_spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RcloneError::Io(std::io::Error::other("child stdout unavailable")))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RcloneError::Io(std::io::Error::other("child stderr unavailable")))?;

        let out_task = tokio::spawn(forward_lines(stdout, lines.clone()));
        let err_task = tokio::spawn(forward_lines(stderr, lines));

        let status = child.wait().await?;

        // Drain whatever the readers still hold before reporting the exit
        let _ = out_task.await;
        let _ = err_task.await;

        info!(%run_id, %subcommand, code = ?status.code(), "Tool finished (streaming)");

        Ok(CmdOutput {
            code: status.code(),
            success: status.success(),
            stdout: String::new(),
            stderr: String::new(),
        })
    }

    fn classify_spawn_error(e: std::io::Error) -> RcloneError {
        if e.kind() == std::io::ErrorKind::NotFound {
            RcloneError::NotInstalled
        } else {
            RcloneError::Io(e)
        }
    }
}

/// Read lines from a child stream into the channel until EOF
async fn forward_lines<R>(reader: R, lines: mpsc::UnboundedSender<String>)
where
    R: tokio::io::AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader).lines();
    loop {
        match reader.next_line().await {
            Ok(Some(line)) => {
                if lines.send(line).is_err() {
                    // Receiver went away; keep draining so the child
                    // doesn't block on a full pipe
                    debug!("Output receiver dropped; discarding remaining lines");
                    while let Ok(Some(_)) = reader.next_line().await {}
                    return;
                }
            }
            Ok(None) => return,
            Err(e) => {
                debug!(error = %e, "Error reading tool output stream");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    use super::*;

    /// Write an executable shell script and return its path
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        writeln!(file, "{body}").unwrap();
        let mut perms = file.metadata().unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[tokio::test]
    async fn run_captures_stdout_and_exit() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake", "echo hello");
        let runner = RcloneRunner::new(bin);

        let out = runner
            .run(&["version".to_string()], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(out.success);
        assert_eq!(out.code, Some(0));
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn run_captures_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake", "echo boom >&2; exit 3");
        let runner = RcloneRunner::new(bin);

        let out = runner
            .run(&[], Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stderr_trimmed(), "boom");
    }

    #[tokio::test]
    async fn run_checked_maps_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake", "echo nope >&2; exit 1");
        let runner = RcloneRunner::new(bin);

        let err = runner
            .run_checked(&[], Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RcloneError::Failed { code: Some(1), ref stderr } if stderr == "nope"
        ));
    }

    #[tokio::test]
    async fn run_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake", "sleep 10");
        let runner = RcloneRunner::new(bin);

        let err = runner
            .run(&[], Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, RcloneError::Timeout { .. }));
    }

    #[tokio::test]
    async fn missing_binary_reports_not_installed() {
        let runner = RcloneRunner::new("/nonexistent/definitely-not-rclone");
        let err = runner
            .run(&[], Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RcloneError::NotInstalled));
    }

    #[tokio::test]
    async fn stream_forwards_both_streams() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(
            dir.path(),
            "fake",
            "echo out-line; echo err-line >&2; echo done",
        );
        let runner = RcloneRunner::new(bin);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let out = runner.stream(&[], tx).await.unwrap();
        assert!(out.success);

        let mut collected = Vec::new();
        while let Some(line) = rx.recv().await {
            collected.push(line);
        }
        assert!(collected.contains(&"out-line".to_string()));
        assert!(collected.contains(&"err-line".to_string()));
        assert!(collected.contains(&"done".to_string()));
    }

    #[tokio::test]
    async fn stream_reports_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let bin = script(dir.path(), "fake", "echo partial; exit 2");
        let runner = RcloneRunner::new(bin);

        let (tx, _rx) = mpsc::unbounded_channel();
        let out = runner.stream(&[], tx).await.unwrap();
        assert!(!out.success);
        assert_eq!(out.code, Some(2));
    }
}
