//! Adapter error types

use thiserror::Error;

/// Errors raised while driving the rclone binary
#[derive(Debug, Error)]
pub enum RcloneError {
    /// The binary could not be found on PATH (or at the configured path)
    #[error("rclone not found; install it with: curl https://rclone.org/install.sh | sudo bash")]
    NotInstalled,

    /// The subprocess did not finish within the allowed time
    #[error("rclone timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The subprocess ran and exited unsuccessfully
    ///
    /// Carries the raw stderr: its text is the only error detail the tool
    /// exposes, and downstream classification matches on it.
    #[error("rclone exited with status {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Failed { code: Option<i32>, stderr: String },

    /// Spawning or talking to the subprocess failed
    #[error("failed to run rclone: {0}")]
    Io(#[from] std::io::Error),

    /// stdout did not have the expected shape
    #[error("could not parse rclone output: {0}")]
    Parse(String),
}
