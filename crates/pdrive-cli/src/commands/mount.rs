//! Mount commands - Mount and unmount the remote filesystem
//!
//! `pdrive mount` asks the tool to mount the remote and daemonize; the
//! mount outlives this process. `pdrive unmount` releases it again via
//! fusermount, since the daemonized tool is no longer ours to signal.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use pdrive_core::ports::remote_backend::{IRemoteBackend, MountOptions, MountRequest};
use pdrive_rclone::RcloneBackend;

use crate::CliContext;

/// Mount the remote as a filesystem
#[derive(Debug, Args)]
pub struct MountCommand {
    /// Override the default mount point path
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Remote folder to mount (root when omitted)
    #[arg(long, value_name = "FOLDER")]
    pub folder: Option<String>,
}

impl MountCommand {
    /// Execute the mount command
    ///
    /// Steps:
    /// 1. Determine and prepare the mount point (create if missing,
    ///    refuse a non-empty directory)
    /// 2. Check FUSE availability
    /// 3. Ask the tool to mount and daemonize
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let fmt = ctx.formatter();
        let remote = ctx.remote_name()?;
        let backend = RcloneBackend::from_config(&ctx.config);

        // Step 1: mount point - flag overrides config
        let mount_point = self
            .path
            .clone()
            .unwrap_or_else(|| expand_tilde(&ctx.config.mount.mount_point));

        info!(mount_point = %mount_point.display(), "Using mount point");

        if !mount_point.exists() {
            fmt.info(&format!(
                "Creating mount point directory: {}",
                mount_point.display()
            ));
            tokio::fs::create_dir_all(&mount_point)
                .await
                .context("Failed to create mount point directory")?;
        }

        if !is_mount_point_suitable(&mount_point).await? {
            fmt.error(&format!(
                "Mount point '{}' is not empty. Please use an empty directory.",
                mount_point.display()
            ));
            return Ok(());
        }

        // Step 2: FUSE availability
        if !Path::new("/dev/fuse").exists() {
            fmt.error("FUSE is not available. /dev/fuse does not exist.");
            fmt.info("Hint: Install FUSE with 'sudo apt install fuse3' or 'sudo dnf install fuse3'");
            return Ok(());
        }

        // Step 3: mount via the tool
        let target = match &self.folder {
            Some(folder) => remote.join(folder),
            None => remote.root(),
        };

        fmt.info(&format!("Mounting {} at {}...", target, mount_point.display()));

        let request = MountRequest {
            remote: target,
            mount_point: mount_point.clone(),
            options: MountOptions {
                cache_mode: ctx.config.mount.cache_mode.clone(),
                daemonize: ctx.config.mount.daemonize,
            },
        };

        match backend.mount(&request).await {
            Ok(()) => {
                fmt.success("Drive mounted successfully!");
                fmt.info(&format!("Access your files at: {}", mount_point.display()));
                fmt.info(&format!(
                    "To unmount, run: pdrive unmount --path {}",
                    mount_point.display()
                ));
            }
            Err(e) => {
                fmt.error(&format!("Mount failed: {e}"));
            }
        }

        Ok(())
    }
}

/// Unmount the remote filesystem
#[derive(Debug, Args)]
pub struct UnmountCommand {
    /// Force unmount even if the filesystem is busy
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Override the default mount point path
    #[arg(long, short = 'p', value_name = "PATH")]
    pub path: Option<PathBuf>,
}

impl UnmountCommand {
    /// Execute the unmount command
    ///
    /// Uses `fusermount3 -u <path>` (or `fusermount -u <path>`) to unmount.
    /// With --force, adds `-z` for a lazy unmount.
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let fmt = ctx.formatter();

        let mount_point = self
            .path
            .clone()
            .unwrap_or_else(|| expand_tilde(&ctx.config.mount.mount_point));

        info!(mount_point = %mount_point.display(), "Unmounting filesystem");

        if !mount_point.exists() {
            fmt.error(&format!(
                "Mount point '{}' does not exist",
                mount_point.display()
            ));
            return Ok(());
        }

        // Try fusermount3 first (FUSE 3), fall back to fusermount (FUSE 2)
        let fusermount = if which_exists("fusermount3") {
            "fusermount3"
        } else {
            "fusermount"
        };

        let mut args = vec!["-u"];
        if self.force {
            // -z for lazy unmount (unmount even if busy)
            args.push("-z");
        }

        let output = Command::new(fusermount)
            .args(&args)
            .arg(&mount_point)
            .output()
            .context("Failed to execute fusermount. Is FUSE installed?")?;

        if output.status.success() {
            fmt.success(&format!(
                "Filesystem unmounted from {}",
                mount_point.display()
            ));
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_msg = stderr.trim();

        if error_msg.contains("not mounted") || error_msg.contains("no such file") {
            fmt.error(&format!(
                "Filesystem is not mounted at {}",
                mount_point.display()
            ));
        } else if error_msg.contains("Device or resource busy") {
            fmt.error(&format!(
                "Filesystem is busy. Close any programs using files in {} and try again.",
                mount_point.display()
            ));
            fmt.info("Hint: Use --force to perform a lazy unmount");
        } else {
            fmt.error(&format!("Failed to unmount: {error_msg}"));
        }

        Ok(())
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Expand tilde (~) in a path string to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Check if a mount point is suitable (empty or contains only hidden files)
async fn is_mount_point_suitable(path: &Path) -> Result<bool> {
    let mut entries = tokio::fs::read_dir(path)
        .await
        .context("Failed to read mount point directory")?;

    while let Some(entry) = entries.next_entry().await? {
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy();

        if !name.starts_with('.') {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Check if a command exists in PATH
fn which_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

// ============================================================================
// Tests
// ============================================================================
