//! Doctor command - Check the external tool and mount prerequisites
//!
//! Probes everything pdrive depends on without changing any state:
//! 1. The rclone binary runs and reports a version
//! 2. The configured remote exists (informational)
//! 3. FUSE is available for mounting (`/dev/fuse`, fusermount)

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use clap::Args;
use tracing::info;

use pdrive_core::ports::remote_backend::IRemoteBackend;
use pdrive_rclone::RcloneBackend;

use crate::CliContext;

/// Check the external tool and mount prerequisites
#[derive(Debug, Args)]
pub struct DoctorCommand {}

impl DoctorCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let fmt = ctx.formatter();
        let backend = RcloneBackend::from_config(&ctx.config);

        info!("Running environment checks");

        let mut findings = Vec::new();

        // Check 1: the tool itself
        let tool_ok = match backend.probe_version().await {
            Ok(version) => {
                fmt.success(&format!("rclone is installed ({})", version.raw));
                findings.push(("tool", true, version.raw));
                true
            }
            Err(e) => {
                fmt.error(&format!("rclone not usable: {e}"));
                fmt.info("Install with: curl https://rclone.org/install.sh | sudo bash");
                findings.push(("tool", false, e.to_string()));
                false
            }
        };

        // Check 2: the managed remote (only meaningful when the tool runs)
        if tool_ok {
            let remote = ctx.remote_name()?;
            match backend.list_remotes().await {
                Ok(remotes) if remotes.iter().any(|r| r.name == remote.as_str()) => {
                    fmt.success(&format!("Remote '{remote}' is configured"));
                    findings.push(("remote", true, remote.as_str().to_string()));
                }
                Ok(_) => {
                    fmt.warn(&format!("Remote '{remote}' is not configured yet"));
                    fmt.info("Run 'pdrive auth login' to link your account");
                    findings.push(("remote", false, "not configured".to_string()));
                }
                Err(e) => {
                    fmt.error(&format!("Could not list remotes: {e}"));
                    findings.push(("remote", false, e.to_string()));
                }
            }
        }

        // Check 3: FUSE, needed only for mount
        if Path::new("/dev/fuse").exists() {
            fmt.success("FUSE is available (/dev/fuse)");
            findings.push(("fuse", true, "/dev/fuse".to_string()));
        } else {
            fmt.warn("FUSE is not available; 'pdrive mount' will not work");
            fmt.info("Hint: Install FUSE with 'sudo apt install fuse3' or 'sudo dnf install fuse3'");
            findings.push(("fuse", false, "/dev/fuse missing".to_string()));
        }

        let fusermount = ["fusermount3", "fusermount"]
            .iter()
            .find(|cmd| which_exists(cmd));
        match fusermount {
            Some(cmd) => {
                fmt.success(&format!("{cmd} is available"));
                findings.push(("fusermount", true, cmd.to_string()));
            }
            None => {
                fmt.warn("fusermount not found; 'pdrive unmount' will not work");
                findings.push(("fusermount", false, "not found".to_string()));
            }
        }

        if matches!(ctx.format, crate::OutputFormat::Json) {
            let checks: Vec<serde_json::Value> = findings
                .iter()
                .map(|(name, ok, detail)| {
                    serde_json::json!({"check": name, "ok": ok, "detail": detail})
                })
                .collect();
            fmt.print_json(&serde_json::json!({ "checks": checks }));
        }

        Ok(())
    }
}

/// Check if a command exists in PATH
fn which_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
