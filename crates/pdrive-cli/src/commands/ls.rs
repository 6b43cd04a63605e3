//! Ls command - List directories on the remote

use anyhow::Result;
use clap::Args;
use tracing::info;

use pdrive_core::ports::remote_backend::IRemoteBackend;
use pdrive_rclone::RcloneBackend;

use crate::CliContext;

/// List directories on the remote
#[derive(Debug, Args)]
pub struct LsCommand {
    /// Remote folder to list (root when omitted)
    pub path: Option<String>,
}

impl LsCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let fmt = ctx.formatter();
        let remote = ctx.remote_name()?;
        let backend = RcloneBackend::from_config(&ctx.config);

        let target = match &self.path {
            Some(path) => remote.join(path),
            None => remote.root(),
        };

        info!(target = %target, "Listing remote directory");
        fmt.info(&format!("Browsing {target}..."));

        let entries = match backend.list_dir(&target).await {
            Ok(entries) => entries,
            Err(e) => {
                fmt.error(&format!("Browse failed: {e}"));
                return Ok(());
            }
        };

        if matches!(ctx.format, crate::OutputFormat::Json) {
            let dirs: Vec<serde_json::Value> = entries
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "name": d.name,
                        "modified": d.modified.map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string()),
                    })
                })
                .collect();
            fmt.print_json(&serde_json::json!({
                "path": target.as_arg(),
                "directories": dirs,
            }));
            return Ok(());
        }

        if entries.is_empty() {
            fmt.info("No directories found");
            return Ok(());
        }

        for entry in &entries {
            match entry.modified {
                Some(modified) => fmt.plain(&format!(
                    "{}  {}",
                    modified.format("%Y-%m-%d %H:%M"),
                    entry.name
                )),
                None => fmt.plain(&entry.name),
            }
        }

        Ok(())
    }
}
