//! Sync command - Sync a local directory to the remote
//!
//! Streams the tool's output lines as they arrive, classified into the
//! shared severities, then prints a final verdict from the exit status.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::mpsc;
use tracing::info;

use pdrive_core::domain::console::{classify_transfer_line, Severity};
use pdrive_core::ports::remote_backend::{IRemoteBackend, SyncOptions, SyncRequest};
use pdrive_rclone::RcloneBackend;

use crate::CliContext;

/// Sync a local directory to the remote
#[derive(Debug, Args)]
pub struct SyncCommand {
    /// Local directory to sync
    pub source: PathBuf,

    /// Remote folder to sync into (root when omitted)
    pub dest: Option<String>,
}

impl SyncCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        let fmt = ctx.formatter();
        let remote = ctx.remote_name()?;
        let backend = RcloneBackend::from_config(&ctx.config);

        if !self.source.is_dir() {
            fmt.error(&format!(
                "'{}' is not a directory",
                self.source.display()
            ));
            return Ok(());
        }

        let dest = match &self.dest {
            Some(path) => remote.join(path),
            None => remote.root(),
        };

        let request = SyncRequest {
            source: self
                .source
                .canonicalize()
                .context("Could not resolve source directory")?,
            dest: dest.clone(),
            options: SyncOptions {
                verbose: ctx.config.sync.verbose,
                progress: ctx.config.sync.progress,
            },
        };

        info!(source = %request.source.display(), dest = %dest, "Starting sync");
        fmt.info(&format!(
            "Syncing {} -> {}",
            request.source.display(),
            dest
        ));

        // Print lines as they arrive while the subprocess runs
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let printer = {
            let fmt = ctx.formatter();
            tokio::spawn(async move {
                while let Some(line) = rx.recv().await {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match classify_transfer_line(&line) {
                        Severity::Error => fmt.error(&line),
                        Severity::Success => fmt.success(&line),
                        _ => fmt.plain(&line),
                    }
                }
            })
        };

        let outcome = backend.sync(&request, tx).await;
        let _ = printer.await;

        match outcome {
            Ok(outcome) if outcome.success => {
                fmt.success("Sync completed!");
            }
            Ok(outcome) => {
                fmt.error(&format!(
                    "Sync failed (exit status {})",
                    outcome
                        .exit_code
                        .map_or_else(|| "signal".to_string(), |c| c.to_string())
                ));
            }
            Err(e) => {
                fmt.error(&format!("Sync error: {e}"));
            }
        }

        Ok(())
    }
}
