//! Remote commands - Inspect the tool's configured remotes
//!
//! `pdrive remote list` shows every remote the tool knows about;
//! `pdrive remote show` dumps the managed remote's stored configuration
//! with secret values redacted.

use anyhow::Result;
use clap::Subcommand;

use pdrive_core::ports::remote_backend::IRemoteBackend;
use pdrive_rclone::RcloneBackend;

use crate::CliContext;

#[derive(Debug, Subcommand)]
pub enum RemoteCommand {
    /// List all configured remotes
    List,
    /// Show the managed remote's stored configuration (secrets redacted)
    Show,
}

impl RemoteCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            RemoteCommand::List => execute_list(ctx).await,
            RemoteCommand::Show => execute_show(ctx).await,
        }
    }
}

async fn execute_list(ctx: &CliContext) -> Result<()> {
    let fmt = ctx.formatter();
    let backend = RcloneBackend::from_config(&ctx.config);
    let managed = ctx.remote_name()?;

    let remotes = match backend.list_remotes().await {
        Ok(remotes) => remotes,
        Err(e) => {
            fmt.error(&format!("Could not list remotes: {e}"));
            return Ok(());
        }
    };

    if matches!(ctx.format, crate::OutputFormat::Json) {
        let names: Vec<&str> = remotes.iter().map(|r| r.name.as_str()).collect();
        fmt.print_json(&serde_json::json!({
            "remotes": names,
            "managed": managed.as_str(),
        }));
        return Ok(());
    }

    if remotes.is_empty() {
        fmt.info("No remotes configured");
        return Ok(());
    }

    for remote in &remotes {
        if remote.name == managed.as_str() {
            fmt.success(&format!("{} (managed by pdrive)", remote.name));
        } else {
            fmt.info(&remote.name);
        }
    }

    Ok(())
}

async fn execute_show(ctx: &CliContext) -> Result<()> {
    let fmt = ctx.formatter();
    let backend = RcloneBackend::from_config(&ctx.config);
    let remote = ctx.remote_name()?;

    let dump = match backend.show_config(&remote).await {
        Ok(dump) => dump,
        Err(e) => {
            fmt.error(&format!("Could not read configuration for '{remote}': {e}"));
            fmt.info("Run 'pdrive auth login' to link your account");
            return Ok(());
        }
    };

    let redacted = dump.redacted();

    if matches!(ctx.format, crate::OutputFormat::Json) {
        let map: serde_json::Map<String, serde_json::Value> = redacted
            .into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect();
        fmt.print_json(&serde_json::json!({
            "remote": remote.as_str(),
            "config": map,
        }));
        return Ok(());
    }

    fmt.success(&format!("[{remote}]"));
    for (key, value) in redacted {
        fmt.info(&format!("{key} = {value}"));
    }

    Ok(())
}
