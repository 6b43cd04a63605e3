//! Auth commands - Link, Unlink, and Status for the ProtonDrive account
//!
//! Provides the `pdrive auth` CLI subcommands which:
//! 1. `login`  - Collects credentials interactively, then runs the link
//!    flow (replace config, obscure password, create config, verify).
//! 2. `logout` - Deletes the remote configuration from the tool.
//! 3. `status` - Probes the link and shows the stored account name.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use pdrive_core::domain::credentials::Credentials;
use pdrive_core::domain::newtypes::Email;
use pdrive_core::ports::remote_backend::IRemoteBackend;
use pdrive_core::usecases::{
    LinkAccountUseCase, LinkOutcome, LinkState, LinkStatusUseCase, SavedLoginUseCase,
};
use pdrive_rclone::RcloneBackend;

use crate::prompt;
use crate::CliContext;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Link a ProtonDrive account
    Login {
        /// Account email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Remove the stored remote configuration
    Logout,
    /// Check link status
    Status,
}

impl AuthCommand {
    pub async fn execute(&self, ctx: &CliContext) -> Result<()> {
        match self {
            AuthCommand::Login { email } => execute_login(ctx, email.as_deref()).await,
            AuthCommand::Logout => execute_logout(ctx).await,
            AuthCommand::Status => execute_status(ctx).await,
        }
    }
}

/// Execute the login flow:
/// 1. Prefill the email from the tool's stored config when possible
/// 2. Prompt for anything missing (password is never taken from argv)
/// 3. Run the link use case and report the classified outcome
async fn execute_login(ctx: &CliContext, cli_email: Option<&str>) -> Result<()> {
    let fmt = ctx.formatter();
    let remote = ctx.remote_name()?;
    let backend: Arc<dyn IRemoteBackend> = Arc::new(RcloneBackend::from_config(&ctx.config));

    // Step 1: email - flag, then saved config, then prompt
    let saved = SavedLoginUseCase::new(backend.clone()).recall(&remote).await;
    let email_input = match cli_email {
        Some(email) => email.to_string(),
        None => {
            let prompt_text = match &saved {
                Some(saved) => format!("Email [{saved}]: "),
                None => "Email: ".to_string(),
            };
            let typed = prompt::prompt_line(&prompt_text)?;
            if typed.is_empty() {
                saved.clone().context("No email entered")?
            } else {
                typed
            }
        }
    };
    let email = Email::new(email_input).context("Invalid email address")?;

    // Step 2: secrets
    let password = prompt::prompt_password("Password: ")?;
    let code = prompt::prompt_line("Two-factor code (leave empty if disabled): ")?;

    let credentials = Credentials::new(email.clone(), password, Some(code))
        .context("Password must not be empty")?;

    info!(email = %email, remote = %remote, "Linking account");
    fmt.info("Configuring ProtonDrive...");

    // Step 3: run the flow; progress lines land in the formatter
    let verify_delay = std::time::Duration::from_secs(ctx.config.link.verify_delay);
    let outcome = LinkAccountUseCase::new(backend)
        .link(
            &remote,
            &ctx.config.remote.backend,
            credentials,
            verify_delay,
            |line| fmt.severity(line.severity, &line.message),
        )
        .await;

    // Step 4: report
    match outcome {
        LinkOutcome::Linked => {
            fmt.success("Connection successful!");
            fmt.success(&format!("Linked as {email}"));
            fmt.info("ProtonDrive is ready to use");
        }
        LinkOutcome::TwoFactorRejected { detail } => {
            fmt.error(&detail);
            fmt.warn("Please enter a valid two-factor code and try again");
        }
        LinkOutcome::CredentialsRejected { detail } => {
            fmt.error(&detail);
            fmt.error("Invalid credentials. Please check your email and password");
        }
        LinkOutcome::Failed { detail } => {
            fmt.error(&detail);
        }
    }

    Ok(())
}

/// Execute logout: delete the remote configuration entry
async fn execute_logout(ctx: &CliContext) -> Result<()> {
    let fmt = ctx.formatter();
    let remote = ctx.remote_name()?;
    let backend = RcloneBackend::from_config(&ctx.config);

    info!(remote = %remote, "Removing remote configuration");

    match backend.delete_config(&remote).await {
        Ok(()) => {
            fmt.success("Logged out");
            fmt.info("The stored remote configuration was removed");
        }
        Err(e) => {
            fmt.error(&format!("Could not remove configuration: {e}"));
        }
    }

    Ok(())
}

/// Execute status check: probe the link and show the stored account
async fn execute_status(ctx: &CliContext) -> Result<()> {
    let fmt = ctx.formatter();
    let remote = ctx.remote_name()?;
    let backend: Arc<dyn IRemoteBackend> = Arc::new(RcloneBackend::probe_variant(&ctx.config));

    let state = LinkStatusUseCase::new(backend.clone()).probe(&remote).await;
    let account = SavedLoginUseCase::new(backend).recall(&remote).await;

    if matches!(ctx.format, crate::OutputFormat::Json) {
        fmt.print_json(&serde_json::json!({
            "remote": remote.as_str(),
            "state": state,
            "account": account,
        }));
        return Ok(());
    }

    match state {
        LinkState::Connected => fmt.success(&format!("{state}")),
        LinkState::ConfigBroken => fmt.warn(&format!("{state}")),
        LinkState::NotConfigured => {
            fmt.error(&format!("{state}"));
            fmt.info("Run 'pdrive auth login' to link your account");
        }
    }

    if let Some(account) = account {
        fmt.info(&format!("Account: {account}"));
    }

    Ok(())
}
