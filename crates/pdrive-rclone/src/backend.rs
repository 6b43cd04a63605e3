//! The rclone implementation of the remote backend port

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;

use pdrive_core::config::Config;
use pdrive_core::domain::newtypes::{RemoteName, RemotePath};
use pdrive_core::ports::remote_backend::{
    ConfigDump, IRemoteBackend, MountRequest, RemoteDirEntry, RemoteEntry, SyncOutcome,
    SyncRequest, ToolVersion,
};

use crate::args;
use crate::invoke::RcloneRunner;
use crate::parse;

/// Per-operation time budgets
#[derive(Debug, Clone, Copy)]
pub struct RcloneTimeouts {
    /// version / listremotes / config show
    pub probe: Duration,
    /// config delete / obscure
    pub config: Duration,
    /// config create
    pub create: Duration,
    /// lsd
    pub list: Duration,
    /// mount (time to daemonize, not mount lifetime)
    pub mount: Duration,
}

impl RcloneTimeouts {
    /// Budgets from the tool section of the configuration file
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            probe: Duration::from_secs(config.tool.probe_timeout),
            config: Duration::from_secs(config.tool.config_timeout),
            create: Duration::from_secs(config.tool.create_timeout),
            list: Duration::from_secs(config.tool.list_timeout),
            mount: Duration::from_secs(config.tool.mount_timeout),
        }
    }

    /// Override the listing budget
    ///
    /// The periodic status poll lists with a tighter budget than an
    /// interactive browse, so it builds its backend through this.
    #[must_use]
    pub fn with_list(mut self, list: Duration) -> Self {
        self.list = list;
        self
    }
}

/// Drives the rclone binary behind the `IRemoteBackend` port
pub struct RcloneBackend {
    runner: RcloneRunner,
    timeouts: RcloneTimeouts,
}

impl RcloneBackend {
    /// Create a backend over an explicit runner and budgets
    pub fn new(runner: RcloneRunner, timeouts: RcloneTimeouts) -> Self {
        Self { runner, timeouts }
    }

    /// Create the interactive backend described by the configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            RcloneRunner::new(config.tool.binary.clone()),
            RcloneTimeouts::from_config(config),
        )
    }

    /// Create the status-poll variant (tighter listing budget)
    pub fn probe_variant(config: &Config) -> Self {
        Self::new(
            RcloneRunner::new(config.tool.binary.clone()),
            RcloneTimeouts::from_config(config)
                .with_list(Duration::from_secs(config.status.probe_timeout)),
        )
    }

    /// The runner in use (mostly for diagnostics)
    #[must_use]
    pub fn runner(&self) -> &RcloneRunner {
        &self.runner
    }
}

#[async_trait::async_trait]
impl IRemoteBackend for RcloneBackend {
    async fn probe_version(&self) -> anyhow::Result<ToolVersion> {
        let out = self
            .runner
            .run_checked(&args::version(), self.timeouts.probe)
            .await?;
        Ok(parse::parse_version(&out.stdout)?)
    }

    async fn list_remotes(&self) -> anyhow::Result<Vec<RemoteEntry>> {
        let out = self
            .runner
            .run_checked(&args::list_remotes(), self.timeouts.probe)
            .await?;
        Ok(parse::parse_remotes(&out.stdout))
    }

    async fn show_config(&self, remote: &RemoteName) -> anyhow::Result<ConfigDump> {
        let out = self
            .runner
            .run_checked(&args::show_config(remote), self.timeouts.probe)
            .await?;
        Ok(parse::parse_config_show(&out.stdout))
    }

    async fn delete_config(&self, remote: &RemoteName) -> anyhow::Result<()> {
        self.runner
            .run_checked(&args::delete_config(remote), self.timeouts.config)
            .await?;
        Ok(())
    }

    async fn obscure(&self, secret: &SecretString) -> anyhow::Result<String> {
        let out = self
            .runner
            .run_checked(&args::obscure(secret.expose_secret()), self.timeouts.config)
            .await?;
        let obscured = out.stdout.trim();
        if obscured.is_empty() {
            anyhow::bail!("obscure produced no output");
        }
        Ok(obscured.to_string())
    }

    async fn create_config(
        &self,
        remote: &RemoteName,
        backend: &str,
        params: Vec<(String, String)>,
        obscure: bool,
    ) -> anyhow::Result<()> {
        self.runner
            .run_checked(
                &args::create_config(remote, backend, &params, obscure),
                self.timeouts.create,
            )
            .await?;
        Ok(())
    }

    async fn list_dir(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteDirEntry>> {
        let out = self
            .runner
            .run_checked(&args::list_dir(path), self.timeouts.list)
            .await?;
        Ok(parse::parse_lsd(&out.stdout))
    }

    async fn sync(
        &self,
        request: &SyncRequest,
        lines: mpsc::UnboundedSender<String>,
    ) -> anyhow::Result<SyncOutcome> {
        let out = self
            .runner
            .stream(
                &args::sync(&request.source, &request.dest, &request.options),
                lines,
            )
            .await?;
        Ok(SyncOutcome {
            success: out.success,
            exit_code: out.code,
        })
    }

    async fn mount(&self, request: &MountRequest) -> anyhow::Result<()> {
        self.runner
            .run_checked(
                &args::mount(&request.remote, &request.mount_point, &request.options),
                self.timeouts.mount,
            )
            .await?;
        Ok(())
    }
}
