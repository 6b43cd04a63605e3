//! Use cases - multi-step flows orchestrated through the remote backend port
//!
//! Each use case owns one sequence the front-ends trigger (linking an
//! account, probing link status, recalling a saved login) so the CLI and
//! the terminal UI cannot drift apart on the semantics.

pub mod link_account;
pub mod link_status;
pub mod saved_login;

pub use link_account::{LinkAccountUseCase, LinkOutcome};
pub use link_status::{LinkState, LinkStatusUseCase};
pub use saved_login::SavedLoginUseCase;

#[cfg(test)]
pub(crate) mod testing {
    //! A scripted backend fake shared by the use case tests.

    use std::sync::Mutex;

    use secrecy::{ExposeSecret, SecretString};
    use tokio::sync::mpsc;

    use crate::domain::newtypes::{RemoteName, RemotePath};
    use crate::ports::remote_backend::{
        ConfigDump, IRemoteBackend, MountRequest, RemoteDirEntry, RemoteEntry, SyncOutcome,
        SyncRequest, ToolVersion,
    };

    /// Records every call and answers from pre-programmed results.
    #[derive(Default)]
    pub struct FakeBackend {
        pub calls: Mutex<Vec<String>>,
        pub remotes: Vec<String>,
        pub config: ConfigDump,
        pub fail_list_remotes: Option<String>,
        pub fail_show_config: Option<String>,
        pub fail_delete: Option<String>,
        pub fail_obscure: Option<String>,
        pub fail_create: Option<String>,
        pub fail_list_dir: Option<String>,
    }

    impl FakeBackend {
        pub fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl IRemoteBackend for FakeBackend {
        async fn probe_version(&self) -> anyhow::Result<ToolVersion> {
            self.record("version");
            Ok(ToolVersion {
                version: "1.66.0".to_string(),
                raw: "rclone v1.66.0".to_string(),
            })
        }

        async fn list_remotes(&self) -> anyhow::Result<Vec<RemoteEntry>> {
            self.record("listremotes");
            match &self.fail_list_remotes {
                Some(msg) => Err(anyhow::anyhow!("{msg}")),
                None => Ok(self
                    .remotes
                    .iter()
                    .map(|name| RemoteEntry { name: name.clone() })
                    .collect()),
            }
        }

        async fn show_config(&self, remote: &RemoteName) -> anyhow::Result<ConfigDump> {
            self.record(format!("show {remote}"));
            match &self.fail_show_config {
                Some(msg) => Err(anyhow::anyhow!("{msg}")),
                None => Ok(self.config.clone()),
            }
        }

        async fn delete_config(&self, remote: &RemoteName) -> anyhow::Result<()> {
            self.record(format!("delete {remote}"));
            match &self.fail_delete {
                Some(msg) => Err(anyhow::anyhow!("{msg}")),
                None => Ok(()),
            }
        }

        async fn obscure(&self, secret: &SecretString) -> anyhow::Result<String> {
            self.record("obscure");
            match &self.fail_obscure {
                Some(msg) => Err(anyhow::anyhow!("{msg}")),
                None => Ok(format!("obscured:{}", secret.expose_secret().len())),
            }
        }

        async fn create_config(
            &self,
            remote: &RemoteName,
            backend: &str,
            params: Vec<(String, String)>,
            obscure: bool,
        ) -> anyhow::Result<()> {
            let rendered: Vec<String> =
                params.iter().map(|(k, v)| format!("{k}={v}")).collect();
            self.record(format!(
                "create {remote} {backend} [{}] obscure={obscure}",
                rendered.join(",")
            ));
            match &self.fail_create {
                Some(msg) => Err(anyhow::anyhow!("{msg}")),
                None => Ok(()),
            }
        }

        async fn list_dir(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteDirEntry>> {
            self.record(format!("lsd {path}"));
            match &self.fail_list_dir {
                Some(msg) => Err(anyhow::anyhow!("{msg}")),
                None => Ok(vec![RemoteDirEntry {
                    name: "Documents".to_string(),
                    modified: None,
                }]),
            }
        }

        async fn sync(
            &self,
            request: &SyncRequest,
            _lines: mpsc::UnboundedSender<String>,
        ) -> anyhow::Result<SyncOutcome> {
            self.record(format!("sync {} {}", request.source.display(), request.dest));
            Ok(SyncOutcome {
                success: true,
                exit_code: Some(0),
            })
        }

        async fn mount(&self, request: &MountRequest) -> anyhow::Result<()> {
            self.record(format!(
                "mount {} {}",
                request.remote,
                request.mount_point.display()
            ));
            Ok(())
        }
    }
}
