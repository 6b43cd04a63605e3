//! Link-account use case
//!
//! Orchestrates the sign-in flow: replace any existing remote config,
//! obscure the password, create the new config, then verify it with a root
//! listing. Every step is delegated to the remote backend port; this module
//! only owns the sequence and the classification of the outcome.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::console::{AuthFailure, LogLine};
use crate::domain::credentials::Credentials;
use crate::domain::newtypes::RemoteName;
use crate::ports::remote_backend::IRemoteBackend;

/// Terminal state of a link attempt
///
/// Everything short of `Linked` carries the text to show the user; the
/// caller decides severity (`TwoFactorRejected` is a warning, the rest are
/// errors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Config created and the verification listing succeeded
    Linked,
    /// Verification failed and stderr pointed at the second factor
    TwoFactorRejected { detail: String },
    /// Verification failed and stderr pointed at the credentials
    CredentialsRejected { detail: String },
    /// Any other failure (obscure, create, or unrecognized verification error)
    Failed { detail: String },
}

/// Use case for linking a remote account
///
/// Consumes the credentials: after [`link`](Self::link) returns, the
/// password has been dropped regardless of the outcome.
pub struct LinkAccountUseCase {
    backend: Arc<dyn IRemoteBackend>,
}

impl LinkAccountUseCase {
    /// Creates a new LinkAccountUseCase over the given backend
    pub fn new(backend: Arc<dyn IRemoteBackend>) -> Self {
        Self { backend }
    }

    /// Runs the full link flow
    ///
    /// Steps:
    /// 1. Delete any existing remote config with this name. Failure is
    ///    ignored: on a first run there is nothing to delete.
    /// 2. Obscure the password; a failure here aborts the flow.
    /// 3. Create the remote config with `username`, the obscured
    ///    `password`, and `2fa` when a one-time code was supplied.
    /// 4. Wait `verify_delay`, then verify with a root listing.
    /// 5. Classify a verification failure from its stderr text.
    ///
    /// `notify` receives progress lines as the steps run; the returned
    /// outcome is not repeated through it.
    pub async fn link<F>(
        &self,
        remote: &RemoteName,
        backend_type: &str,
        credentials: Credentials,
        verify_delay: Duration,
        mut notify: F,
    ) -> LinkOutcome
    where
        F: FnMut(LogLine),
    {
        // Step 1: drop any previous config under this name
        notify(LogLine::info("Removing old configuration..."));
        if let Err(e) = self.backend.delete_config(remote).await {
            tracing::debug!(error = %e, "No previous configuration to delete");
        }

        // Step 2: obscure the password
        notify(LogLine::info("Securing password..."));
        let obscured = match self.backend.obscure(credentials.password()).await {
            Ok(value) => value,
            Err(e) => {
                return LinkOutcome::Failed {
                    detail: format!("Password obscuring failed: {e}"),
                }
            }
        };

        // Step 3: create the config
        notify(LogLine::info("Creating configuration..."));
        let mut params = vec![
            ("username".to_string(), credentials.email().to_string()),
            ("password".to_string(), obscured),
        ];
        if let Some(code) = credentials.one_time_code() {
            notify(LogLine::info("Using one-time code..."));
            params.push(("2fa".to_string(), code.to_string()));
        }

        if let Err(e) = self
            .backend
            .create_config(remote, backend_type, params, true)
            .await
        {
            return LinkOutcome::Failed {
                detail: format!("Configuration failed: {e}"),
            };
        }
        notify(LogLine::success("Configuration created"));

        // Step 4: verify with a root listing, after a short grace period
        notify(LogLine::info("Testing connection..."));
        tokio::time::sleep(verify_delay).await;

        match self.backend.list_dir(&remote.root()).await {
            Ok(_) => LinkOutcome::Linked,
            Err(e) => {
                let detail = e.to_string();
                match AuthFailure::from_stderr(&detail) {
                    AuthFailure::TwoFactor => LinkOutcome::TwoFactorRejected { detail },
                    AuthFailure::Credentials => LinkOutcome::CredentialsRejected { detail },
                    AuthFailure::Other => LinkOutcome::Failed {
                        detail: format!("Connection test failed: {detail}"),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use secrecy::SecretString;

    use super::*;
    use crate::domain::newtypes::Email;
    use crate::usecases::testing::FakeBackend;

    fn remote() -> RemoteName {
        RemoteName::new("protondrive").unwrap()
    }

    fn credentials(code: Option<&str>) -> Credentials {
        Credentials::new(
            Email::new("user@proton.me").unwrap(),
            SecretString::new("hunter2".to_string()),
            code.map(str::to_string),
        )
        .unwrap()
    }

    async fn run(backend: FakeBackend, code: Option<&str>) -> (Arc<FakeBackend>, LinkOutcome) {
        let backend = Arc::new(backend);
        let usecase = LinkAccountUseCase::new(backend.clone());
        let outcome = usecase
            .link(
                &remote(),
                "protondrive",
                credentials(code),
                Duration::ZERO,
                |_| {},
            )
            .await;
        (backend, outcome)
    }

    #[tokio::test]
    async fn happy_path_runs_delete_obscure_create_verify_in_order() {
        let (backend, outcome) = run(FakeBackend::default(), None).await;

        assert_eq!(outcome, LinkOutcome::Linked);
        assert_eq!(
            backend.calls(),
            vec![
                "delete protondrive",
                "obscure",
                "create protondrive protondrive \
                 [username=user@proton.me,password=obscured:7] obscure=true",
                "lsd protondrive:",
            ]
        );
    }

    #[tokio::test]
    async fn one_time_code_is_forwarded_as_config_parameter() {
        let (backend, outcome) = run(FakeBackend::default(), Some("123456")).await;

        assert_eq!(outcome, LinkOutcome::Linked);
        let calls = backend.calls();
        assert!(calls[2].contains("2fa=123456"), "create call: {}", calls[2]);
    }

    #[tokio::test]
    async fn delete_failure_is_ignored() {
        let backend = FakeBackend {
            fail_delete: Some("remote not found".to_string()),
            ..FakeBackend::default()
        };
        let (_, outcome) = run(backend, None).await;
        assert_eq!(outcome, LinkOutcome::Linked);
    }

    #[tokio::test]
    async fn obscure_failure_aborts_before_create() {
        let backend = FakeBackend {
            fail_obscure: Some("broken pipe".to_string()),
            ..FakeBackend::default()
        };
        let (backend, outcome) = run(backend, None).await;

        assert!(matches!(
            outcome,
            LinkOutcome::Failed { ref detail } if detail.contains("broken pipe")
        ));
        assert!(!backend.calls().iter().any(|c| c.starts_with("create")));
    }

    #[tokio::test]
    async fn create_failure_reports_detail() {
        let backend = FakeBackend {
            fail_create: Some("didn't find backend called \"protondrive\"".to_string()),
            ..FakeBackend::default()
        };
        let (_, outcome) = run(backend, None).await;

        assert!(matches!(
            outcome,
            LinkOutcome::Failed { ref detail }
                if detail.contains("didn't find backend")
        ));
    }

    #[tokio::test]
    async fn verification_two_factor_failure_is_classified() {
        let backend = FakeBackend {
            fail_list_dir: Some("couldn't login: Incorrect 2FA code".to_string()),
            ..FakeBackend::default()
        };
        let (_, outcome) = run(backend, None).await;
        assert!(matches!(outcome, LinkOutcome::TwoFactorRejected { .. }));
    }

    #[tokio::test]
    async fn verification_credential_failure_is_classified() {
        let backend = FakeBackend {
            fail_list_dir: Some("couldn't login: Incorrect username or password".to_string()),
            ..FakeBackend::default()
        };
        let (_, outcome) = run(backend, None).await;
        assert!(matches!(outcome, LinkOutcome::CredentialsRejected { .. }));
    }

    #[tokio::test]
    async fn verification_unknown_failure_reports_detail() {
        let backend = FakeBackend {
            fail_list_dir: Some("connection reset by peer".to_string()),
            ..FakeBackend::default()
        };
        let (_, outcome) = run(backend, None).await;
        assert!(matches!(
            outcome,
            LinkOutcome::Failed { ref detail } if detail.contains("connection reset")
        ));
    }

    #[tokio::test]
    async fn progress_lines_are_emitted() {
        let backend = Arc::new(FakeBackend::default());
        let usecase = LinkAccountUseCase::new(backend);
        let mut messages = Vec::new();
        usecase
            .link(
                &remote(),
                "protondrive",
                credentials(None),
                Duration::ZERO,
                |line| messages.push(line.message),
            )
            .await;

        assert!(messages.iter().any(|m| m.contains("Securing password")));
        assert!(messages.iter().any(|m| m.contains("Creating configuration")));
        assert!(messages.iter().any(|m| m.contains("Testing connection")));
    }
}
