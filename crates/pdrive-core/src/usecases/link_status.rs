//! Link-status use case
//!
//! The probe behind the front-ends' connection indicator. Deliberately
//! infallible: any failure along the way degrades to the matching state,
//! because the indicator has nowhere to put an error.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::RemoteName;
use crate::ports::remote_backend::IRemoteBackend;

/// Observed state of the managed remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    /// The remote exists and a root listing succeeded
    Connected,
    /// The remote exists but listing it failed
    ConfigBroken,
    /// The remote is not configured (or the tool is unreachable)
    NotConfigured,
}

impl Display for LinkState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            LinkState::Connected => "Connected",
            LinkState::ConfigBroken => "Configuration error",
            LinkState::NotConfigured => "Not connected",
        };
        write!(f, "{text}")
    }
}

/// Use case for probing the link status
pub struct LinkStatusUseCase {
    backend: Arc<dyn IRemoteBackend>,
}

impl LinkStatusUseCase {
    /// Creates a new LinkStatusUseCase over the given backend
    pub fn new(backend: Arc<dyn IRemoteBackend>) -> Self {
        Self { backend }
    }

    /// Probe the remote: is it configured, and does a root listing work?
    pub async fn probe(&self, remote: &RemoteName) -> LinkState {
        let remotes = match self.backend.list_remotes().await {
            Ok(remotes) => remotes,
            Err(e) => {
                tracing::debug!(error = %e, "Listing remotes failed during status probe");
                return LinkState::NotConfigured;
            }
        };

        if !remotes.iter().any(|r| r.name == remote.as_str()) {
            return LinkState::NotConfigured;
        }

        match self.backend.list_dir(&remote.root()).await {
            Ok(_) => LinkState::Connected,
            Err(e) => {
                tracing::debug!(error = %e, "Root listing failed during status probe");
                LinkState::ConfigBroken
            }
        }
    }
}
