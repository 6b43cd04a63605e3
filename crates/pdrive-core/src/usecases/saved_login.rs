//! Saved-login use case
//!
//! Reads the account name back out of the tool's stored config so the
//! sign-in form can be prefilled. Never fatal: when the config is missing
//! or unreadable the form simply starts empty.

use std::sync::Arc;

use crate::domain::newtypes::RemoteName;
use crate::ports::remote_backend::IRemoteBackend;

/// Use case for recalling the last linked account name
pub struct SavedLoginUseCase {
    backend: Arc<dyn IRemoteBackend>,
}

impl SavedLoginUseCase {
    /// Creates a new SavedLoginUseCase over the given backend
    pub fn new(backend: Arc<dyn IRemoteBackend>) -> Self {
        Self { backend }
    }

    /// The stored account name, if the remote is configured
    ///
    /// Returned as a plain string: the stored value may predate this
    /// program's validation and still deserves to appear in the form.
    pub async fn recall(&self, remote: &RemoteName) -> Option<String> {
        let dump = match self.backend.show_config(remote).await {
            Ok(dump) => dump,
            Err(e) => {
                tracing::debug!(error = %e, "Could not read stored configuration");
                return None;
            }
        };

        dump.get("username")
            .or_else(|| dump.get("user"))
            .map(str::to_string)
    }
}
