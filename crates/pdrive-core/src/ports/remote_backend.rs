//! Remote backend port (driven/secondary port)
//!
//! This module defines the interface to the external synchronization tool.
//! The only production implementation drives the rclone binary, but the
//! trait keeps every subprocess detail out of the use cases so they can be
//! tested against a scripted fake.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification; the raw
//!   stderr text carried in the error message is itself the error surface
//!   the tool exposes.
//! - Uses `#[async_trait]` for async trait methods.
//! - The structs here are port-level DTOs, not domain entities; they mirror
//!   what the tool's output can actually express.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::domain::newtypes::{RemoteName, RemotePath};

// ============================================================================
// Version probe
// ============================================================================

/// Version information reported by the external tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersion {
    /// Parsed version, e.g. `1.66.0`
    pub version: String,
    /// The full first line of `version` output, for display
    pub raw: String,
}

// ============================================================================
// Remote configuration
// ============================================================================

/// One configured remote, as reported by the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Remote name without the trailing colon
    pub name: String,
}

/// Key/value dump of one remote's stored configuration
///
/// Order-preserving because the tool prints it in a meaningful order.
/// Values of secret-bearing keys must never be displayed; use
/// [`ConfigDump::redacted`] for anything user-facing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDump {
    entries: Vec<(String, String)>,
}

/// Config keys whose values are secrets
const SECRET_KEYS: &[&str] = &["password", "pass", "2fa", "token", "client_secret"];

impl ConfigDump {
    /// Build a dump from parsed key/value pairs
    #[must_use]
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Look up a value by key (first match, case-insensitive)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate the raw entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dump is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries with secret values replaced by `***`
    #[must_use]
    pub fn redacted(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| {
                let is_secret = SECRET_KEYS.iter().any(|s| k.eq_ignore_ascii_case(s));
                let value = if is_secret { "***".to_string() } else { v.clone() };
                (k.clone(), value)
            })
            .collect()
    }
}

// ============================================================================
// Directory listing
// ============================================================================

/// One directory from a remote listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDirEntry {
    /// Directory name
    pub name: String,
    /// Modification time when the listing reported one
    pub modified: Option<NaiveDateTime>,
}

// ============================================================================
// Sync
// ============================================================================

/// Flags forwarded to the tool's sync subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Pass `-v` for per-file lines
    pub verbose: bool,
    /// Pass `--progress` for transfer statistics
    pub progress: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            progress: true,
        }
    }
}

/// A one-way sync from a local directory to a remote path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub source: PathBuf,
    pub dest: RemotePath,
    pub options: SyncOptions,
}

/// Terminal state of a sync run
///
/// `Err` from [`IRemoteBackend::sync`] means the tool could not be run at
/// all; a tool that ran and failed is `Ok` with `success == false`, because
/// its output lines already told the user what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
}

// ============================================================================
// Mount
// ============================================================================

/// Flags forwarded to the tool's mount subcommand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountOptions {
    /// Value for `--vfs-cache-mode`
    pub cache_mode: String,
    /// Pass `--daemon` so the tool detaches and keeps the mount alive
    pub daemonize: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            cache_mode: "full".to_string(),
            daemonize: true,
        }
    }
}

/// A request to mount a remote path on a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountRequest {
    pub remote: RemotePath,
    pub mount_point: PathBuf,
    pub options: MountOptions,
}

// ============================================================================
// IRemoteBackend trait
// ============================================================================

/// Port trait for every operation delegated to the external tool
///
/// ## Implementation Notes
///
/// - Implementations apply per-operation timeouts; a timeout surfaces as an
///   `Err` like any other failure.
/// - `sync` streams output lines into the provided channel as they arrive
///   (stdout and stderr interleaved) and only returns when the child exits.
/// - `obscure` receives the plaintext secret and must not log it.
#[async_trait::async_trait]
pub trait IRemoteBackend: Send + Sync {
    /// Runs the tool's version subcommand; failure means the tool is
    /// missing or broken
    async fn probe_version(&self) -> anyhow::Result<ToolVersion>;

    /// Lists the configured remotes
    async fn list_remotes(&self) -> anyhow::Result<Vec<RemoteEntry>>;

    /// Dumps one remote's stored configuration
    async fn show_config(&self, remote: &RemoteName) -> anyhow::Result<ConfigDump>;

    /// Deletes one remote's stored configuration
    async fn delete_config(&self, remote: &RemoteName) -> anyhow::Result<()>;

    /// Encodes a secret with the tool's reversible obscuring scheme
    ///
    /// # Returns
    /// The obscured form, safe to pass to `create_config`
    async fn obscure(&self, secret: &SecretString) -> anyhow::Result<String>;

    /// Creates a remote configuration entry
    ///
    /// # Arguments
    /// * `remote` - Name for the new entry
    /// * `backend` - Tool backend type (e.g. `protondrive`)
    /// * `params` - `key=value` parameters for the backend
    /// * `obscure` - Pass the tool's obscure flag alongside the parameters
    async fn create_config(
        &self,
        remote: &RemoteName,
        backend: &str,
        params: Vec<(String, String)>,
        obscure: bool,
    ) -> anyhow::Result<()>;

    /// Lists the directories directly under a remote path
    async fn list_dir(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteDirEntry>>;

    /// Runs a sync, streaming output lines into `lines`
    async fn sync(
        &self,
        request: &SyncRequest,
        lines: mpsc::UnboundedSender<String>,
    ) -> anyhow::Result<SyncOutcome>;

    /// Mounts a remote path on a local directory
    async fn mount(&self, request: &MountRequest) -> anyhow::Result<()>;
}
