//! Port definitions (trait interfaces for adapters)

pub mod remote_backend;

pub use remote_backend::{
    ConfigDump, IRemoteBackend, MountOptions, MountRequest, RemoteDirEntry, RemoteEntry,
    SyncOptions, SyncOutcome, SyncRequest, ToolVersion,
};
