//! pdrive rclone adapter
//!
//! Implements the `IRemoteBackend` port by shelling out to the rclone
//! binary. The adapter splits into:
//! - [`args`] - pure argument-list construction per subcommand
//! - [`invoke`] - the subprocess runner (timeouts, capture, streaming)
//! - [`parse`] - parsers for the subcommands whose stdout we read back
//! - [`backend`] - [`backend::RcloneBackend`], the port implementation
//!
//! Everything rclone prints is treated as unstable text: parsers are
//! tolerant, and errors carry the raw stderr because that text is the only
//! error surface the tool has.

pub mod args;
pub mod backend;
pub mod error;
pub mod invoke;
pub mod parse;

pub use backend::{RcloneBackend, RcloneTimeouts};
pub use error::RcloneError;
pub use invoke::{CmdOutput, RcloneRunner};
