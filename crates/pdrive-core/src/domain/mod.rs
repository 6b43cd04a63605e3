//! Domain types for pdrive
//!
//! Pure types with no subprocess, terminal, or filesystem dependencies.

pub mod console;
pub mod credentials;
pub mod errors;
pub mod newtypes;

pub use console::{classify_transfer_line, AuthFailure, LogLine, Severity};
pub use credentials::Credentials;
pub use errors::DomainError;
pub use newtypes::{Email, RemoteName, RemotePath, RunId};
