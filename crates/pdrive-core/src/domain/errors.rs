//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures raised by the newtype constructors.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    /// Invalid remote name (must be a valid rclone remote identifier)
    #[error("Invalid remote name: {0}")]
    InvalidRemoteName(String),

    /// Invalid remote path format
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),

    /// A credential field that must be present was empty
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
