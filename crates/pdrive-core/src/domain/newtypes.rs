//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for the identifiers this program passes to the
//! external tool. Each newtype validates at construction time so that no
//! malformed value ever reaches an argument list.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// RunId
// ============================================================================

/// Identifier for a single external-tool invocation
///
/// Attached to tracing spans so the log lines of one subprocess run can be
/// correlated across the runner and the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new random RunId
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Email
// ============================================================================

/// Validated email address (basic structural validation)
///
/// Checks:
/// - exactly one `@`
/// - non-empty local part of reasonable length and characters
/// - non-empty domain with at least one dot and sane labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new validated Email
    ///
    /// # Errors
    /// Returns error if the email format is invalid
    pub fn new(email: impl Into<String>) -> Result<Self, DomainError> {
        let email = email.into();
        Self::validate(&email)?;
        // Stored lowercase so prefill comparisons are stable
        Ok(Self(email.to_lowercase()))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(email: &str) -> Result<(), DomainError> {
        let (local, domain) = match email.split_once('@') {
            Some(parts) => parts,
            None => {
                return Err(DomainError::InvalidEmail(format!(
                    "must contain '@': {email}"
                )))
            }
        };

        if domain.contains('@') {
            return Err(DomainError::InvalidEmail(format!(
                "must contain exactly one '@': {email}"
            )));
        }

        if local.is_empty() || local.len() > 64 {
            return Err(DomainError::InvalidEmail(format!(
                "local part must be 1..=64 characters: {email}"
            )));
        }

        if !local
            .chars()
            .all(|c| c.is_alphanumeric() || ".+-_".contains(c))
        {
            return Err(DomainError::InvalidEmail(format!(
                "local part contains invalid characters: {email}"
            )));
        }

        if domain.is_empty() || !domain.contains('.') {
            return Err(DomainError::InvalidEmail(format!(
                "domain must contain at least one dot: {email}"
            )));
        }

        for label in domain.split('.') {
            if label.is_empty() {
                return Err(DomainError::InvalidEmail(format!(
                    "domain contains an empty label: {email}"
                )));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(DomainError::InvalidEmail(format!(
                    "domain label cannot start or end with a hyphen: {email}"
                )));
            }
            if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
                return Err(DomainError::InvalidEmail(format!(
                    "domain contains invalid characters: {email}"
                )));
            }
        }

        Ok(())
    }
}

impl Display for Email {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

// ============================================================================
// RemoteName
// ============================================================================

/// Validated name of an external-tool remote
///
/// The tool addresses configured backends as `<name>:<path>`, so a name must
/// never contain `:` or whitespace. The accepted set matches what the tool's
/// own config accepts: alphanumeric, `-`, `_`, and non-leading `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteName(String);

impl RemoteName {
    /// Create a new validated RemoteName
    ///
    /// # Errors
    /// Returns error if the name is empty or contains invalid characters
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.is_empty() {
            return Err(DomainError::InvalidRemoteName(
                "name cannot be empty".to_string(),
            ));
        }

        if name.starts_with('-') || name.starts_with('.') {
            return Err(DomainError::InvalidRemoteName(format!(
                "name cannot start with '-' or '.': {name}"
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
        {
            return Err(DomainError::InvalidRemoteName(format!(
                "name may only contain letters, digits, '-', '_' and '.': {name}"
            )));
        }

        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `name:` form used when listing configured remotes
    #[must_use]
    pub fn with_colon(&self) -> String {
        format!("{}:", self.0)
    }

    /// Address the remote's root directory
    #[must_use]
    pub fn root(&self) -> RemotePath {
        RemotePath {
            remote: self.clone(),
            path: String::new(),
        }
    }

    /// Address a directory under this remote
    ///
    /// An empty `path` addresses the root, matching how the tool treats
    /// `name:` and `name:folder`.
    #[must_use]
    pub fn join(&self, path: &str) -> RemotePath {
        RemotePath {
            remote: self.clone(),
            path: path.trim_matches('/').to_string(),
        }
    }
}

impl Display for RemoteName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RemoteName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteName> for String {
    fn from(name: RemoteName) -> Self {
        name.0
    }
}

// ============================================================================
// RemotePath
// ============================================================================

/// A `remote:path` address understood by the external tool
///
/// Built through [`RemoteName::root`] / [`RemoteName::join`] so the remote
/// component is always validated. The path component may be empty (the
/// remote's root).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePath {
    remote: RemoteName,
    path: String,
}

impl RemotePath {
    /// The remote this path addresses
    #[must_use]
    pub fn remote(&self) -> &RemoteName {
        &self.remote
    }

    /// The path component (empty for the root)
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The full `remote:path` form passed on the command line
    #[must_use]
    pub fn as_arg(&self) -> String {
        format!("{}:{}", self.remote, self.path)
    }

    /// Parse a `remote:path` string
    ///
    /// # Errors
    /// Returns error when the remote component is missing or invalid
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let (name, path) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidRemotePath(format!("missing ':' in {s}")))?;
        Ok(RemoteName::new(name)?.join(path))
    }
}

impl Display for RemotePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- RunId --

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    // -- Email --

    #[test]
    fn email_accepts_valid_addresses() {
        for addr in [
            "user@proton.me",
            "first.last@example.com",
            "with+tag@sub.domain.org",
            "under_score@host.io",
        ] {
            assert!(Email::new(addr).is_ok(), "{addr} should be valid");
        }
    }

    #[test]
    fn email_is_lowercased() {
        let email = Email::new("User@Proton.Me").unwrap();
        assert_eq!(email.as_str(), "user@proton.me");
    }

    #[test]
    fn email_rejects_invalid_addresses() {
        for addr in [
            "",
            "noat",
            "two@@proton.me",
            "a@b@c.com",
            "@proton.me",
            "user@",
            "user@nodot",
            "user@-bad.com",
            "user@bad-.com",
            "user@dou..ble.com",
            "spa ce@proton.me",
        ] {
            assert!(Email::new(addr).is_err(), "{addr:?} should be rejected");
        }
    }

    #[test]
    fn email_rejects_overlong_local_part() {
        let addr = format!("{}@proton.me", "a".repeat(65));
        assert!(Email::new(addr).is_err());
    }

    #[test]
    fn email_serde_round_trip() {
        let email = Email::new("user@proton.me").unwrap();
        let json = serde_json::to_string(&email).unwrap();
        assert_eq!(json, "\"user@proton.me\"");
        let back: Email = serde_json::from_str(&json).unwrap();
        assert_eq!(back, email);
    }

    #[test]
    fn email_serde_rejects_invalid() {
        let result: Result<Email, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }

    // -- RemoteName --

    #[test]
    fn remote_name_accepts_valid_names() {
        for name in ["protondrive", "proton-2", "work_drive", "a.b"] {
            assert!(RemoteName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn remote_name_rejects_invalid_names() {
        for name in ["", "has:colon", "has space", "-leading", ".leading", "emoji🐱"] {
            assert!(RemoteName::new(name).is_err(), "{name:?} should be rejected");
        }
    }

    #[test]
    fn remote_name_colon_form() {
        let name = RemoteName::new("protondrive").unwrap();
        assert_eq!(name.with_colon(), "protondrive:");
    }

    // -- RemotePath --

    #[test]
    fn remote_path_root() {
        let name = RemoteName::new("protondrive").unwrap();
        assert_eq!(name.root().as_arg(), "protondrive:");
    }

    #[test]
    fn remote_path_join_trims_slashes() {
        let name = RemoteName::new("protondrive").unwrap();
        assert_eq!(name.join("/Documents/").as_arg(), "protondrive:Documents");
        assert_eq!(name.join("a/b").as_arg(), "protondrive:a/b");
    }

    #[test]
    fn remote_path_parse() {
        let path = RemotePath::parse("protondrive:Photos/2024").unwrap();
        assert_eq!(path.remote().as_str(), "protondrive");
        assert_eq!(path.path(), "Photos/2024");

        let root = RemotePath::parse("protondrive:").unwrap();
        assert_eq!(root.path(), "");

        assert!(RemotePath::parse("nocolon").is_err());
        assert!(RemotePath::parse("bad name:x").is_err());
    }
}
