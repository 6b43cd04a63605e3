//! Activity-log lines and output classification
//!
//! The external tool reports everything as free text on stdout/stderr. This
//! module is the single place where recognized substrings are translated
//! into user-facing severities, so the CLI and the terminal UI agree on what
//! a given line means. The matching is deliberately loose: the tool's output
//! format is not a stable contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of an activity-log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// One line of the activity log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    /// When the line was produced
    pub at: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl LogLine {
    /// Create a log line stamped with the current time
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            severity,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }
}

/// Classify one line of streamed transfer output
///
/// Lines containing `ERROR` are errors, the final `Transferred:` summary
/// counts as success, everything else is plain information.
#[must_use]
pub fn classify_transfer_line(line: &str) -> Severity {
    if line.contains("ERROR") {
        Severity::Error
    } else if line.contains("Transferred:") {
        Severity::Success
    } else {
        Severity::Info
    }
}

/// Recognized reason a freshly created remote config failed verification
///
/// Derived from the tool's stderr after the post-link listing fails. The
/// two-factor check wins over the credential check when both substrings
/// appear, since a rejected second factor also mentions the username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// stderr mentioned `2fa` / `two-factor`
    TwoFactor,
    /// stderr mentioned `username` or `password`
    Credentials,
    /// Nothing recognized; show the raw text
    Other,
}

impl AuthFailure {
    /// Classify verification stderr, case-insensitively
    #[must_use]
    pub fn from_stderr(stderr: &str) -> Self {
        let lower = stderr.to_lowercase();
        if lower.contains("2fa") || lower.contains("two-factor") {
            Self::TwoFactor
        } else if lower.contains("username") || lower.contains("password") {
            Self::Credentials
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_error_lines() {
        assert_eq!(
            classify_transfer_line("2024/06/01 10:00:00 ERROR : f.txt: Failed to copy"),
            Severity::Error
        );
    }

    #[test]
    fn transfer_summary_lines() {
        assert_eq!(
            classify_transfer_line("Transferred:   	  1.234 MiB / 1.234 MiB, 100%"),
            Severity::Success
        );
    }

    #[test]
    fn transfer_plain_lines() {
        assert_eq!(
            classify_transfer_line("2024/06/01 10:00:00 INFO  : f.txt: Copied (new)"),
            Severity::Info
        );
    }

    #[test]
    fn error_wins_over_summary_in_one_line() {
        // An ERROR line quoting the summary is still an error
        assert_eq!(
            classify_transfer_line("ERROR while printing Transferred: stats"),
            Severity::Error
        );
    }

    #[test]
    fn auth_failure_two_factor() {
        assert_eq!(
            AuthFailure::from_stderr("couldn't login: Incorrect 2FA code"),
            AuthFailure::TwoFactor
        );
        assert_eq!(
            AuthFailure::from_stderr("Two-Factor authentication required"),
            AuthFailure::TwoFactor
        );
    }

    #[test]
    fn auth_failure_credentials() {
        assert_eq!(
            AuthFailure::from_stderr("couldn't login: Incorrect Username or Password"),
            AuthFailure::Credentials
        );
    }

    #[test]
    fn auth_failure_two_factor_wins_over_credentials() {
        assert_eq!(
            AuthFailure::from_stderr("username ok but 2FA code rejected"),
            AuthFailure::TwoFactor
        );
    }

    #[test]
    fn auth_failure_other() {
        assert_eq!(
            AuthFailure::from_stderr("connection reset by peer"),
            AuthFailure::Other
        );
    }

    #[test]
    fn log_line_constructors_set_severity() {
        assert_eq!(LogLine::success("ok").severity, Severity::Success);
        assert_eq!(LogLine::error("no").severity, Severity::Error);
        assert_eq!(LogLine::warning("hm").severity, Severity::Warning);
        assert_eq!(LogLine::info("fyi").severity, Severity::Info);
    }
}
