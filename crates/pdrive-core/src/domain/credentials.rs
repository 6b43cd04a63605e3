//! Transient sign-in credentials
//!
//! Credentials exist only between form submission and the completion of the
//! link flow. The password is held as a [`SecretString`] so it is zeroized on
//! drop and cannot leak through `Debug` formatting; the whole struct is
//! consumed by [`crate::usecases::LinkAccountUseCase::link`].

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use super::errors::DomainError;
use super::newtypes::Email;

/// Credentials for linking a remote account
///
/// Invariant: the password never appears in logs, `Debug` output, or any
/// file this program writes. It is handed to the external tool exactly once
/// (to be obscured) and dropped.
pub struct Credentials {
    email: Email,
    password: SecretString,
    one_time_code: Option<String>,
}

impl Credentials {
    /// Create credentials from form input
    ///
    /// A blank one-time code collapses to `None` so callers can pass the raw
    /// (possibly empty) field content.
    ///
    /// # Errors
    /// Returns error when the password is empty
    pub fn new(
        email: Email,
        password: SecretString,
        one_time_code: Option<String>,
    ) -> Result<Self, DomainError> {
        if password.expose_secret().is_empty() {
            return Err(DomainError::MissingCredential("password".to_string()));
        }

        let one_time_code = one_time_code
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty());

        Ok(Self {
            email,
            password,
            one_time_code,
        })
    }

    /// The account email address
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// The password, still wrapped; expose only at the tool boundary
    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// The one-time code, if the account has a second factor enabled
    #[must_use]
    pub fn one_time_code(&self) -> Option<&str> {
        self.one_time_code.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field(
                "one_time_code",
                &self.one_time_code.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::new("user@proton.me").unwrap()
    }

    #[test]
    fn rejects_empty_password() {
        let result = Credentials::new(email(), SecretString::new(String::new()), None);
        assert_eq!(
            result.err(),
            Some(DomainError::MissingCredential("password".to_string()))
        );
    }

    #[test]
    fn blank_one_time_code_collapses_to_none() {
        let creds = Credentials::new(
            email(),
            SecretString::new("hunter2".to_string()),
            Some("   ".to_string()),
        )
        .unwrap();
        assert!(creds.one_time_code().is_none());
    }

    #[test]
    fn one_time_code_is_trimmed() {
        let creds = Credentials::new(
            email(),
            SecretString::new("hunter2".to_string()),
            Some(" 123456 ".to_string()),
        )
        .unwrap();
        assert_eq!(creds.one_time_code(), Some("123456"));
    }

    #[test]
    fn debug_output_never_contains_secrets() {
        let creds = Credentials::new(
            email(),
            SecretString::new("hunter2".to_string()),
            Some("123456".to_string()),
        )
        .unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("123456"));
        assert!(debug.contains("user@proton.me"));
    }
}
