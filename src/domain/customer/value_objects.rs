use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::CustomerError;

// ============================================================================
// Customer Value Objects
// ============================================================================

/// Syntactically valid customer email address.
///
/// Matching against stored emails is exact and case-sensitive, so the
/// address is kept as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(email: impl Into<String>) -> Result<Self, CustomerError> {
        let email = email.into();

        if email.is_empty() {
            return Err(CustomerError::EmptyEmail);
        }
        if !is_well_formed(&email) {
            return Err(CustomerError::InvalidEmail(email));
        }

        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = CustomerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

// Local part may not start or end with a dot; every domain label starts
// alphanumeric and the top-level label is at least two letters.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[A-Z0-9_+\-]|[A-Z0-9_'+\-][A-Z0-9_'+\-.]*[A-Z0-9_+\-])@(?:[A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$",
    )
    .expect("email pattern is a valid regex")
});

fn is_well_formed(email: &str) -> bool {
    !email.contains("..") && EMAIL_PATTERN.is_match(email)
}

/// Credential supplied at login, compared verbatim against the stored one.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}
