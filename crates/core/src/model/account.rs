use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccountError {
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("unknown role: {0:?}")]
    UnknownRole(String),
}

//
// ─── EMAIL ─────────────────────────────────────────────────────────────────────
//

/// A sign-in address. Stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// # Errors
    ///
    /// Returns `AccountError::InvalidEmail` unless the address has exactly one
    /// `@` with text on both sides and no whitespace.
    pub fn parse(raw: &str) -> Result<Self, AccountError> {
        let trimmed = raw.trim();
        let invalid = || AccountError::InvalidEmail(raw.to_string());
        let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(invalid());
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before `@`. A child's login links to the child profile
    /// whose name matches this.
    #[must_use]
    pub fn username(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = AccountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Parent,
    Child,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Parent => "parent",
            Role::Child => "child",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parent" => Ok(Role::Parent),
            "child" => Ok(Role::Child),
            _ => Err(AccountError::UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_and_exposes_username() {
        let email = Email::parse("  Maya@Example.com ").unwrap();
        assert_eq!(email.as_str(), "maya@example.com");
        assert_eq!(email.username(), "maya");
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for raw in ["", "maya", "@example.com", "maya@", "a@b@c", "ma ya@example.com"] {
            assert!(Email::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn role_parses_stored_names() {
        assert_eq!("parent".parse::<Role>().unwrap(), Role::Parent);
        assert_eq!("Child".parse::<Role>().unwrap(), Role::Child);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Child.to_string(), "child");
    }
}
