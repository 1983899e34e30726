//! Registration schema
//!
//! A `Registration` can only be obtained through [`Registration::new`] (or
//! deserialization, which goes through the same checks), so holding one means
//! the name and password policy have already been enforced.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

pub const NAME_MAX_CHARS: usize = 32;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("name must be between 1 and {} characters", NAME_MAX_CHARS)]
    InvalidName,

    #[error(
        "password must be {}-{} characters, contain at least one letter and one digit, and contain no whitespace",
        PASSWORD_MIN_CHARS,
        PASSWORD_MAX_CHARS
    )]
    WeakPassword,
}

/// Registration body as sent by the client
#[derive(Debug, Clone, Deserialize)]
pub struct RawRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated registration. The password is checked but not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegistration")]
pub struct Registration {
    name: String,
    email: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, RegistrationError> {
        let name = name.into().trim().to_string();
        let name_len = name.chars().count();
        if name_len == 0 || name_len > NAME_MAX_CHARS {
            return Err(RegistrationError::InvalidName);
        }

        let password = password.into();
        if !password_meets_policy(&password) {
            return Err(RegistrationError::WeakPassword);
        }

        Ok(Self {
            name,
            email: email.into().trim().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TryFrom<RawRegistration> for Registration {
    type Error = RegistrationError;

    fn try_from(raw: RawRegistration) -> Result<Self, Self::Error> {
        Registration::new(raw.name, raw.email, raw.password)
    }
}

// Any Unicode decimal digit counts, not just 0-9
static DIGIT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\d").ok());

/// 8-64 non-whitespace characters with at least one ASCII letter and one
/// decimal digit
pub fn password_meets_policy(password: &str) -> bool {
    let len = password.chars().count();
    if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
        return false;
    }
    if password.chars().any(char::is_whitespace) {
        return false;
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = DIGIT.as_ref().is_some_and(|re| re.is_match(password));
    has_letter && has_digit
}
