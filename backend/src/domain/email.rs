//! Respondent identity.
//!
//! A respondent is identified by a plain email string for the duration of a
//! survey run. This is an identity label, not a verified account; validation
//! is structural only.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`RespondentEmail::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailValidationError {
    Empty,
    MissingAtSign,
    ContainsWhitespace,
    TooLong { max: usize },
}

impl fmt::Display for EmailValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "email must not be empty"),
            Self::MissingAtSign => {
                write!(f, "email must contain an @ with text on both sides")
            }
            Self::ContainsWhitespace => write!(f, "email must not contain whitespace"),
            Self::TooLong { max } => write!(f, "email must be at most {max} characters"),
        }
    }
}

impl std::error::Error for EmailValidationError {}

/// Maximum accepted email length.
pub const EMAIL_MAX: usize = 254;

/// Validated respondent email address.
///
/// ## Invariants
/// - non-empty after trimming, no interior whitespace;
/// - contains a single-side-delimiting `@` with text on both sides;
/// - at most [`EMAIL_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RespondentEmail(String);

impl RespondentEmail {
    /// Validate and construct a [`RespondentEmail`], trimming outer whitespace.
    pub fn new(email: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        Self::from_owned(email.as_ref().trim().to_owned())
    }

    fn from_owned(email: String) -> Result<Self, EmailValidationError> {
        if email.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if email.chars().count() > EMAIL_MAX {
            return Err(EmailValidationError::TooLong { max: EMAIL_MAX });
        }
        if email.chars().any(char::is_whitespace) {
            return Err(EmailValidationError::ContainsWhitespace);
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(EmailValidationError::MissingAtSign),
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for RespondentEmail {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RespondentEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<RespondentEmail> for String {
    fn from(value: RespondentEmail) -> Self {
        value.0
    }
}

impl TryFrom<String> for RespondentEmail {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value.trim().to_owned())
    }
}
