// ABOUTME: Function name validation.
// ABOUTME: Names are 1-64 characters of ASCII letters, digits, hyphens, and underscores.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum FunctionNameError {
    #[error("function name cannot be empty")]
    Empty,

    #[error("function name exceeds maximum length of 64 characters")]
    TooLong,

    #[error("invalid character in function name: '{0}'")]
    InvalidChar(char),
}

/// Name of the remote function, unique within an account and region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn new(value: &str) -> Result<Self, FunctionNameError> {
        if value.is_empty() {
            return Err(FunctionNameError::Empty);
        }

        if value.len() > MAX_LEN {
            return Err(FunctionNameError::TooLong);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(FunctionNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FunctionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
