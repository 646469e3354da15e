//! Identifier types for the workshop domain.

use super::WorkshopDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a job (one vehicle visit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Creates a new random job identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a job identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Engineer (technician) identifier such as `ENG001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineerId(String);

impl EngineerId {
    /// Creates a validated engineer identifier.
    ///
    /// Surrounding whitespace is trimmed; case is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::EmptyEngineerId`] when the value is
    /// empty after trimming, or [`WorkshopDomainError::InvalidEngineerId`]
    /// when it contains interior whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkshopDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkshopDomainError::EmptyEngineerId);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(WorkshopDomainError::InvalidEngineerId(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EngineerId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EngineerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Catalogue task code such as `T001`.
///
/// Codes are normalised to upper case so `t001` and `T001` name the same
/// task.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCode(String);

impl TaskCode {
    /// Creates a validated task code.
    ///
    /// # Errors
    ///
    /// Returns [`WorkshopDomainError::EmptyTaskCode`] when the value is empty
    /// after trimming, or [`WorkshopDomainError::InvalidTaskCode`] when it
    /// contains interior whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkshopDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkshopDomainError::EmptyTaskCode);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(WorkshopDomainError::InvalidTaskCode(raw));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Wraps a compile-time catalogue code that is already normalised.
    pub(crate) fn from_static(code: &'static str) -> Self {
        Self(code.to_owned())
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
