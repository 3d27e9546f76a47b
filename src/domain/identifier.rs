// Copyright (c) 2025 - Cowboy AI, Inc.
//! Logical Identifier Value Object
//!
//! Every declaration in a template is keyed by a [`LogicalId`]. Child
//! resources derive their identifiers from their parent's identifier, so the
//! same inputs always produce the same identifiers across synthesis passes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Logical identifier validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogicalIdError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier exceeds maximum length of 255 characters: {0}")]
    TooLong(usize),

    #[error("Identifier segment is empty: {0}")]
    EmptySegment(String),

    #[error("Invalid character in identifier: {0}")]
    InvalidCharacter(char),
}

/// Stable identifier of one declared resource
///
/// Invariants:
/// - Non-empty, at most 255 characters
/// - Segments separated by `/`, none of them empty
/// - Segments contain only ASCII alphanumerics, `-`, `_` and `.`
///
/// # Examples
///
/// ```rust
/// use cim_container_infra::domain::LogicalId;
///
/// let taskdef = LogicalId::new("taskdef-webapp").unwrap();
/// let container = taskdef.child("container-app").unwrap();
/// assert_eq!(container.as_str(), "taskdef-webapp/container-app");
///
/// assert!(LogicalId::new("").is_err());
/// assert!(LogicalId::new("a//b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LogicalId(String);

impl LogicalId {
    /// Maximum total identifier length
    pub const MAX_LENGTH: usize = 255;

    /// Segment separator used for child identifiers
    pub const SEPARATOR: char = '/';

    /// Create a new identifier with validation
    pub fn new(id: impl Into<String>) -> Result<Self, LogicalIdError> {
        let id = id.into();

        if id.is_empty() {
            return Err(LogicalIdError::Empty);
        }

        if id.len() > Self::MAX_LENGTH {
            return Err(LogicalIdError::TooLong(id.len()));
        }

        for segment in id.split(Self::SEPARATOR) {
            Self::validate_segment(segment, &id)?;
        }

        Ok(Self(id))
    }

    fn validate_segment(segment: &str, whole: &str) -> Result<(), LogicalIdError> {
        if segment.is_empty() {
            return Err(LogicalIdError::EmptySegment(whole.to_string()));
        }

        for ch in segment.chars() {
            if !is_identifier_char(ch) {
                return Err(LogicalIdError::InvalidCharacter(ch));
            }
        }

        Ok(())
    }

    /// Derive a child identifier scoped under this one
    pub fn child(&self, segment: impl AsRef<str>) -> Result<Self, LogicalIdError> {
        Self::new(format!("{}{}{}", self.0, Self::SEPARATOR, segment.as_ref()))
    }

    /// Derive a sibling identifier by appending a suffix to the last segment
    pub fn suffixed(&self, suffix: impl AsRef<str>) -> Result<Self, LogicalIdError> {
        Self::new(format!("{}-{}", self.0, suffix.as_ref()))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment
    pub fn leaf(&self) -> &str {
        self.0.rsplit(Self::SEPARATOR).next().unwrap_or(&self.0)
    }

    /// Check whether `other` lives underneath this identifier
    pub fn is_ancestor_of(&self, other: &LogicalId) -> bool {
        other
            .0
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest.starts_with(Self::SEPARATOR))
    }
}

/// Characters allowed inside one identifier segment
pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.'
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LogicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LogicalId {
    type Error = LogicalIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LogicalId {
    type Error = LogicalIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LogicalId> for String {
    fn from(value: LogicalId) -> Self {
        value.0
    }
}
