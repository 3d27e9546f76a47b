// Copyright (c) 2025 - Cowboy AI, Inc.
//! Naming Policy
//!
//! Deterministic identifier derivation. The same configuration always maps
//! to the same identifiers, which is what keeps repeated synthesis
//! idempotent without caching any instances between passes.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

use super::identifier::{is_identifier_char, LogicalId};
use crate::errors::{CompositionError, CompositionResult};

/// Container image reference in `[registry/]repo[:tag]` form
///
/// # Examples
///
/// ```rust
/// use cim_container_infra::domain::ImageReference;
///
/// let image = ImageReference::parse("public.ecr.aws/aws-containers/hello-app-runner:latest").unwrap();
/// assert_eq!(image.short_name(), "hello-app-runner");
/// assert_eq!(image.tag(), Some("latest"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageReference {
    reference: String,
    short_name: String,
}

impl ImageReference {
    /// Parse and validate an image reference
    pub fn parse(reference: impl Into<String>) -> CompositionResult<Self> {
        let reference = reference.into();
        let short_name = derive_short_name(&reference)?;
        Ok(Self {
            reference,
            short_name,
        })
    }

    /// Full reference, used verbatim as the container image
    pub fn as_str(&self) -> &str {
        &self.reference
    }

    /// Name without registry path and tag
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Tag after the last `:` of the final path segment
    pub fn tag(&self) -> Option<&str> {
        last_segment(&self.reference)
            .rsplit_once(':')
            .map(|(_, tag)| tag)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference)
    }
}

impl TryFrom<String> for ImageReference {
    type Error = CompositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ImageReference> for String {
    fn from(value: ImageReference) -> Self {
        value.reference
    }
}

fn last_segment(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Derive the short image name from a reference
///
/// Drops everything up to the last `/`, then everything from the last `:`.
pub fn derive_short_name(reference: &str) -> CompositionResult<String> {
    let invalid = |reason: &str| CompositionError::InvalidReference {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };

    if reference.trim().is_empty() {
        return Err(invalid("reference is empty"));
    }
    if reference.chars().any(char::is_whitespace) {
        return Err(invalid("reference contains whitespace"));
    }

    let name_with_tag = last_segment(reference);
    let name = name_with_tag
        .rsplit_once(':')
        .map_or(name_with_tag, |(name, _)| name);

    if name.is_empty() {
        return Err(invalid("image name is empty"));
    }
    if let Some(ch) = name.chars().find(|ch| !is_identifier_char(*ch)) {
        return Err(invalid(&format!("image name contains `{ch}`")));
    }

    Ok(name.to_string())
}

/// Encode free-form text as one identifier segment
///
/// ASCII letters, digits and `-` are kept as they are. `_` becomes `__` and
/// every other byte becomes `_` followed by two lowercase hex digits, so
/// distinct inputs always map to distinct segments.
pub fn escape_segment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' => out.push(char::from(byte)),
            b'_' => out.push_str("__"),
            other => {
                let _ = write!(out, "_{other:02x}");
            }
        }
    }
    out
}

/// `container-<short name>`
pub fn container_id(image: &ImageReference) -> String {
    format!("container-{}", image.short_name())
}

/// `taskdef-<family>`
pub fn task_definition_id(family: &str) -> CompositionResult<LogicalId> {
    LogicalId::new(format!("taskdef-{family}"))
        .map_err(|e| CompositionError::invalid("TaskConfig", "family", e.to_string()))
}

/// `service-<family>`
pub fn service_id(family: &str) -> CompositionResult<LogicalId> {
    LogicalId::new(format!("service-{family}"))
        .map_err(|e| CompositionError::invalid("TaskConfig", "family", e.to_string()))
}
