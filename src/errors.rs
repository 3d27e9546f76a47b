// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology composition
//!
//! Every error is raised synchronously by the composer that detects it and
//! names the configuration object and field that violated its contract.
//! None are retried internally: a failed pass must be re-run as a whole.

use thiserror::Error;

use crate::domain::LogicalIdError;

/// Errors that can occur while composing a topology
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// A required configuration field is absent and has no default
    #[error("{config}: required field `{field}` is missing")]
    MissingRequiredField {
        config: &'static str,
        field: &'static str,
    },

    /// A configuration field is present but outside its allowed range
    #[error("{config}: field `{field}` is invalid: {reason}")]
    InvalidField {
        config: &'static str,
        field: &'static str,
        reason: String,
    },

    /// Malformed container image reference
    #[error("invalid image reference `{reference}`: {reason}")]
    InvalidReference { reference: String, reason: String },

    /// Scaling bounds are inverted
    #[error("ScalingPolicy: min_count {min} exceeds max_count {max}")]
    InvalidScalingRange { min: u32, max: u32 },

    /// Task definition composed without any container
    #[error("TaskDefinition `{family}`: at least one container is required")]
    EmptyTaskDefinition { family: String },

    /// Cpu/memory pairing is not a supported Fargate size
    #[error("ResourceSizing: cpu {cpu} does not support {memory_mib} MiB of memory")]
    UnsupportedSizing { cpu: u32, memory_mib: u32 },

    /// Named network lookup failed
    #[error("network `{name}` not found")]
    NetworkNotFound { name: String },

    /// Two declarations derived the same identifier within one pass
    #[error("duplicate resource identifier `{id}`")]
    DuplicateIdentifier { id: String },

    /// Template could not be rendered
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Provisioning collaborator rejected the template
    #[error("provisioning error: {0}")]
    Provisioning(String),
}

/// Result type for composition operations
pub type CompositionResult<T> = Result<T, CompositionError>;

impl CompositionError {
    pub(crate) fn missing(config: &'static str, field: &'static str) -> Self {
        CompositionError::MissingRequiredField { config, field }
    }

    pub(crate) fn invalid(
        config: &'static str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        CompositionError::InvalidField {
            config,
            field,
            reason: reason.into(),
        }
    }
}

impl From<LogicalIdError> for CompositionError {
    fn from(err: LogicalIdError) -> Self {
        CompositionError::InvalidField {
            config: "LogicalId",
            field: "id",
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CompositionError {
    fn from(err: serde_json::Error) -> Self {
        CompositionError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CompositionError {
    fn from(err: std::io::Error) -> Self {
        CompositionError::Provisioning(err.to_string())
    }
}
