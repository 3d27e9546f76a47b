// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Environment
//!
//! Account, region and lookup context for one synthesis pass. This is
//! passed in explicitly; composers never read process environment.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Explicit stack context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEnvironment {
    pub stack_name: String,
    pub account: Option<String>,
    pub region: Option<String>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl StackEnvironment {
    /// Context key naming an existing network to look up
    pub const VPC_NAME_CONTEXT: &'static str = "vpcname";

    /// Environment variable holding the target account
    pub const ACCOUNT_VAR: &'static str = "CDK_DEFAULT_ACCOUNT";

    /// Environment variable holding the target region
    pub const REGION_VAR: &'static str = "CDK_DEFAULT_REGION";

    pub fn new(stack_name: impl Into<String>) -> Self {
        Self {
            stack_name: stack_name.into(),
            account: None,
            region: None,
            context: BTreeMap::new(),
        }
    }

    /// Load account and region from environment variables
    pub fn from_env(stack_name: impl Into<String>) -> Self {
        Self {
            account: std::env::var(Self::ACCOUNT_VAR).ok().filter(|v| !v.is_empty()),
            region: std::env::var(Self::REGION_VAR).ok().filter(|v| !v.is_empty()),
            ..Self::new(stack_name)
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Network name requested through context, if any
    pub fn vpc_name(&self) -> Option<&str> {
        self.context_value(Self::VPC_NAME_CONTEXT)
    }
}
