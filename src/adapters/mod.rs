// Copyright (c) 2025 - Cowboy AI, Inc.

//! Collaborator adapter implementations
//!
//! Concrete implementations of the [`crate::ports`] traits.

pub mod manifest;
pub mod network_catalog;

pub use manifest::ManifestWriter;
pub use network_catalog::NetworkCatalog;
