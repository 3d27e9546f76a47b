// Copyright (c) 2025 - Cowboy AI, Inc.

//! Collaborator Ports
//!
//! The composition core talks to the outside world through exactly two
//! seams: reading an existing network by name, and registering a finished
//! template with whatever provisions it.
//!
//! # Architecture
//!
//! ```text
//! TopologyRequest ──synthesize──> Template ──deploy──> Provisioner
//!                      │
//!                      └── NetworkLookup (read existing by name)
//! ```
//!
//! # Example Implementation
//!
//! ```rust
//! use cim_container_infra::ports::Provisioner;
//! use cim_container_infra::{CompositionResult, Template};
//!
//! struct CountingProvisioner(usize);
//!
//! impl Provisioner for CountingProvisioner {
//!     fn register(&mut self, template: &Template) -> CompositionResult<()> {
//!         self.0 += template.len();
//!         Ok(())
//!     }
//! }
//! ```

use crate::domain::ExistingNetwork;
use crate::errors::CompositionResult;
use crate::template::Template;

/// Read-only lookup of networks that already exist
pub trait NetworkLookup {
    /// Find a network by its name tag
    ///
    /// Fails with [`crate::CompositionError::NetworkNotFound`] when absent.
    fn lookup(&self, name: &str) -> CompositionResult<ExistingNetwork>;
}

/// Consumer of a finished template
///
/// `register` is called at most once per pass, and only after every
/// composer has succeeded; a partial template is never registered.
pub trait Provisioner {
    fn register(&mut self, template: &Template) -> CompositionResult<()>;
}

impl<T: NetworkLookup + ?Sized> NetworkLookup for &T {
    fn lookup(&self, name: &str) -> CompositionResult<ExistingNetwork> {
        (**self).lookup(name)
    }
}
