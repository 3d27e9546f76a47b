// Copyright (c) 2025 - Cowboy AI, Inc.

//! In-memory network catalog
//!
//! Answers network lookups from a fixed set of known networks, loaded from
//! JSON of the form:
//!
//! ```json
//! {
//!   "shared-vpc": {
//!     "vpc_id": "vpc-0abc",
//!     "public_subnet_ids": ["subnet-a"],
//!     "private_subnet_ids": ["subnet-b"]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ExistingNetwork;
use crate::errors::{CompositionError, CompositionResult};
use crate::ports::NetworkLookup;

/// Known networks keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkCatalog {
    networks: BTreeMap<String, ExistingNetwork>,
}

impl NetworkCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(mut self, name: impl Into<String>, network: ExistingNetwork) -> Self {
        self.insert(name, network);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, network: ExistingNetwork) {
        self.networks.insert(name.into(), network);
    }

    pub fn from_json(text: &str) -> CompositionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> CompositionResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            CompositionError::Serialization(format!("reading {}: {e}", path.display()))
        })?;
        let catalog = Self::from_json(&text)?;
        debug!("Loaded {} known networks from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl NetworkLookup for NetworkCatalog {
    fn lookup(&self, name: &str) -> CompositionResult<ExistingNetwork> {
        match self.networks.get(name) {
            Some(network) => Ok(network.clone()),
            None => {
                warn!("Network `{}` is not in the catalog", name);
                Err(CompositionError::NetworkNotFound {
                    name: name.to_string(),
                })
            }
        }
    }
}
