// Copyright (c) 2025 - Cowboy AI, Inc.
//! Container workload topology composition for the Composable Information Machine
//!
//! Turns small, partially specified configuration objects into a fully
//! resolved topology: network, cluster, task definition, service,
//! autoscaling, and a monitoring dashboard with alarms.
//!
//! # Architecture
//!
//! ```text
//! TopologyRequest ──config::resolve──▶ resolved configs
//!                                          │
//!                 compose::* (one pass, dependency order)
//!                                          ▼
//!                 Template ──▶ ResolvedTopology ──deploy──▶ Provisioner
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_container_infra::adapters::NetworkCatalog;
//! use cim_container_infra::config::StackEnvironment;
//! use cim_container_infra::{synthesize, TopologyRequest};
//!
//! let request = TopologyRequest::from_json(r#"{
//!     "task": { "cpu": 512, "memory_limit_mib": 1024, "family": "webapp" },
//!     "containers": [ { "image": "repo/app:latest", "tcp_ports": [8000] } ],
//!     "service": {
//!         "exposure": { "type": "direct", "port": 8000, "publicly_reachable": false },
//!         "desired_count": 1
//!     }
//! }"#).unwrap();
//!
//! let topology = synthesize(
//!     &request,
//!     &StackEnvironment::new("my-container-infra"),
//!     &NetworkCatalog::new(),
//! )
//! .unwrap();
//! assert!(topology.declared_state().contains_key("AWS::ECS::Service"));
//! ```

pub mod adapters;
pub mod compose;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod synth;
pub mod template;

// Re-export commonly used types
pub use config::{StackEnvironment, TopologyRequest};
pub use errors::{CompositionError, CompositionResult};
pub use ports::{NetworkLookup, Provisioner};
pub use synth::{deploy, synthesize, ResolvedTopology};
pub use template::{Declaration, DeclaredState, Template};
