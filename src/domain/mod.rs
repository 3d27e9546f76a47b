// Copyright (c) 2025 - Cowboy AI, Inc.
//! Container Topology Domain Models
//!
//! Value objects and handles shared by every composer.
//!
//! # Value Objects with Invariants
//!
//! - [`LogicalId`] - Stable, path-shaped declaration identifiers
//! - [`ImageReference`] - `[registry/]repo[:tag]` with derived short name
//! - [`ResourceSizing`] - Fargate cpu/memory pairing plus task family
//! - [`Ipv4Cidr`] - IPv4 block with subnet carving
//! - [`Port`] - TCP port (1-65535)
//! - [`ResourceType`] - Declared resource taxonomy
//!
//! # Handles
//!
//! Opaque, immutable results of composition: [`NetworkHandle`],
//! [`ClusterHandle`], [`TaskDefinitionHandle`], [`ServiceHandle`],
//! [`ScalingAttachmentHandle`], [`TopicHandle`]. Dependents use them for
//! identity and references only.

pub mod handles;
pub mod identifier;
pub mod naming;
pub mod network;
pub mod policy;
pub mod reference;
pub mod resource_type;
pub mod sizing;

pub use handles::{
    ClusterHandle, ContainerHandle, LoadBalancerHandle, LogSink, PortMapping, Protocol,
    RetentionWindow, ScalingAttachmentHandle, ServiceHandle, TaskDefinitionHandle, TopicHandle,
    UtilizationMetric, UtilizationPolicy,
};
pub use identifier::{LogicalId, LogicalIdError};
pub use naming::{derive_short_name, escape_segment, ImageReference};
pub use network::{
    ExistingNetwork, Ipv4Cidr, NetworkError, NetworkHandle, NetworkOrigin, NetworkTopology, Port,
};
pub use policy::{
    AlarmRoutingStrategy, AlarmThreshold, ComparisonOperator, ExposurePolicy, ScalingPolicy,
    ServiceMetric,
};
pub use reference::ResourceRef;
pub use resource_type::{ResourceCategory, ResourceType};
pub use sizing::{Cpu, ResourceSizing};
