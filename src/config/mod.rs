// Copyright (c) 2025 - Cowboy AI, Inc.
//! Requested and Resolved Configuration
//!
//! Callers supply *requested* configuration: small structs whose optional
//! fields may be left out. [`resolve`] turns each of them into a *resolved*
//! struct in which every field is concrete. Resolution is a pure function
//! of its input; the requested struct is never mutated.
//!
//! ```text
//! NetworkConfig    ──resolve_network───▶ NetworkRequest
//! ClusterRequest   ──resolve_cluster───▶ ClusterConfig
//! TaskConfig       ──resolve_task──────▶ ResourceSizing
//! ContainerConfig  ──resolve_container─▶ ContainerSpec
//! ServiceConfig    ──resolve_service───▶ ServiceSpec
//! ScalingConfig    ──resolve_scaling───▶ ScalingPolicy
//! MonitoringConfig ──resolve_monitoring▶ ResolvedMonitoringConfig
//! ```

pub mod environment;
pub mod resolve;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{
    AlarmRoutingStrategy, AlarmThreshold, Cpu, ExposurePolicy, ImageReference, Ipv4Cidr,
    NetworkHandle, NetworkTopology, Port, TopicHandle,
};

pub use environment::StackEnvironment;

/// Requested network: look one up by name or provision a new one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Existing network to look up; wins over every provisioning field
    pub lookup_name: Option<String>,
    /// Name tag of a provisioned network
    pub name: Option<String>,
    pub cidr: Option<Ipv4Cidr>,
    pub nat_gateways: Option<u8>,
    pub max_azs: Option<u8>,
}

/// Resolved network request handed to the network provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NetworkRequest {
    Lookup { name: String },
    Provision(NetworkTopology),
}

/// Requested cluster settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRequest {
    pub id: Option<String>,
    pub observability_enabled: Option<bool>,
}

/// Resolved cluster configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    pub network: NetworkHandle,
    pub observability_enabled: bool,
}

impl ClusterConfig {
    /// Cluster on `network` with observability off
    pub fn new(network: NetworkHandle) -> Self {
        Self {
            network,
            observability_enabled: false,
        }
    }

    pub fn with_observability(mut self, enabled: bool) -> Self {
        self.observability_enabled = enabled;
        self
    }
}

/// Requested task sizing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub cpu: Option<Cpu>,
    pub memory_limit_mib: Option<u32>,
    pub family: Option<String>,
}

/// Requested container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub image: Option<String>,
    pub tcp_ports: Vec<u32>,
}

/// Resolved container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSpec {
    pub image: ImageReference,
    pub tcp_ports: Vec<Port>,
}

/// Requested service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub exposure: Option<ExposurePolicy>,
    pub desired_count: Option<u32>,
    pub service_name: Option<String>,
}

/// Resolved service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSpec {
    pub exposure: ExposurePolicy,
    pub desired_count: u32,
    pub service_name: Option<String>,
}

/// Requested scaling bounds and targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub cpu_target_percent: Option<f64>,
    pub memory_target_percent: Option<f64>,
}

/// Requested monitoring facade
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitoringConfig {
    pub dashboard_name: Option<String>,
    pub alarm_topic: Option<TopicHandle>,
    pub alarm_name_prefix: Option<String>,
}

impl MonitoringConfig {
    pub fn new(dashboard_name: impl Into<String>) -> Self {
        Self {
            dashboard_name: Some(dashboard_name.into()),
            ..Self::default()
        }
    }

    pub fn with_alarm_topic(mut self, topic: TopicHandle) -> Self {
        self.alarm_topic = Some(topic);
        self
    }

    pub fn with_alarm_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.alarm_name_prefix = Some(prefix.into());
        self
    }
}

/// Resolved monitoring facade configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMonitoringConfig {
    pub dashboard_name: String,
    pub strategy: AlarmRoutingStrategy,
    pub alarm_name_prefix: String,
}

/// Requested notification topic for alarms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicRequest {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub email_subscriptions: Vec<String>,
}

/// One `monitor_service` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceMonitorRequest {
    pub display_name: Option<String>,
    pub thresholds: Option<BTreeMap<String, AlarmThreshold>>,
}

/// Requested monitoring for the whole topology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringRequest {
    pub dashboard_name: Option<String>,
    pub alarm_name_prefix: Option<String>,
    pub header: Option<String>,
    pub services: Vec<ServiceMonitorRequest>,
}

/// Everything one synthesis pass needs, as loaded from a config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyRequest {
    pub network: NetworkConfig,
    pub cluster: ClusterRequest,
    pub task: TaskConfig,
    pub containers: Vec<ContainerConfig>,
    pub service: ServiceConfig,
    pub scaling: Option<ScalingConfig>,
    pub alarm_topic: Option<TopicRequest>,
    pub monitoring: Option<MonitoringRequest>,
}

impl TopologyRequest {
    /// Parse a request from JSON text
    pub fn from_json(text: &str) -> crate::errors::CompositionResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
