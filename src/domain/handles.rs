// Copyright (c) 2025 - Cowboy AI, Inc.
//! Composed Resource Handles
//!
//! Handles are what one composer returns and the next one consumes. They
//! are immutable once returned and are compared by identity only; nothing
//! downstream reaches into the declaration a handle stands for.

use serde::Serialize;

use super::{Cpu, ImageReference, LogicalId, NetworkHandle, Port, ResourceRef};

/// Cluster bound to a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterHandle {
    id: LogicalId,
    network: NetworkHandle,
    observability_enabled: bool,
}

impl ClusterHandle {
    pub(crate) fn new(id: LogicalId, network: NetworkHandle, observability_enabled: bool) -> Self {
        Self {
            id,
            network,
            observability_enabled,
        }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    pub fn network(&self) -> &NetworkHandle {
        &self.network
    }

    pub fn observability_enabled(&self) -> bool {
        self.observability_enabled
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef::Ref(self.id.clone())
    }
}

/// Log retention windows offered by the logging sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionWindow {
    OneDay,
    OneWeek,
    OneMonth,
}

impl RetentionWindow {
    pub fn days(&self) -> u32 {
        match self {
            RetentionWindow::OneDay => 1,
            RetentionWindow::OneWeek => 7,
            RetentionWindow::OneMonth => 30,
        }
    }
}

/// Logging sink attached to one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSink {
    pub log_group: LogicalId,
    pub stream_prefix: String,
    pub retention: RetentionWindow,
}

/// Protocol of a port mapping; only TCP is ever declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
        }
    }
}

/// Container port exposed by a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PortMapping {
    pub container_port: Port,
    pub protocol: Protocol,
}

/// Container attached to a task definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerHandle {
    pub name: String,
    pub image: ImageReference,
    pub port_mappings: Vec<PortMapping>,
    pub log_sink: LogSink,
}

/// Task definition with its ordered containers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDefinitionHandle {
    id: LogicalId,
    family: String,
    cpu: Cpu,
    memory_limit_mib: u32,
    containers: Vec<ContainerHandle>,
}

impl TaskDefinitionHandle {
    pub(crate) fn new(
        id: LogicalId,
        family: impl Into<String>,
        cpu: Cpu,
        memory_limit_mib: u32,
        containers: Vec<ContainerHandle>,
    ) -> Self {
        Self {
            id,
            family: family.into(),
            cpu,
            memory_limit_mib,
            containers,
        }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn cpu(&self) -> Cpu {
        self.cpu
    }

    pub fn memory_limit_mib(&self) -> u32 {
        self.memory_limit_mib
    }

    pub fn containers(&self) -> &[ContainerHandle] {
        &self.containers
    }

    /// First container; the one a load balancer routes to
    pub fn default_container(&self) -> Option<&ContainerHandle> {
        self.containers.first()
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef::Ref(self.id.clone())
    }
}

/// Load-balancing front end of a service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadBalancerHandle {
    pub id: LogicalId,
    pub listener: LogicalId,
    pub target_group: LogicalId,
    pub internet_facing: bool,
    pub listener_port: Port,
    pub endpoint_output: String,
}

impl LoadBalancerHandle {
    pub fn scheme(&self) -> &'static str {
        if self.internet_facing {
            "internet-facing"
        } else {
            "internal"
        }
    }
}

/// Service running a task definition on a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHandle {
    id: LogicalId,
    cluster: LogicalId,
    task_definition: LogicalId,
    desired_count: u32,
    security_group: LogicalId,
    front_end: Option<LoadBalancerHandle>,
}

impl ServiceHandle {
    pub(crate) fn new(
        id: LogicalId,
        cluster: LogicalId,
        task_definition: LogicalId,
        desired_count: u32,
        security_group: LogicalId,
        front_end: Option<LoadBalancerHandle>,
    ) -> Self {
        Self {
            id,
            cluster,
            task_definition,
            desired_count,
            security_group,
            front_end,
        }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    /// Underlying service reference
    pub fn service(&self) -> ResourceRef {
        ResourceRef::Ref(self.id.clone())
    }

    pub fn cluster(&self) -> &LogicalId {
        &self.cluster
    }

    pub fn task_definition(&self) -> &LogicalId {
        &self.task_definition
    }

    pub fn desired_count(&self) -> u32 {
        self.desired_count
    }

    pub fn security_group(&self) -> &LogicalId {
        &self.security_group
    }

    pub fn front_end(&self) -> Option<&LoadBalancerHandle> {
        self.front_end.as_ref()
    }
}

/// Metric a utilization policy tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationMetric {
    Cpu,
    Memory,
}

impl UtilizationMetric {
    pub fn predefined_metric_type(&self) -> &'static str {
        match self {
            UtilizationMetric::Cpu => "ECSServiceAverageCPUUtilization",
            UtilizationMetric::Memory => "ECSServiceAverageMemoryUtilization",
        }
    }

    pub fn segment(&self) -> &'static str {
        match self {
            UtilizationMetric::Cpu => "scale-on-cpu",
            UtilizationMetric::Memory => "scale-on-memory",
        }
    }
}

/// One target-tracking policy on a scalable target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UtilizationPolicy {
    pub id: LogicalId,
    pub metric: UtilizationMetric,
    pub target_percent: f64,
}

/// Autoscaling attached to a service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingAttachmentHandle {
    pub target: LogicalId,
    pub service: LogicalId,
    pub min_count: u32,
    pub max_count: u32,
    pub policies: Vec<UtilizationPolicy>,
}

impl ScalingAttachmentHandle {
    pub fn policy(&self, metric: UtilizationMetric) -> Option<&UtilizationPolicy> {
        self.policies.iter().find(|p| p.metric == metric)
    }
}

/// Notification topic alarms can route to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TopicHandle {
    id: LogicalId,
}

impl TopicHandle {
    pub(crate) fn new(id: LogicalId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> &LogicalId {
        &self.id
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef::Ref(self.id.clone())
    }
}
