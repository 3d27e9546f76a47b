// Copyright (c) 2025 - Cowboy AI, Inc.
//! Default Resolution
//!
//! Pure functions that replace every absent optional field with its
//! documented default, or fail with
//! [`CompositionError::MissingRequiredField`] when the field has none.
//!
//! # Defaults
//!
//! | Field                          | Default                                   |
//! |--------------------------------|-------------------------------------------|
//! | network                        | provision `my-vpc`, 1 NAT gateway, 2 AZs  |
//! | network cidr                   | `10.0.0.0/16`                             |
//! | cluster observability          | disabled                                  |
//! | scaling `min_count`            | 1                                         |
//! | monitoring `alarm_name_prefix` | dashboard name                            |
//! | monitoring strategy            | `Notify(topic)` iff topic, else `NoOp`    |

use std::collections::HashSet;

use super::{
    ClusterConfig, ClusterRequest, ContainerConfig, ContainerSpec, MonitoringConfig,
    NetworkConfig, NetworkRequest, ResolvedMonitoringConfig, ScalingConfig, ServiceConfig,
    ServiceSpec, StackEnvironment, TaskConfig,
};
use crate::domain::{
    AlarmRoutingStrategy, ImageReference, Ipv4Cidr, NetworkHandle, NetworkTopology, Port,
    ResourceSizing, ScalingPolicy,
};
use crate::errors::{CompositionError, CompositionResult};

/// Name tag of a provisioned network when none is given
pub const DEFAULT_NETWORK_NAME: &str = "my-vpc";

/// NAT gateways of a provisioned network when none is given
pub const DEFAULT_NAT_GATEWAYS: u8 = 1;

/// Availability zones of a provisioned network when none is given
pub const DEFAULT_MAX_AZS: u8 = 2;

/// Address block of a provisioned network when none is given
pub const DEFAULT_NETWORK_CIDR: &str = "10.0.0.0/16";

/// Lower scaling bound when none is given
pub const DEFAULT_MIN_COUNT: u32 = 1;

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Resolve the network request
///
/// A lookup name from the config wins, then the `vpcname` context value;
/// otherwise a new network is provisioned.
pub fn resolve_network(
    config: &NetworkConfig,
    env: &StackEnvironment,
) -> CompositionResult<NetworkRequest> {
    if let Some(name) = non_empty(config.lookup_name.as_ref()).or_else(|| env.vpc_name()) {
        return Ok(NetworkRequest::Lookup {
            name: name.to_string(),
        });
    }

    let nat_gateways = config.nat_gateways.unwrap_or(DEFAULT_NAT_GATEWAYS);
    let max_azs = config.max_azs.unwrap_or(DEFAULT_MAX_AZS);

    if max_azs == 0 || max_azs > NetworkTopology::MAX_AZS {
        return Err(CompositionError::invalid(
            "NetworkConfig",
            "max_azs",
            format!("{max_azs} is outside 1..={}", NetworkTopology::MAX_AZS),
        ));
    }
    if nat_gateways > max_azs {
        return Err(CompositionError::invalid(
            "NetworkConfig",
            "nat_gateways",
            format!("{nat_gateways} exceeds max_azs ({max_azs})"),
        ));
    }

    let cidr = match config.cidr {
        Some(cidr) => cidr,
        None => Ipv4Cidr::new(DEFAULT_NETWORK_CIDR)
            .map_err(|e| CompositionError::invalid("NetworkConfig", "cidr", e.to_string()))?,
    };
    if cidr.prefix_length() > NetworkTopology::SUBNET_PREFIX - 4 {
        return Err(CompositionError::invalid(
            "NetworkConfig",
            "cidr",
            format!("{cidr} is too small to hold 16 /{} subnets", NetworkTopology::SUBNET_PREFIX),
        ));
    }

    Ok(NetworkRequest::Provision(NetworkTopology {
        name: non_empty(config.name.as_ref())
            .unwrap_or(DEFAULT_NETWORK_NAME)
            .to_string(),
        cidr,
        nat_gateways,
        max_azs,
    }))
}

/// Resolve cluster settings against an already provided network
pub fn resolve_cluster(request: &ClusterRequest, network: NetworkHandle) -> ClusterConfig {
    ClusterConfig::new(network).with_observability(request.observability_enabled.unwrap_or(false))
}

/// Resolve task sizing; cpu, memory and family have no defaults
pub fn resolve_task(config: &TaskConfig) -> CompositionResult<ResourceSizing> {
    let cpu = config
        .cpu
        .ok_or_else(|| CompositionError::missing("TaskConfig", "cpu"))?;
    let memory_limit_mib = config
        .memory_limit_mib
        .ok_or_else(|| CompositionError::missing("TaskConfig", "memory_limit_mib"))?;
    let family = non_empty(config.family.as_ref())
        .ok_or_else(|| CompositionError::missing("TaskConfig", "family"))?;

    ResourceSizing::new(cpu, memory_limit_mib, family)
}

/// Resolve one container; ports must be valid and distinct
pub fn resolve_container(config: &ContainerConfig) -> CompositionResult<ContainerSpec> {
    let image = non_empty(config.image.as_ref())
        .ok_or_else(|| CompositionError::missing("ContainerConfig", "image"))?;
    let image = ImageReference::parse(image)?;

    let mut seen = HashSet::new();
    let mut tcp_ports = Vec::with_capacity(config.tcp_ports.len());
    for raw in &config.tcp_ports {
        let port = Port::new(*raw)
            .map_err(|e| CompositionError::invalid("ContainerConfig", "tcp_ports", e.to_string()))?;
        if !seen.insert(port) {
            return Err(CompositionError::invalid(
                "ContainerConfig",
                "tcp_ports",
                format!("port {port} is listed twice"),
            ));
        }
        tcp_ports.push(port);
    }

    Ok(ContainerSpec { image, tcp_ports })
}

/// Resolve service settings; exposure and desired count are required
pub fn resolve_service(config: &ServiceConfig) -> CompositionResult<ServiceSpec> {
    let exposure = config
        .exposure
        .ok_or_else(|| CompositionError::missing("ServiceConfig", "exposure"))?;
    let desired_count = config
        .desired_count
        .ok_or_else(|| CompositionError::missing("ServiceConfig", "desired_count"))?;

    Ok(ServiceSpec {
        exposure,
        desired_count,
        service_name: non_empty(config.service_name.as_ref()).map(str::to_string),
    })
}

/// Resolve scaling; the range itself is checked when the policy is attached
pub fn resolve_scaling(config: &ScalingConfig) -> CompositionResult<ScalingPolicy> {
    Ok(ScalingPolicy {
        min_count: config.min_count.unwrap_or(DEFAULT_MIN_COUNT),
        max_count: config
            .max_count
            .ok_or_else(|| CompositionError::missing("ScalingConfig", "max_count"))?,
        cpu_target_percent: config
            .cpu_target_percent
            .ok_or_else(|| CompositionError::missing("ScalingConfig", "cpu_target_percent"))?,
        memory_target_percent: config
            .memory_target_percent
            .ok_or_else(|| CompositionError::missing("ScalingConfig", "memory_target_percent"))?,
    })
}

/// Resolve monitoring: prefix falls back to the dashboard name, and the
/// routing strategy is `Notify` exactly when a topic is present
pub fn resolve_monitoring(config: &MonitoringConfig) -> CompositionResult<ResolvedMonitoringConfig> {
    let dashboard_name = non_empty(config.dashboard_name.as_ref())
        .ok_or_else(|| CompositionError::missing("MonitoringConfig", "dashboard_name"))?
        .to_string();

    let alarm_name_prefix = non_empty(config.alarm_name_prefix.as_ref())
        .map(str::to_string)
        .unwrap_or_else(|| dashboard_name.clone());

    Ok(ResolvedMonitoringConfig {
        strategy: AlarmRoutingStrategy::select(config.alarm_topic.as_ref()),
        dashboard_name,
        alarm_name_prefix,
    })
}
