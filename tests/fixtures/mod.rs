// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-container-infra
//!
//! Deterministic topology requests shared by the integration suites.
//!
//! # Design Principles
//! - Fixtures are the only place that builds whole requests
//! - Every value is a fixed constant; repeated runs produce identical templates

#![allow(dead_code)]

use std::collections::BTreeMap;

use cim_container_infra::adapters::NetworkCatalog;
use cim_container_infra::config::{
    ContainerConfig, MonitoringRequest, ScalingConfig, ServiceConfig, ServiceMonitorRequest,
    TaskConfig, TopicRequest,
};
use cim_container_infra::domain::{AlarmThreshold, Cpu, ExistingNetwork, ExposurePolicy, Port};
use cim_container_infra::{StackEnvironment, TopologyRequest};

pub const STACK_NAME: &str = "my-container-infra";
pub const FAMILY: &str = "webapp";
pub const IMAGE: &str = "repo/app:latest";
pub const SHARED_NETWORK: &str = "shared";
pub const SHARED_VPC_ID: &str = "vpc-0a1b2c3d4e5f60718";

pub fn port(value: u32) -> Port {
    Port::new(value).expect("Invalid port in test fixture")
}

pub fn env() -> StackEnvironment {
    StackEnvironment::new(STACK_NAME)
}

/// Catalog holding one existing network named [`SHARED_NETWORK`]
pub fn shared_catalog() -> NetworkCatalog {
    NetworkCatalog::new().with_network(
        SHARED_NETWORK,
        ExistingNetwork {
            vpc_id: SHARED_VPC_ID.to_string(),
            public_subnet_ids: vec!["subnet-public-1".into(), "subnet-public-2".into()],
            private_subnet_ids: vec!["subnet-private-1".into(), "subnet-private-2".into()],
        },
    )
}

pub fn load_balanced(listener_port: u32, publicly_reachable: bool) -> ExposurePolicy {
    ExposurePolicy::LoadBalanced {
        listener_port: port(listener_port),
        publicly_reachable,
    }
}

pub fn direct(value: u32, publicly_reachable: bool) -> ExposurePolicy {
    ExposurePolicy::Direct {
        port: port(value),
        publicly_reachable,
    }
}

/// cpu 512 / 1024 MiB `webapp` task with one `repo/app:latest` container on 8000
pub fn webapp_request(exposure: ExposurePolicy, desired_count: u32) -> TopologyRequest {
    TopologyRequest {
        task: TaskConfig {
            cpu: Some(Cpu::Half),
            memory_limit_mib: Some(1024),
            family: Some(FAMILY.into()),
        },
        containers: vec![ContainerConfig {
            image: Some(IMAGE.into()),
            tcp_ports: vec![8000],
        }],
        service: ServiceConfig {
            exposure: Some(exposure),
            desired_count: Some(desired_count),
            service_name: None,
        },
        ..TopologyRequest::default()
    }
}

pub fn scaling(min_count: u32, max_count: u32) -> ScalingConfig {
    ScalingConfig {
        min_count: Some(min_count),
        max_count: Some(max_count),
        cpu_target_percent: Some(50.0),
        memory_target_percent: Some(70.0),
    }
}

pub fn alarm_topic() -> TopicRequest {
    TopicRequest {
        id: None,
        display_name: Some("webapp alarms".into()),
        email_subscriptions: vec!["ops@example.com".into()],
    }
}

pub fn thresholds(entries: &[(&str, AlarmThreshold)]) -> BTreeMap<String, AlarmThreshold> {
    entries
        .iter()
        .map(|(key, threshold)| (key.to_string(), *threshold))
        .collect()
}

pub fn monitor(display_name: &str, entries: &[(&str, AlarmThreshold)]) -> ServiceMonitorRequest {
    ServiceMonitorRequest {
        display_name: Some(display_name.into()),
        thresholds: Some(thresholds(entries)),
    }
}

pub fn monitoring(services: Vec<ServiceMonitorRequest>) -> MonitoringRequest {
    MonitoringRequest {
        dashboard_name: Some("test-monitoring".into()),
        alarm_name_prefix: None,
        header: None,
        services,
    }
}

/// Everything enabled: load balancer, scaling, topic and two monitor calls
pub fn full_request() -> TopologyRequest {
    TopologyRequest {
        scaling: Some(scaling(1, 4)),
        alarm_topic: Some(alarm_topic()),
        monitoring: Some(monitoring(vec![
            monitor(
                "webapp",
                &[("MaxRunningTasks", AlarmThreshold::max_running_tasks(4))],
            ),
            monitor("webapp", &[("HighCpu", AlarmThreshold::max_cpu_usage(85.0))]),
        ])),
        ..webapp_request(load_balanced(8000, true), 2)
    }
}
