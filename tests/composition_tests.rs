// Copyright (c) 2025 - Cowboy AI, Inc.
//! Whole-pass composition scenarios
//!
//! Each test runs `synthesize` end to end and asserts on the declared-state
//! mapping the provisioning collaborator would receive.

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use serde_json::json;

use cim_container_infra::adapters::ManifestWriter;
use cim_container_infra::domain::{NetworkOrigin, ResourceRef, UtilizationMetric};
use cim_container_infra::{deploy, synthesize, CompositionError};

#[test]
fn test_load_balanced_internet_facing_service() {
    let request = webapp_request(load_balanced(8000, true), 2);
    let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();

    let service = topology.service();
    assert_eq!(service.cluster(), topology.cluster().id());
    assert_eq!(service.task_definition(), topology.task_definition().id());
    assert_eq!(service.desired_count(), 2);

    let state = topology.declared_state();
    let balancers = &state["AWS::ElasticLoadBalancingV2::LoadBalancer"];
    assert_eq!(balancers.len(), 1);
    assert_eq!(balancers[0].properties["Scheme"], json!("internet-facing"));

    let task = topology.task_definition();
    assert_eq!(task.containers().len(), 1);
    assert_eq!(task.containers()[0].port_mappings.len(), 1);
    assert_eq!(task.containers()[0].port_mappings[0].container_port, port(8000));

    let outputs = topology.template().outputs();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].id, "service-webapp-endpoint");
}

#[test]
fn test_direct_private_service() {
    let request = webapp_request(direct(80, false), 1);
    let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();
    let state = topology.declared_state();

    assert!(!state.contains_key("AWS::ElasticLoadBalancingV2::LoadBalancer"));

    let groups = &state["AWS::EC2::SecurityGroup"];
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].properties["SecurityGroupIngress"],
        json!([{ "CidrIp": "0.0.0.0/0", "FromPort": 80, "ToPort": 80, "IpProtocol": "tcp" }])
    );

    let services = &state["AWS::ECS::Service"];
    assert_eq!(services.len(), 1);
    assert_eq!(
        services[0].properties["NetworkConfiguration"]["AwsvpcConfiguration"]["AssignPublicIp"],
        json!("DISABLED")
    );
}

#[test]
fn test_default_network_is_provisioned() {
    let request = webapp_request(direct(80, true), 1);
    let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();

    let network = topology.network();
    assert_eq!(network.origin(), &NetworkOrigin::Provisioned);
    assert_eq!(network.name(), "my-vpc");

    let state = topology.declared_state();
    assert_eq!(state["AWS::EC2::VPC"].len(), 1);
    assert_eq!(state["AWS::EC2::VPC"][0].properties["CidrBlock"], json!("10.0.0.0/16"));
    assert_eq!(state["AWS::EC2::Subnet"].len(), 4);
    assert_eq!(state["AWS::EC2::NatGateway"].len(), 1);
}

#[test]
fn test_network_lookup_through_context() {
    let request = webapp_request(direct(80, false), 1);
    let environment = env().with_context("vpcname", SHARED_NETWORK);
    let topology = synthesize(&request, &environment, &shared_catalog()).unwrap();

    assert_eq!(topology.network().origin(), &NetworkOrigin::Imported);
    assert_eq!(
        topology.network().vpc(),
        &ResourceRef::Existing(SHARED_VPC_ID.into())
    );
    assert!(!topology.declared_state().contains_key("AWS::EC2::VPC"));
}

#[test]
fn test_unknown_network_fails_the_pass() {
    let mut request = webapp_request(direct(80, false), 1);
    request.network.lookup_name = Some("nowhere".into());
    assert_eq!(
        synthesize(&request, &env(), &shared_catalog()).unwrap_err(),
        CompositionError::NetworkNotFound {
            name: "nowhere".into()
        }
    );
}

#[test]
fn test_zero_desired_count() {
    let request = webapp_request(load_balanced(80, false), 0);
    let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();
    assert_eq!(topology.service().desired_count(), 0);
    assert_eq!(
        topology.declared_state()["AWS::ElasticLoadBalancingV2::LoadBalancer"][0].properties
            ["Scheme"],
        json!("internal")
    );
}

#[test]
fn test_scaling_attached_with_two_policies() {
    let mut request = webapp_request(load_balanced(8000, true), 2);
    request.scaling = Some(scaling(1, 4));
    let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();

    let scaling = topology.scaling().unwrap();
    assert_eq!(&scaling.service, topology.service().id());
    assert_eq!(scaling.policies.len(), 2);
    assert_eq!(scaling.policy(UtilizationMetric::Cpu).unwrap().target_percent, 50.0);
    assert_eq!(scaling.policy(UtilizationMetric::Memory).unwrap().target_percent, 70.0);
}

#[test]
fn test_inverted_scaling_range_fails_the_pass() {
    let mut request = webapp_request(load_balanced(8000, true), 2);
    request.scaling = Some(scaling(5, 2));
    assert_eq!(
        synthesize(&request, &env(), &shared_catalog()).unwrap_err(),
        CompositionError::InvalidScalingRange { min: 5, max: 2 }
    );
}

#[test]
fn test_missing_family_names_config_and_field() {
    let mut request = webapp_request(direct(80, false), 1);
    request.task.family = None;
    let err = synthesize(&request, &env(), &shared_catalog()).unwrap_err();
    assert_eq!(
        err,
        CompositionError::MissingRequiredField {
            config: "TaskConfig",
            field: "family"
        }
    );
    assert_eq!(err.to_string(), "TaskConfig: required field `family` is missing");
}

#[test]
fn test_unsupported_sizing() {
    let mut request = webapp_request(direct(80, false), 1);
    request.task.memory_limit_mib = Some(8192);
    assert_eq!(
        synthesize(&request, &env(), &shared_catalog()).unwrap_err(),
        CompositionError::UnsupportedSizing {
            cpu: 512,
            memory_mib: 8192
        }
    );
}

#[test]
fn test_malformed_image_reference() {
    let mut request = webapp_request(direct(80, false), 1);
    request.containers[0].image = Some("repo/:latest".into());
    assert!(matches!(
        synthesize(&request, &env(), &shared_catalog()),
        Err(CompositionError::InvalidReference { .. })
    ));
}

#[test]
fn test_request_from_json() {
    let request = cim_container_infra::TopologyRequest::from_json(
        r#"{
            "network": { "lookup_name": "shared" },
            "task": { "cpu": 256, "memory_limit_mib": 512, "family": "api" },
            "containers": [ { "image": "nginx", "tcp_ports": [80] } ],
            "service": {
                "exposure": { "type": "direct", "port": 80, "publicly_reachable": true },
                "desired_count": 3,
                "service_name": "api"
            }
        }"#,
    )
    .unwrap();

    let topology = synthesize(&request, &env(), &shared_catalog()).unwrap();
    assert_eq!(topology.service().id().as_str(), "service-api");
    assert_eq!(
        topology.declared_state()["AWS::ECS::Service"][0].properties["ServiceName"],
        json!("api")
    );
}

#[test]
fn test_deploy_writes_manifest() {
    let topology = synthesize(&full_request(), &env(), &shared_catalog()).unwrap();
    let declared = topology.template().len();

    let mut writer = ManifestWriter::new(Vec::new());
    deploy(topology, &mut writer).unwrap();
    assert_eq!(writer.registered(), 1);

    let document: serde_json::Value = serde_json::from_slice(&writer.into_inner()).unwrap();
    assert_eq!(document["Resources"].as_object().unwrap().len(), declared);
    assert!(document["Outputs"]["service-webapp-endpoint"]["Value"].is_object());
}
